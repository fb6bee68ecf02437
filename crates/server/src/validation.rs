//! Boundary checks for request bodies.
//!
//! Each function collects every failing field before returning, so one
//! response reports all the problems of a submission at once. Values that do
//! not even parse (malformed dates, unknown `type` strings, bad UUIDs) never
//! reach these checks; the typed extractors reject them first.

use api_types::budget::BudgetNew;
use api_types::category::CategoryNew;
use api_types::transaction::TransactionNew;
use api_types::user::{Login, Register};
use email_address::EmailAddress;
use rust_decimal::Decimal;

use crate::{FieldError, ServerError};

fn finish(errors: Vec<FieldError>) -> Result<(), ServerError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ServerError::Validation(errors))
    }
}

pub(crate) fn register(payload: &Register) -> Result<(), ServerError> {
    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push(FieldError {
            field: "name",
            message: "Name is required",
        });
    }
    if !EmailAddress::is_valid(payload.email.trim()) {
        errors.push(FieldError {
            field: "email",
            message: "Valid email is required",
        });
    }
    if payload.password.chars().count() < 6 {
        errors.push(FieldError {
            field: "password",
            message: "Password must be at least 6 characters",
        });
    }
    finish(errors)
}

pub(crate) fn login(payload: &Login) -> Result<(), ServerError> {
    let mut errors = Vec::new();
    if !EmailAddress::is_valid(payload.email.trim()) {
        errors.push(FieldError {
            field: "email",
            message: "Valid email is required",
        });
    }
    if payload.password.is_empty() {
        errors.push(FieldError {
            field: "password",
            message: "Password is required",
        });
    }
    finish(errors)
}

pub(crate) fn category(payload: &CategoryNew) -> Result<(), ServerError> {
    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push(FieldError {
            field: "name",
            message: "Category name is required",
        });
    }
    finish(errors)
}

pub(crate) fn transaction(payload: &TransactionNew) -> Result<(), ServerError> {
    let mut errors = Vec::new();
    if payload.amount <= Decimal::ZERO {
        errors.push(FieldError {
            field: "amount",
            message: "Amount must be a positive number",
        });
    }
    finish(errors)
}

pub(crate) fn budget(payload: &BudgetNew) -> Result<(), ServerError> {
    let mut errors = Vec::new();
    if payload.amount <= Decimal::ZERO {
        errors.push(FieldError {
            field: "amount",
            message: "Amount must be a positive number",
        });
    }
    if !(1..=12).contains(&payload.month) {
        errors.push(FieldError {
            field: "month",
            message: "Month must be between 1 and 12",
        });
    }
    if !(2000..=2100).contains(&payload.year) {
        errors.push(FieldError {
            field: "year",
            message: "Valid year is required",
        });
    }
    finish(errors)
}
