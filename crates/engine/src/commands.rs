//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::TransactionKind;

/// Full field set for creating or replacing a transaction.
///
/// Updates are whole-row replacements, so the same draft serves both create
/// and update.
#[derive(Clone, Debug)]
pub struct TransactionDraft {
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category_id: Uuid,
    pub kind: TransactionKind,
    pub description: Option<String>,
}

impl TransactionDraft {
    #[must_use]
    pub fn new(amount: Decimal, date: NaiveDate, category_id: Uuid, kind: TransactionKind) -> Self {
        Self {
            amount,
            date,
            category_id,
            kind,
            description: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Full field set for creating or replacing a budget.
#[derive(Clone, Debug)]
pub struct BudgetDraft {
    pub amount: Decimal,
    pub month: u32,
    pub year: i32,
    pub category_id: Option<Uuid>,
}

impl BudgetDraft {
    #[must_use]
    pub fn new(amount: Decimal, month: u32, year: i32) -> Self {
        Self {
            amount,
            month,
            year,
            category_id: None,
        }
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }
}
