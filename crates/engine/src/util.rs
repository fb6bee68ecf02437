//! Internal helpers for calendar arithmetic.
//!
//! These utilities are **not** part of the public API. Month filters are
//! expressed as half-open date ranges so the store never has to extract
//! month/year parts from a date column.

use chrono::NaiveDate;

use crate::{EngineError, ResultEngine};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Return the `[first day, first day of next month)` range covering a month.
pub(crate) fn month_bounds(year: i32, month: u32) -> ResultEngine<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        EngineError::InvalidAmount(format!("invalid month: {year}-{month:02}"))
    })?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| EngineError::InvalidAmount(format!("invalid month: {year}-{month:02}")))?;
    Ok((start, end))
}

/// Step back `offset` months from `(year, month)`.
pub(crate) fn shift_month_back(year: i32, month: u32, offset: u32) -> (i32, u32) {
    // Work in zero-based total months so the subtraction carries across years.
    let total = year as i64 * 12 + (month as i64 - 1) - offset as i64;
    let year = total.div_euclid(12) as i32;
    let month = total.rem_euclid(12) as u32 + 1;
    (year, month)
}

/// Short English name of a month, e.g. `"Jan"` for 1.
pub(crate) fn month_name(month: u32) -> &'static str {
    match month {
        1..=12 => MONTH_NAMES[month as usize - 1],
        _ => "???",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_are_half_open() {
        let (start, end) = month_bounds(2026, 8).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
    }

    #[test]
    fn month_bounds_roll_over_december() {
        let (start, end) = month_bounds(2025, 12).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn month_bounds_reject_bad_month() {
        assert!(month_bounds(2026, 0).is_err());
        assert!(month_bounds(2026, 13).is_err());
    }

    #[test]
    fn shift_month_back_crosses_year_boundary() {
        assert_eq!(shift_month_back(2026, 2, 0), (2026, 2));
        assert_eq!(shift_month_back(2026, 2, 1), (2026, 1));
        assert_eq!(shift_month_back(2026, 2, 2), (2025, 12));
        assert_eq!(shift_month_back(2026, 2, 5), (2025, 9));
        assert_eq!(shift_month_back(2026, 1, 13), (2024, 12));
    }

    #[test]
    fn month_names_match_calendar() {
        assert_eq!(month_name(1), "Jan");
        assert_eq!(month_name(12), "Dec");
    }
}
