//! Display Formatting
//!
//! Converts stored bill values into the strings shown in the list view.
//! Formatting is best-effort per record: a record whose values cannot be
//! formatted is displayed with its raw values instead.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::model::{Bill, BillStatus};

/// French month abbreviations, as produced by a `fr` locale short month
/// truncated to three characters and capitalized.
const MONTHS_FR: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// Formatting errors
#[derive(Error, Debug, PartialEq)]
pub enum FormatError {
    /// Date is not a valid `YYYY-MM-DD` calendar date
    #[error("Invalid date: {0:?}")]
    InvalidDate(String),
}

/// Format an ISO date as `"4 Avr. 04"`
pub fn format_date(raw: &str) -> Result<String, FormatError> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| FormatError::InvalidDate(raw.to_string()))?;

    let month = MONTHS_FR[date.month0() as usize];
    Ok(format!(
        "{} {}. {:02}",
        date.day(),
        month,
        date.year().rem_euclid(100)
    ))
}

/// Display label for a bill status
pub fn format_status(status: BillStatus) -> &'static str {
    match status {
        BillStatus::Pending => "En attente",
        BillStatus::Accepted => "Accepté",
        BillStatus::Refused => "Refused",
    }
}

/// A bill paired with the values shown for it
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayBill {
    pub bill: Bill,
    pub date: String,
    pub status: String,
}

/// Format one record, falling back to raw values when formatting fails.
pub fn best_effort(bill: Bill) -> DisplayBill {
    match format_date(&bill.date) {
        Ok(date) => DisplayBill {
            status: format_status(bill.status).to_string(),
            date,
            bill,
        },
        Err(e) => {
            tracing::warn!(bill_id = %bill.id, error = %e, "Displaying bill with raw values");
            DisplayBill {
                date: bill.date.clone(),
                status: bill.status.as_str().to_string(),
                bill,
            }
        }
    }
}
