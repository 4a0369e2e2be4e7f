//! New quotation numbers and page defaults.
//!
//! Numbers are derived from local wall-clock time at render time. They are
//! not reserved: two renders in the same second produce the same number,
//! and a number nobody saves simply disappears.

use chrono::{Local, NaiveDateTime};
use serde::Serialize;

const NUMBER_PREFIX: &str = "QTN";

/// Number and date offered for a quotation that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotationDraft {
    pub quotation_number: String,
    pub date: String,
}

impl QuotationDraft {
    /// Draft for the current local time.
    pub fn now() -> Self {
        Self::at(Local::now().naive_local())
    }

    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            quotation_number: generate_quotation_number(now),
            date: now.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Formats `QTN-<YYYYMMDD>-<HHMMSS>` for the given instant.
pub fn generate_quotation_number(now: NaiveDateTime) -> String {
    format!("{NUMBER_PREFIX}-{}", now.format("%Y%m%d-%H%M%S"))
}
