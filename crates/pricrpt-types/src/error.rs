//! Error types for shared value parsing.

use thiserror::Error;

use crate::YearMonth;

/// Errors that can occur when building or parsing a [`YearMonth`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum YearMonthError {
    /// Month outside 1..=12.
    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    /// Text is not in `YYYY-MM` form.
    #[error("Invalid year-month '{0}' (expected YYYY-MM)")]
    Parse(String),

    /// Start month is after end month.
    #[error("Invalid month range: {start} > {end}")]
    InvalidRange {
        /// The start month.
        start: YearMonth,
        /// The end month.
        end: YearMonth,
    },
}
