//! Instrument master data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::MonthCode;

/// Contract master data for one futures instrument, keyed by ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentRecord {
    /// Ticker (e.g. `DI1F21`).
    ticker: String,
    /// Asset family code (e.g. `DI1`).
    asset: String,
    /// Contract month letter.
    month_code: MonthCode,
    /// Contract year (four digits).
    contract_year: i32,
    /// Contract maturity date.
    maturity_date: NaiveDate,
}

impl InstrumentRecord {
    /// Creates a new instrument record.
    #[must_use]
    pub fn new(
        ticker: impl Into<String>,
        asset: impl Into<String>,
        month_code: MonthCode,
        contract_year: i32,
        maturity_date: NaiveDate,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            asset: asset.into(),
            month_code,
            contract_year,
            maturity_date,
        }
    }

    /// Returns the ticker.
    #[must_use]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Returns the asset family code.
    #[must_use]
    pub fn asset(&self) -> &str {
        &self.asset
    }

    /// Returns the contract month letter.
    #[must_use]
    pub const fn month_code(&self) -> MonthCode {
        self.month_code
    }

    /// Returns the contract year.
    #[must_use]
    pub const fn contract_year(&self) -> i32 {
        self.contract_year
    }

    /// Returns the maturity date.
    #[must_use]
    pub const fn maturity_date(&self) -> NaiveDate {
        self.maturity_date
    }

    /// Returns true if the contract has matured on or before `date`.
    #[must_use]
    pub fn is_expired_at(&self, date: NaiveDate) -> bool {
        self.maturity_date <= date
    }
}

impl std::fmt::Display for InstrumentRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (matures {})", self.ticker, self.maturity_date)
    }
}
