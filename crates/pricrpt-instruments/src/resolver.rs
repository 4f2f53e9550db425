//! Ticker parsing and contract maturity resolution.

use pricrpt_calendar::FirstBusinessDayLookup;
use pricrpt_types::{InstrumentRecord, MonthCode, YearMonth};
use thiserror::Error;

/// Asset code of the one-day interbank deposit future.
pub const DI1_ASSET: &str = "DI1";

/// Errors that can occur while resolving an instrument.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstrumentError {
    /// Ticker does not follow `<asset><month code><YY>`.
    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),

    /// The calendar has no first business day for the contract month.
    #[error("Calendar does not cover {month} (maturity of {ticker})")]
    MissingCalendarCoverage {
        /// The ticker being resolved.
        ticker: String,
        /// The uncovered contract month.
        month: YearMonth,
    },
}

/// Decoded parts of a futures ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCode {
    /// Asset family code.
    pub asset: String,
    /// Contract month letter.
    pub month_code: MonthCode,
    /// Contract month; the year is 2000 + YY.
    pub month: YearMonth,
}

/// Resolves tickers of one asset family into instrument records.
///
/// Maturity is the first business day of the contract month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentResolver {
    asset: String,
}

impl Default for InstrumentResolver {
    fn default() -> Self {
        Self::di1()
    }
}

impl InstrumentResolver {
    /// Creates a resolver for the given asset family code.
    #[must_use]
    pub fn new(asset: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
        }
    }

    /// Creates a resolver for `DI1` contracts.
    #[must_use]
    pub fn di1() -> Self {
        Self::new(DI1_ASSET)
    }

    /// Returns the asset family code.
    #[must_use]
    pub fn asset(&self) -> &str {
        &self.asset
    }

    /// Returns true if the ticker belongs to this resolver's family.
    ///
    /// This is a prefix check only; use [`parse`](Self::parse) to validate
    /// the full ticker.
    #[must_use]
    pub fn matches_family(&self, ticker: &str) -> bool {
        ticker.starts_with(self.asset.as_str())
    }

    /// Parses a ticker such as `DI1F21`.
    ///
    /// # Errors
    ///
    /// Returns [`InstrumentError::InvalidTicker`] if the ticker is not the
    /// asset code followed by a month letter and a two-digit year.
    pub fn parse(&self, ticker: &str) -> Result<ContractCode, InstrumentError> {
        let invalid = || InstrumentError::InvalidTicker(ticker.to_string());

        let rest = ticker.strip_prefix(self.asset.as_str()).ok_or_else(invalid)?;
        let mut chars = rest.chars();
        let month_code = chars.next().and_then(MonthCode::from_char).ok_or_else(invalid)?;
        let yy = chars.as_str();
        if yy.len() != 2 || !yy.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let yy: i32 = yy.parse().map_err(|_| invalid())?;
        let month = YearMonth::new(2000 + yy, month_code.month()).map_err(|_| invalid())?;

        Ok(ContractCode {
            asset: self.asset.clone(),
            month_code,
            month,
        })
    }

    /// Resolves a ticker into an instrument record.
    ///
    /// # Errors
    ///
    /// Returns [`InstrumentError::InvalidTicker`] for malformed tickers and
    /// [`InstrumentError::MissingCalendarCoverage`] if the calendar does not
    /// cover the contract month.
    pub fn resolve<L>(&self, ticker: &str, calendar: &L) -> Result<InstrumentRecord, InstrumentError>
    where
        L: FirstBusinessDayLookup + ?Sized,
    {
        let code = self.parse(ticker)?;
        let month = code.month;
        let maturity = calendar.first_business_day(month).ok_or_else(|| {
            InstrumentError::MissingCalendarCoverage {
                ticker: ticker.to_string(),
                month,
            }
        })?;

        Ok(InstrumentRecord::new(
            ticker,
            code.asset,
            code.month_code,
            month.year(),
            maturity,
        ))
    }
}
