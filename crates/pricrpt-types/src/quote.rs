//! Daily quote representation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A normalized quote for one instrument on one trading day.
///
/// Numeric fields are `None` when the source entry left them empty or
/// carried a value that is not a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Trading date declared by the entry.
    pub trade_date: Option<NaiveDate>,
    /// Instrument ticker (e.g. `DI1F21`).
    pub ticker: String,
    /// Timestamp of the snapshot the quote was taken from (UTC).
    pub snapshot_ts: DateTime<Utc>,
    /// Adjusted rate.
    pub adjusted_rate: Option<f64>,
    /// Adjusted price.
    pub adjusted_price: Option<f64>,
    /// Best bid price.
    pub best_bid: Option<f64>,
    /// Best ask price.
    pub best_ask: Option<f64>,
    /// Last trade price.
    pub last_price: Option<f64>,
    /// Average trade price.
    pub avg_price: Option<f64>,
    /// Minimum trade price.
    pub min_price: Option<f64>,
    /// Maximum trade price.
    pub max_price: Option<f64>,
    /// Number of trades.
    pub traded_quantity: Option<i64>,
    /// Quantity of contracts traded.
    pub instrument_quantity: Option<i64>,
    /// Open interest at the end of the day.
    pub open_interest: Option<i64>,
    /// Identifier of the [`LineageRecord`](crate::LineageRecord) this quote came from.
    pub lineage_id: String,
    /// When the pipeline run that produced this quote started (UTC).
    pub ingestion_ts: DateTime<Utc>,
}

impl QuoteRecord {
    /// Creates a quote with every numeric field absent.
    #[must_use]
    pub fn new(
        ticker: impl Into<String>,
        snapshot_ts: DateTime<Utc>,
        lineage_id: impl Into<String>,
        ingestion_ts: DateTime<Utc>,
    ) -> Self {
        Self {
            trade_date: None,
            ticker: ticker.into(),
            snapshot_ts,
            adjusted_rate: None,
            adjusted_price: None,
            best_bid: None,
            best_ask: None,
            last_price: None,
            avg_price: None,
            min_price: None,
            max_price: None,
            traded_quantity: None,
            instrument_quantity: None,
            open_interest: None,
            lineage_id: lineage_id.into(),
            ingestion_ts,
        }
    }

    /// Returns the bid/ask spread when both sides are quoted.
    #[must_use]
    pub fn spread(&self) -> Option<f64> {
        match (self.best_ask, self.best_bid) {
            (Some(ask), Some(bid)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Returns true if the entry reports at least one trade.
    #[must_use]
    pub fn has_trades(&self) -> bool {
        self.traded_quantity.is_some_and(|qty| qty > 0)
    }
}
