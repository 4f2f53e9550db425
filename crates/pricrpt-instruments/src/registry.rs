//! Ticker-keyed instrument registry.

use pricrpt_types::InstrumentRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Registry of resolved instruments, keyed by ticker.
///
/// Entries are only ever inserted or replaced, never removed. Iteration is
/// in ticker order. Serializes as a plain array of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<InstrumentRecord>", into = "Vec<InstrumentRecord>")]
pub struct InstrumentRegistry {
    instruments: BTreeMap<String, InstrumentRecord>,
}

impl InstrumentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            instruments: BTreeMap::new(),
        }
    }

    /// Looks up an instrument by ticker (exact match).
    #[must_use]
    pub fn get(&self, ticker: &str) -> Option<&InstrumentRecord> {
        self.instruments.get(ticker)
    }

    /// Returns true if the ticker is registered.
    #[must_use]
    pub fn contains(&self, ticker: &str) -> bool {
        self.instruments.contains_key(ticker)
    }

    /// Inserts a record, returning the one it replaced.
    pub fn insert(&mut self, record: InstrumentRecord) -> Option<InstrumentRecord> {
        self.instruments.insert(record.ticker().to_string(), record)
    }

    /// Merges `newer` into this registry; records in `newer` win.
    pub fn merge(&mut self, newer: Self) {
        self.instruments.extend(newer.instruments);
    }

    /// Returns the number of instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Returns all instruments in ticker order.
    pub fn iter(&self) -> impl Iterator<Item = &InstrumentRecord> {
        self.instruments.values()
    }

    /// Returns all tickers in order.
    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.instruments.keys().map(String::as_str)
    }

    /// Consumes the registry, returning records in ticker order.
    #[must_use]
    pub fn into_records(self) -> Vec<InstrumentRecord> {
        self.instruments.into_values().collect()
    }
}

impl FromIterator<InstrumentRecord> for InstrumentRegistry {
    /// Later records replace earlier ones with the same ticker.
    fn from_iter<I: IntoIterator<Item = InstrumentRecord>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.extend(iter);
        registry
    }
}

impl Extend<InstrumentRecord> for InstrumentRegistry {
    fn extend<I: IntoIterator<Item = InstrumentRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl From<Vec<InstrumentRecord>> for InstrumentRegistry {
    fn from(records: Vec<InstrumentRecord>) -> Self {
        records.into_iter().collect()
    }
}

impl From<InstrumentRegistry> for Vec<InstrumentRecord> {
    fn from(registry: InstrumentRegistry) -> Self {
        registry.into_records()
    }
}
