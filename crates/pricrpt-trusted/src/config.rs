//! Build configuration.

use chrono::{DateTime, Utc};
use pricrpt_archive::SelectorConfig;
use serde::{Deserialize, Serialize};

/// Source of the ingestion timestamp stamped on a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    /// Current system time.
    #[default]
    System,
    /// A fixed instant, for reproducible runs and tests.
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns the current instant according to this clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Self::System => Utc::now(),
            Self::Fixed(ts) => *ts,
        }
    }
}

/// Configuration for monthly builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Snapshot selection settings.
    pub selector: SelectorConfig,
    /// Asset family whose quotes are kept and resolved.
    pub asset: String,
    /// Ingestion clock.
    #[serde(skip)]
    pub clock: Clock,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            selector: SelectorConfig::default(),
            asset: pricrpt_instruments::DI1_ASSET.to_string(),
            clock: Clock::System,
        }
    }
}

impl BuildConfig {
    /// Sets the selector configuration.
    #[must_use]
    pub fn with_selector(mut self, selector: SelectorConfig) -> Self {
        self.selector = selector;
        self
    }

    /// Sets the asset family.
    #[must_use]
    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = asset.into();
        self
    }

    /// Sets the ingestion clock.
    #[must_use]
    pub const fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Pins the ingestion timestamp.
    #[must_use]
    pub const fn with_ingestion_ts(self, ts: DateTime<Utc>) -> Self {
        self.with_clock(Clock::Fixed(ts))
    }
}
