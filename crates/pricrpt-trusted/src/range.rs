//! Multi-month builds.

use pricrpt_calendar::FirstBusinessDayLookup;
use pricrpt_instruments::InstrumentRegistry;
use pricrpt_types::YearMonth;
use std::collections::BTreeMap;
use std::path::Path;

use crate::builder::{MonthOutput, MonthlyTrustedBuilder, TrustedError};

/// Tables for an inclusive range of months.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeOutput {
    /// Per-month tables keyed by month.
    pub months: BTreeMap<YearMonth, MonthOutput>,
    /// Registry after the last month.
    pub registry: InstrumentRegistry,
}

impl RangeOutput {
    /// Total quotes across all months.
    #[must_use]
    pub fn quote_count(&self) -> usize {
        self.months.values().map(|month| month.quotes.len()).sum()
    }
}

impl<L> MonthlyTrustedBuilder<'_, L>
where
    L: FirstBusinessDayLookup + ?Sized,
{
    /// Builds every month from `start` through `end`, feeding each month's
    /// registry into the next.
    ///
    /// # Errors
    ///
    /// Returns [`TrustedError::InvalidRange`] if `start` is after `end`, or
    /// the first error of any month.
    pub fn build_range<P: AsRef<Path>>(
        &self,
        archives: &[P],
        start: YearMonth,
        end: YearMonth,
        previous: InstrumentRegistry,
    ) -> Result<RangeOutput, TrustedError> {
        let months = start.through(end)?;
        let mut registry = previous;
        let mut outputs = BTreeMap::new();

        for year_month in months {
            let output = self.build_month(archives, year_month, registry)?;
            registry = output.registry.clone();
            outputs.insert(year_month, output);
        }

        Ok(RangeOutput {
            months: outputs,
            registry,
        })
    }
}
