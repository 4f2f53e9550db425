//! First-business-day lookup tables.

use chrono::NaiveDate;
use pricrpt_types::YearMonth;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maps a calendar month to its first business day.
///
/// Implementations have bounded coverage: `None` means the month is not
/// covered, which callers treat as missing master data.
pub trait FirstBusinessDayLookup {
    /// Returns the first business day of `month`, if covered.
    fn first_business_day(&self, month: YearMonth) -> Option<NaiveDate>;
}

/// A materialized `(year, month) -> first business day` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstBusinessDays {
    days: BTreeMap<YearMonth, NaiveDate>,
}

impl FirstBusinessDays {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            days: BTreeMap::new(),
        }
    }

    /// Builds the table from a `date -> is business day` index.
    ///
    /// The earliest business day seen in each month wins; input order does
    /// not matter.
    pub fn from_flags(flags: impl IntoIterator<Item = (NaiveDate, bool)>) -> Self {
        let mut days: BTreeMap<YearMonth, NaiveDate> = BTreeMap::new();
        for (date, is_business_day) in flags {
            if !is_business_day {
                continue;
            }
            days.entry(YearMonth::of(date))
                .and_modify(|first| {
                    if date < *first {
                        *first = date;
                    }
                })
                .or_insert(date);
        }
        Self { days }
    }

    /// Sets the first business day of the month containing `date`.
    pub fn insert(&mut self, date: NaiveDate) -> Option<NaiveDate> {
        self.days.insert(YearMonth::of(date), date)
    }

    /// Returns the first business day of `month`, if covered.
    #[must_use]
    pub fn get(&self, month: YearMonth) -> Option<NaiveDate> {
        self.days.get(&month).copied()
    }

    /// Returns the number of covered months.
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Returns true if no month is covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Returns the covered months in chronological order.
    pub fn months(&self) -> impl Iterator<Item = YearMonth> + '_ {
        self.days.keys().copied()
    }
}

impl FromIterator<(YearMonth, NaiveDate)> for FirstBusinessDays {
    fn from_iter<I: IntoIterator<Item = (YearMonth, NaiveDate)>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

impl FirstBusinessDayLookup for FirstBusinessDays {
    fn first_business_day(&self, month: YearMonth) -> Option<NaiveDate> {
        self.get(month)
    }
}

impl<F> FirstBusinessDayLookup for F
where
    F: Fn(YearMonth) -> Option<NaiveDate>,
{
    fn first_business_day(&self, month: YearMonth) -> Option<NaiveDate> {
        self(month)
    }
}
