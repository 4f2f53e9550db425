//! Weekend-and-holiday business-day calendar.

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};
use pricrpt_types::{YearMonth, YearMonthError};
use std::collections::BTreeSet;

use crate::FirstBusinessDays;

/// A business-day calendar: every weekday that is not a listed holiday.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessDayCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl BusinessDayCalendar {
    /// Creates a calendar with no holidays (weekends only).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            holidays: BTreeSet::new(),
        }
    }

    /// Creates a calendar from a holiday set.
    #[must_use]
    pub const fn with_holidays(holidays: BTreeSet<NaiveDate>) -> Self {
        Self { holidays }
    }

    /// Returns the number of holidays.
    #[must_use]
    pub fn holiday_count(&self) -> usize {
        self.holidays.len()
    }

    /// Returns true if `date` is a business day.
    #[must_use]
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }

    /// Counts business days between two dates.
    ///
    /// The bounds are swapped when `end < start`. The common convention for
    /// rate accrual is `(start, end]`, i.e. `include_start = false` and
    /// `include_end = true`.
    #[must_use]
    pub fn business_days_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        include_start: bool,
        include_end: bool,
    ) -> usize {
        let (start, end) = if end < start { (end, start) } else { (start, end) };

        let first = if include_start {
            Some(start)
        } else {
            start.succ_opt()
        };
        let last = if include_end {
            Some(end)
        } else {
            end.pred_opt()
        };
        let (Some(first), Some(last)) = (first, last) else {
            return 0;
        };
        if last < first {
            return 0;
        }

        first
            .iter_days()
            .take_while(|d| *d <= last)
            .filter(|d| self.is_business_day(*d))
            .count()
    }

    /// Returns the first business day of a month, if the month has one.
    #[must_use]
    pub fn first_business_day(&self, month: YearMonth) -> Option<NaiveDate> {
        let first = month.first_day()?;
        (0..31)
            .map(|offset| first + TimeDelta::days(offset))
            .take_while(|d| month.contains(*d))
            .find(|d| self.is_business_day(*d))
    }

    /// Materializes the first-business-day table for an inclusive month range.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is after `end`.
    pub fn first_business_days(
        &self,
        start: YearMonth,
        end: YearMonth,
    ) -> Result<FirstBusinessDays, YearMonthError> {
        Ok(start
            .through(end)?
            .filter_map(|month| Some((month, self.first_business_day(month)?)))
            .collect())
    }
}
