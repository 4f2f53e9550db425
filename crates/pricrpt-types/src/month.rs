//! Calendar months and month iteration.

use chrono::{Datelike, NaiveDate};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::YearMonthError;

/// A calendar month, the batching unit for daily archives.
///
/// Ordered chronologically and displayed as `YYYY-MM`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[display("{year:04}-{month:02}")]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a new year-month, validating the month number.
    ///
    /// # Errors
    ///
    /// Returns an error if `month` is not in `1..=12`.
    pub const fn new(year: i32, month: u32) -> Result<Self, YearMonthError> {
        if month == 0 || month > 12 {
            return Err(YearMonthError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// Returns the month containing the given date.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns the year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month number (1-12).
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Returns true if the date falls in this month.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Returns the first calendar day of the month.
    #[must_use]
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Returns the following month.
    #[must_use]
    pub const fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Returns an iterator over the months from `self` to `end`, inclusive.
    ///
    /// # Errors
    ///
    /// Returns an error if `self` is after `end`.
    pub fn through(self, end: Self) -> Result<MonthIterator, YearMonthError> {
        if self > end {
            return Err(YearMonthError::InvalidRange { start: self, end });
        }
        Ok(MonthIterator {
            current: self,
            end,
            done: false,
        })
    }
}

impl FromStr for YearMonth {
    type Err = YearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || YearMonthError::Parse(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(parse_err)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(parse_err());
        }
        let year: i32 = year.parse().map_err(|_| parse_err())?;
        let month: u32 = month.parse().map_err(|_| parse_err())?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = YearMonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

/// Iterator over an inclusive range of months.
#[derive(Debug, Clone)]
pub struct MonthIterator {
    current: YearMonth,
    end: YearMonth,
    done: bool,
}

impl Iterator for MonthIterator {
    type Item = YearMonth;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.current > self.end {
            return None;
        }

        let result = self.current;
        if result == self.end {
            self.done = true;
        } else {
            self.current = result.succ();
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done || self.current > self.end {
            return (0, Some(0));
        }
        let span = (i64::from(self.end.year) - i64::from(self.current.year)) * 12
            + i64::from(self.end.month)
            - i64::from(self.current.month)
            + 1;
        let months = span as usize;
        (months, Some(months))
    }
}

impl ExactSizeIterator for MonthIterator {}
