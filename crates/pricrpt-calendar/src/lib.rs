//! Business-day calendar for pricrpt contract maturity resolution.
//!
//! - [`BusinessDayCalendar`] - Weekends plus a holiday set
//! - [`FirstBusinessDays`] - Bounded `(year, month) -> first business day` table
//! - [`FirstBusinessDayLookup`] - The lookup seam used by the instrument resolver
//! - [`parse_holidays_csv`] / [`load_holidays`] - Holiday list loading

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pricrpt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod calendar;
mod holidays;
mod lookup;

pub use calendar::BusinessDayCalendar;
pub use holidays::{CalendarError, load_holidays, parse_holidays_csv};
pub use lookup::{FirstBusinessDayLookup, FirstBusinessDays};
