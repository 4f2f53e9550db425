//! Monthly trusted tables for pricrpt.
//!
//! [`MonthlyTrustedBuilder`] turns a month of daily archives into quote and
//! lineage tables and an updated instrument registry;
//! [`build_range`](MonthlyTrustedBuilder::build_range) chains months.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pricrpt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod builder;
mod config;
mod range;

pub use builder::{
    Diagnostic, MonthOutput, MonthlyTrustedBuilder, TrustedError, archives_for_month,
};
pub use config::{BuildConfig, Clock};
pub use range::RangeOutput;
