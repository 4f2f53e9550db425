//! Core types for the pricrpt settlement snapshot pipeline.
//!
//! This crate provides the fundamental data structures shared by every
//! stage of the pipeline:
//!
//! - [`QuoteRecord`] - A normalized interest-rate-future quote
//! - [`LineageRecord`] - Audit row tying quotes back to their source document
//! - [`InstrumentRecord`] - Contract master data keyed by ticker
//! - [`YearMonth`] - Calendar month used to batch daily archives
//! - [`MonthCode`] - Futures contract month letters
//! - [`archive_trading_day`] - Trading day embedded in an archive file name

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pricrpt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod contract;
mod error;
mod instrument;
mod lineage;
mod month;
mod naming;
mod quote;

pub use contract::MonthCode;
pub use error::YearMonthError;
pub use instrument::InstrumentRecord;
pub use lineage::{LineageRecord, TimestampOrigin};
pub use month::{MonthIterator, YearMonth};
pub use naming::{archive_day_token, archive_trading_day, file_name};
pub use quote::QuoteRecord;
