//! Output formatters for pricrpt trusted tables.
//!
//! This crate provides formatters for writing quote, lineage and instrument
//! tables to various output formats:
//!
//! - [`CsvFormatter`] - CSV format
//! - [`JsonFormatter`] - JSON array or NDJSON format
//!
//! and the JSON persistence of the instrument registry
//! ([`load_registry`] / [`save_registry`]).

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pricrpt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;
mod registry;

pub use crate::csv::CsvFormatter;
pub use formatter::{FormatError, Formatter, OutputFormat};
pub use json::{JsonFormatter, JsonStyle};
pub use registry::{load_registry, read_registry, save_registry, write_registry};
