//! Instrument registry and maturity resolution for pricrpt.
//!
//! The registry is an ordinary value: each monthly run receives the
//! previous registry and returns the updated one.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use pricrpt_calendar::FirstBusinessDays;
//! use pricrpt_instruments::{InstrumentRegistry, InstrumentResolver};
//!
//! let mut calendar = FirstBusinessDays::new();
//! calendar.insert(NaiveDate::from_ymd_opt(2021, 1, 4).unwrap());
//!
//! let resolver = InstrumentResolver::di1();
//! let record = resolver.resolve("DI1F21", &calendar).unwrap();
//!
//! let mut registry = InstrumentRegistry::new();
//! registry.insert(record);
//! assert!(registry.contains("DI1F21"));
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pricrpt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod registry;
mod resolver;

pub use registry::InstrumentRegistry;
pub use resolver::{ContractCode, DI1_ASSET, InstrumentError, InstrumentResolver};
