//! Settlement snapshot selection and trusted DI1 tables from exchange price
//! report archives.
//!
//! This is a facade crate that re-exports functionality from the pricrpt
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```no_run
//! use pricrpt_lib::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let holidays = load_holidays(Path::new("feriados_nacionais.csv"))?;
//!     let calendar = BusinessDayCalendar::with_holidays(holidays);
//!     let start: YearMonth = "2021-01".parse()?;
//!     let end: YearMonth = "2021-03".parse()?;
//!     let lookup = calendar.first_business_days(start, YearMonth::new(2035, 12)?)?;
//!
//!     let archives = vec![Path::new("raw/PR210104_20210104.zip")];
//!     let builder = MonthlyTrustedBuilder::new(BuildConfig::default(), &lookup);
//!     let output = builder.build_range(&archives, start, end, InstrumentRegistry::new())?;
//!
//!     for (month, tables) in &output.months {
//!         println!("{month}: {} quotes", tables.quotes.len());
//!     }
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pricrpt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use pricrpt_types::*;

// Re-export calendar and instruments
pub use pricrpt_calendar::{
    BusinessDayCalendar, CalendarError, FirstBusinessDayLookup, FirstBusinessDays,
    load_holidays, parse_holidays_csv,
};
pub use pricrpt_instruments::{
    ContractCode, DI1_ASSET, InstrumentError, InstrumentRegistry, InstrumentResolver,
};

// Re-export archive handling
#[cfg(feature = "archive")]
pub use pricrpt_archive::{
    ArchiveError, CandidateDocument, ExtractError, LatestPick, LineageBuilder, NestedArchive,
    PickMethod, QuoteContext, QuoteReader, SelectError, SelectedSnapshot, SelectorConfig,
    SnapshotSelector, pick_latest, probe_snapshot_ts, rank_candidates,
};

// Re-export monthly builds
#[cfg(feature = "trusted")]
pub use pricrpt_trusted::{
    BuildConfig, Clock, Diagnostic, MonthOutput, MonthlyTrustedBuilder, RangeOutput,
    TrustedError, archives_for_month,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use pricrpt_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat, load_registry,
    save_registry,
};

/// Prelude module for convenient imports.
///
/// ```
/// use pricrpt_lib::prelude::*;
/// ```
pub mod prelude {
    pub use pricrpt_types::{
        InstrumentRecord, LineageRecord, MonthCode, QuoteRecord, TimestampOrigin, YearMonth,
    };

    pub use pricrpt_calendar::{
        BusinessDayCalendar, FirstBusinessDayLookup, FirstBusinessDays, load_holidays,
    };
    pub use pricrpt_instruments::{InstrumentRegistry, InstrumentResolver};

    #[cfg(feature = "archive")]
    pub use pricrpt_archive::{
        NestedArchive, PickMethod, SelectorConfig, SnapshotSelector, pick_latest,
    };

    #[cfg(feature = "trusted")]
    pub use pricrpt_trusted::{BuildConfig, MonthOutput, MonthlyTrustedBuilder, RangeOutput};

    #[cfg(feature = "format")]
    pub use pricrpt_format::{
        CsvFormatter, Formatter, JsonFormatter, OutputFormat, load_registry, save_registry,
    };
}
