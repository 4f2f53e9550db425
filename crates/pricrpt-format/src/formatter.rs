//! Output format abstraction.

use pricrpt_types::{InstrumentRecord, LineageRecord, QuoteRecord};
use std::io::Write;
use thiserror::Error;

use crate::{CsvFormatter, JsonFormatter};

/// Output format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// CSV format.
    #[default]
    Csv,
    /// JSON array format.
    Json,
    /// Newline-delimited JSON format.
    Ndjson,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
        }
    }

    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Csv, Self::Json, Self::Ndjson]
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur during formatting.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unknown output format.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Trait for table writers.
pub trait Formatter: Send + Sync {
    /// Writes quote records.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_quotes<W: Write>(&self, quotes: &[QuoteRecord], writer: W) -> Result<(), FormatError>;

    /// Writes lineage records.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_lineage<W: Write>(
        &self,
        lineage: &[LineageRecord],
        writer: W,
    ) -> Result<(), FormatError>;

    /// Writes instrument records.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_instruments<W: Write>(
        &self,
        instruments: &[InstrumentRecord],
        writer: W,
    ) -> Result<(), FormatError>;

    /// Returns the file extension for this format.
    fn extension(&self) -> &str;
}

impl Formatter for OutputFormat {
    fn write_quotes<W: Write>(&self, quotes: &[QuoteRecord], writer: W) -> Result<(), FormatError> {
        match self {
            Self::Csv => CsvFormatter::new().write_quotes(quotes, writer),
            Self::Json => JsonFormatter::new().write_quotes(quotes, writer),
            Self::Ndjson => JsonFormatter::ndjson().write_quotes(quotes, writer),
        }
    }

    fn write_lineage<W: Write>(
        &self,
        lineage: &[LineageRecord],
        writer: W,
    ) -> Result<(), FormatError> {
        match self {
            Self::Csv => CsvFormatter::new().write_lineage(lineage, writer),
            Self::Json => JsonFormatter::new().write_lineage(lineage, writer),
            Self::Ndjson => JsonFormatter::ndjson().write_lineage(lineage, writer),
        }
    }

    fn write_instruments<W: Write>(
        &self,
        instruments: &[InstrumentRecord],
        writer: W,
    ) -> Result<(), FormatError> {
        match self {
            Self::Csv => CsvFormatter::new().write_instruments(instruments, writer),
            Self::Json => JsonFormatter::new().write_instruments(instruments, writer),
            Self::Ndjson => JsonFormatter::ndjson().write_instruments(instruments, writer),
        }
    }

    fn extension(&self) -> &str {
        OutputFormat::extension(self)
    }
}
