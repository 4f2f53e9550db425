//! JSON output format.

use pricrpt_types::{InstrumentRecord, LineageRecord, QuoteRecord};
use serde::Serialize;
use std::io::Write;

use crate::{FormatError, Formatter};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array (standard JSON).
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// JSON formatter.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Output style.
    style: JsonStyle,
    /// Whether to pretty-print (only for array style).
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default settings (array style).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Creates a new NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Sets whether to pretty-print output (array style only).
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the output style.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }

    fn write_items<T: Serialize, W: Write>(&self, items: &[T], mut writer: W) -> Result<(), FormatError> {
        match self.style {
            JsonStyle::Array => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut writer, items)?;
                } else {
                    serde_json::to_writer(&mut writer, items)?;
                }
                writeln!(writer)?;
            }
            JsonStyle::Ndjson => {
                for item in items {
                    serde_json::to_writer(&mut writer, item)?;
                    writeln!(writer)?;
                }
            }
        }
        writer.flush()?;
        Ok(())
    }
}

impl Formatter for JsonFormatter {
    fn write_quotes<W: Write>(&self, quotes: &[QuoteRecord], writer: W) -> Result<(), FormatError> {
        self.write_items(quotes, writer)
    }

    fn write_lineage<W: Write>(
        &self,
        lineage: &[LineageRecord],
        writer: W,
    ) -> Result<(), FormatError> {
        self.write_items(lineage, writer)
    }

    fn write_instruments<W: Write>(
        &self,
        instruments: &[InstrumentRecord],
        writer: W,
    ) -> Result<(), FormatError> {
        self.write_items(instruments, writer)
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}
