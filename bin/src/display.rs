//! Display utilities and output formatting for the pricrpt CLI.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use pricrpt_lib::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Output format for the monthly tables.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
}

impl Format {
    /// Returns the file extension for this format.
    pub(crate) const fn extension(self) -> &'static str {
        self.output_format().extension()
    }

    pub(crate) const fn output_format(self) -> OutputFormat {
        match self {
            Self::Csv => OutputFormat::Csv,
            Self::Json => OutputFormat::Json,
            Self::Ndjson => OutputFormat::Ndjson,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Parse a `YYYY-MM` argument.
pub(crate) fn parse_month(s: &str) -> Result<YearMonth> {
    s.parse()
        .with_context(|| format!("Invalid month '{s}' (expected YYYY-MM)"))
}

/// Path of one monthly table, e.g. `quotes_2021-01.csv`.
pub(crate) fn table_path(dir: &Path, table: &str, month: YearMonth, format: Format) -> PathBuf {
    dir.join(format!("{table}_{month}.{}", format.extension()))
}

/// Write a month's quote and lineage tables, returning their paths.
pub(crate) fn write_month_tables(
    month: &MonthOutput,
    dir: &Path,
    format: Format,
) -> Result<(PathBuf, PathBuf)> {
    let formatter = format.output_format();

    let quotes_path = table_path(dir, "quotes", month.year_month, format);
    let file = File::create(&quotes_path)
        .with_context(|| format!("Failed to create {}", quotes_path.display()))?;
    formatter.write_quotes(&month.quotes, BufWriter::new(file))?;

    let lineage_path = table_path(dir, "lineage", month.year_month, format);
    let file = File::create(&lineage_path)
        .with_context(|| format!("Failed to create {}", lineage_path.display()))?;
    formatter.write_lineage(&month.lineage, BufWriter::new(file))?;

    Ok((quotes_path, lineage_path))
}

/// Print a one-line summary of a built month followed by its diagnostics.
pub(crate) fn print_month_summary(month: &MonthOutput) {
    println!(
        "{}  {:>4} snapshots  {:>7} quotes  {:>3} new contracts  {:>2} skipped days",
        month.year_month,
        month.lineage.len(),
        month.quotes.len(),
        month.resolved,
        month.skipped_days(),
    );
    for diagnostic in &month.diagnostics {
        println!("  - {diagnostic}");
    }
}

/// Format an optional timestamp for tables.
pub(crate) fn format_ts(ts: Option<DateTime<Utc>>) -> String {
    ts.map_or_else(|| "-".to_string(), |ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
}
