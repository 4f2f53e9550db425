//! Holiday list loading.
//!
//! The market association publishes national holidays as a semicolon
//! separated CSV with a header line, the date in the first column:
//!
//! ```text
//! Data;Dia da Semana;Feriado
//! 01/01/2021;sexta-feira;Confraternização Universal
//! ```

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a holiday list.
#[derive(Error, Debug)]
pub enum CalendarError {
    /// Failed to open the holiday file.
    #[error("Failed to open holiday file '{path}': {source}")]
    Open {
        /// The path that could not be opened.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read holiday records.
    #[error("Failed to read holiday list: {0}")]
    Read(#[from] csv::Error),
}

/// Parses holiday dates from the association CSV format.
///
/// The first record is a header and is skipped. Records whose first column
/// is not a `dd/mm/yyyy` date (footers, notes) are ignored, as are blank
/// lines. Fields may be quoted; bytes that are not valid UTF-8 are decoded
/// lossily.
///
/// # Errors
///
/// Returns an error only if the underlying reader fails.
pub fn parse_holidays_csv<R: Read>(reader: R) -> Result<BTreeSet<NaiveDate>, CalendarError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut holidays = BTreeSet::new();
    for record in reader.byte_records() {
        let record = record?;
        let Some(field) = record.get(0) else {
            continue;
        };
        let field = String::from_utf8_lossy(field);
        if let Ok(date) = NaiveDate::parse_from_str(field.trim(), "%d/%m/%Y") {
            holidays.insert(date);
        }
    }

    Ok(holidays)
}

/// Loads a holiday CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn load_holidays(path: &Path) -> Result<BTreeSet<NaiveDate>, CalendarError> {
    let file = File::open(path).map_err(|source| CalendarError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let holidays = parse_holidays_csv(file)?;
    tracing::debug!(path = %path.display(), count = holidays.len(), "loaded holidays");
    Ok(holidays)
}
