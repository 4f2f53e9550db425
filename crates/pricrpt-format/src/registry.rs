//! Instrument registry persistence.
//!
//! The registry is stored as a JSON array of instrument records. A missing
//! or blank file reads as an empty registry, which is how the first run
//! starts.

use pricrpt_instruments::InstrumentRegistry;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use crate::FormatError;

/// Reads a registry from JSON. Blank input is an empty registry.
///
/// # Errors
///
/// Returns an error if reading fails or the JSON is not an array of
/// instrument records.
pub fn read_registry<R: Read>(mut reader: R) -> Result<InstrumentRegistry, FormatError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    if text.trim().is_empty() {
        return Ok(InstrumentRegistry::new());
    }
    Ok(serde_json::from_str(&text)?)
}

/// Writes a registry as a pretty-printed JSON array in ticker order.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_registry<W: Write>(registry: &InstrumentRegistry, mut writer: W) -> Result<(), FormatError> {
    let records: Vec<_> = registry.iter().collect();
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Loads a registry file; a missing file is an empty registry.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_registry(path: &Path) -> Result<InstrumentRegistry, FormatError> {
    match File::open(path) {
        Ok(file) => read_registry(file),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(InstrumentRegistry::new()),
        Err(err) => Err(err.into()),
    }
}

/// Writes a registry file, creating parent directories.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_registry(registry: &InstrumentRegistry, path: &Path) -> Result<(), FormatError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_registry(registry, BufWriter::new(File::create(path)?))
}
