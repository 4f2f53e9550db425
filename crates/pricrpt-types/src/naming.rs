//! Archive file naming conventions.
//!
//! Daily outer archives are named `<prefix>_<YYYYMMDD>.zip`, for example
//! `PR210104_20210104.zip` for trading day 2021-01-04.

use chrono::NaiveDate;
use std::path::Path;

const ARCHIVE_EXT: &[u8] = b".zip";
const DAY_DIGITS: usize = 8;

/// Returns the final path component as a string, or the whole path if it
/// has none.
#[must_use]
pub fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.to_string_lossy().into_owned(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Returns the 8-digit day token of an archive name (`_YYYYMMDD.zip`).
///
/// The extension match is case-insensitive; the token must be preceded by
/// an underscore.
#[must_use]
pub fn archive_day_token(name: &str) -> Option<&str> {
    let bytes = name.as_bytes();
    let n = bytes.len();
    if n < DAY_DIGITS + ARCHIVE_EXT.len() + 1 {
        return None;
    }

    let ext_start = n - ARCHIVE_EXT.len();
    let digits_start = ext_start - DAY_DIGITS;
    if !bytes[ext_start..].eq_ignore_ascii_case(ARCHIVE_EXT)
        || !bytes[digits_start..ext_start].iter().all(u8::is_ascii_digit)
        || bytes[digits_start - 1] != b'_'
    {
        return None;
    }

    name.get(digits_start..ext_start)
}

/// Returns the trading day encoded in an archive name.
///
/// Tokens that are not a real calendar date yield `None`.
#[must_use]
pub fn archive_trading_day(name: &str) -> Option<NaiveDate> {
    archive_day_token(name).and_then(|token| NaiveDate::parse_from_str(token, "%Y%m%d").ok())
}
