//! Snapshot timestamp probing.

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::bytes::Regex;
use std::sync::LazyLock;

static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(20[0-9]{2}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2})Z?")
        .expect("Invalid regex pattern")
});

/// Finds the latest ISO-8601 timestamp in the leading bytes of a document.
///
/// Matches `20YY-MM-DDTHH:MM:SS` with an optional trailing `Z`; every match
/// is read as UTC. Matches that are not real calendar instants (month 13,
/// hour 25) are ignored. Returns `None` when nothing valid is found.
///
/// The bytes need not be valid UTF-8 and may cut a document mid-element.
#[must_use]
pub fn probe_snapshot_ts(head: &[u8]) -> Option<DateTime<Utc>> {
    TIMESTAMP
        .captures_iter(head)
        .filter_map(|caps| {
            let text = std::str::from_utf8(caps.get(1)?.as_bytes()).ok()?;
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").ok()
        })
        .max()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_probe_header_timestamp() {
        let head = b"<BizData><AppHdr><CreDt>2021-01-04T23:30:00Z</CreDt></AppHdr>";
        assert_eq!(probe_snapshot_ts(head), Some(utc(2021, 1, 4, 23, 30, 0)));
    }

    #[test]
    fn test_probe_takes_maximum() {
        let head = b"<a>2021-01-04T10:00:00Z</a><b>2021-01-05T09:00:00</b><c>2021-01-04T23:59:59Z</c>";
        assert_eq!(probe_snapshot_ts(head), Some(utc(2021, 1, 5, 9, 0, 0)));
    }

    #[test]
    fn test_probe_without_z_is_utc() {
        assert_eq!(
            probe_snapshot_ts(b"x2022-03-01T12:00:00y"),
            Some(utc(2022, 3, 1, 12, 0, 0))
        );
    }

    #[test]
    fn test_probe_no_match() {
        assert_eq!(probe_snapshot_ts(b"<BizData><Dt>2021-01-04</Dt>"), None);
        assert_eq!(probe_snapshot_ts(b""), None);
        assert_eq!(probe_snapshot_ts(b"1999-01-04T10:00:00Z"), None);
    }

    #[test]
    fn test_probe_ignores_impossible_instants() {
        let head = b"2021-13-01T00:00:00Z 2021-01-02T03:04:05Z 2021-02-30T00:00:00";
        assert_eq!(probe_snapshot_ts(head), Some(utc(2021, 1, 2, 3, 4, 5)));
    }

    #[test]
    fn test_probe_non_utf8_bytes() {
        let mut head = vec![0xff, 0xfe, b'<'];
        head.extend_from_slice(b"2021-06-30T18:00:00Z");
        head.push(0xc3);
        assert_eq!(probe_snapshot_ts(&head), Some(utc(2021, 6, 30, 18, 0, 0)));
    }
}
