//! Content digests and lineage identifiers.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use pricrpt_types::{LineageRecord, TimestampOrigin};
use sha2::{Digest, Sha256};
use std::io::{self, Read};

/// Marker recorded in place of the inner archive path.
///
/// The inner archive is only ever opened in memory, so lineage never
/// carries its on-disk name.
pub const INNER_ARCHIVE_MARKER: &str = "<inner_in_memory.zip>";

/// Default read size used when hashing a document.
pub const DEFAULT_DIGEST_CHUNK: usize = 1024 * 1024;

/// Streams a reader through SHA-256, returning the lowercase hex digest.
///
/// # Errors
///
/// Returns an error if the reader fails.
pub fn digest_reader<R: Read>(mut reader: R, chunk_size: usize) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut chunk = vec![0u8; chunk_size.max(1)];
    loop {
        let read = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        hasher.update(&chunk[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Formats a snapshot timestamp as ISO-8601 with a `+00:00` offset.
///
/// Sub-second digits appear only when present (microsecond precision).
#[must_use]
pub fn snapshot_ts_iso(ts: DateTime<Utc>) -> String {
    let format = if ts.nanosecond() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    ts.to_rfc3339_opts(format, false)
}

/// Builds a lineage identifier:
/// `outer|inner|document|snapshot_ts|digest`.
#[must_use]
pub fn lineage_id(
    outer_archive: &str,
    inner_marker: &str,
    document: &str,
    snapshot_ts: DateTime<Utc>,
    digest: &str,
) -> String {
    format!(
        "{outer_archive}|{inner_marker}|{document}|{}|{digest}",
        snapshot_ts_iso(snapshot_ts)
    )
}

/// Builds lineage for documents of one outer archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageBuilder {
    outer_archive: String,
    inner_marker: String,
}

impl LineageBuilder {
    /// Creates a builder using [`INNER_ARCHIVE_MARKER`].
    #[must_use]
    pub fn new(outer_archive: impl Into<String>) -> Self {
        Self {
            outer_archive: outer_archive.into(),
            inner_marker: INNER_ARCHIVE_MARKER.to_string(),
        }
    }

    /// Lineage identifier of one document.
    #[must_use]
    pub fn lineage_id(&self, document: &str, snapshot_ts: DateTime<Utc>, digest: &str) -> String {
        lineage_id(
            &self.outer_archive,
            &self.inner_marker,
            document,
            snapshot_ts,
            digest,
        )
    }

    /// Full lineage record of one accepted document.
    #[must_use]
    pub fn record(
        &self,
        document: &str,
        snapshot_ts: DateTime<Utc>,
        origin: TimestampOrigin,
        digest: &str,
        rank: usize,
        ingestion_ts: DateTime<Utc>,
    ) -> LineageRecord {
        LineageRecord {
            lineage_id: self.lineage_id(document, snapshot_ts, digest),
            outer_archive: self.outer_archive.clone(),
            inner_archive: self.inner_marker.clone(),
            document: document.to_string(),
            snapshot_ts: snapshot_ts_iso(snapshot_ts),
            snapshot_ts_origin: origin,
            digest: digest.to_string(),
            rank,
            ingestion_ts,
        }
    }
}
