//! Provenance records for selected snapshot documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a snapshot timestamp came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampOrigin {
    /// Found in the document head while ranking candidates.
    Declared,
    /// Found by probing the document head again at selection time.
    Reprobed,
    /// Not declared; the ingestion timestamp was used instead.
    Ingestion,
}

impl TimestampOrigin {
    /// Returns the origin as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Declared => "declared",
            Self::Reprobed => "reprobed",
            Self::Ingestion => "ingestion",
        }
    }

    /// Returns true if the document itself carried the timestamp.
    #[must_use]
    pub const fn is_declared(&self) -> bool {
        !matches!(self, Self::Ingestion)
    }
}

impl std::fmt::Display for TimestampOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable audit row for one selected snapshot document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageRecord {
    /// Composite identifier `outer|inner|document|snapshot_ts|digest`.
    pub lineage_id: String,
    /// File name of the daily outer archive.
    pub outer_archive: String,
    /// Marker naming the embedded inner archive.
    pub inner_archive: String,
    /// Name of the selected document inside the inner archive.
    pub document: String,
    /// Snapshot timestamp in RFC 3339 form.
    pub snapshot_ts: String,
    /// Whether the snapshot timestamp was declared or inferred.
    pub snapshot_ts_origin: TimestampOrigin,
    /// SHA-256 hex digest of the document bytes.
    pub digest: String,
    /// Rank position at which the document was accepted (1 = top).
    pub rank: usize,
    /// When the pipeline run started (UTC).
    pub ingestion_ts: DateTime<Utc>,
}

impl LineageRecord {
    /// Returns true if a lower-ranked candidate had to be used.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.rank > 1
    }
}
