//! Snapshot selection with fallback across candidate documents.

use chrono::{DateTime, Utc};
use pricrpt_types::{LineageRecord, QuoteRecord, TimestampOrigin, archive_day_token};
use serde::{Deserialize, Serialize};
use std::io::BufReader;
use thiserror::Error;

use crate::archive::{ArchiveError, NestedArchive};
use crate::extract::{DEFAULT_TICKER_PREFIX, ExtractError, QuoteContext, parse_quotes};
use crate::lineage::{DEFAULT_DIGEST_CHUNK, LineageBuilder};
use crate::probe::probe_snapshot_ts;
use crate::rank::{CandidateDocument, rank_candidates};

/// Configuration for snapshot selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Bytes read from the start of each document when probing timestamps.
    pub head_bytes: usize,
    /// Read size when hashing a document.
    pub digest_chunk_size: usize,
    /// Member name suffix of candidate documents (case-insensitive).
    pub document_suffix: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            head_bytes: 64_000,
            digest_chunk_size: DEFAULT_DIGEST_CHUNK,
            document_suffix: ".xml".to_string(),
        }
    }
}

impl SelectorConfig {
    /// Sets the probe size.
    #[must_use]
    pub const fn with_head_bytes(mut self, head_bytes: usize) -> Self {
        self.head_bytes = head_bytes;
        self
    }

    /// Sets the digest read size.
    #[must_use]
    pub const fn with_digest_chunk_size(mut self, chunk_size: usize) -> Self {
        self.digest_chunk_size = chunk_size;
        self
    }

    /// Sets the candidate document suffix.
    #[must_use]
    pub fn with_document_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.document_suffix = suffix.into();
        self
    }
}

/// Errors that end selection for one archive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// The inner archive holds no candidate documents.
    #[error("No candidate documents in '{archive}'")]
    NoCandidates {
        /// Name of the outer archive.
        archive: String,
    },

    /// Every candidate failed to parse.
    #[error("No parseable document in '{archive}' (day {day})")]
    NoParseableCandidate {
        /// Name of the outer archive.
        archive: String,
        /// `YYYYMMDD` token from the archive name, or `unknown`.
        day: String,
    },
}

#[derive(Error, Debug)]
enum CandidateError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// The accepted document of one archive, with everything extracted from it.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedSnapshot {
    /// The accepted candidate.
    pub candidate: CandidateDocument,
    /// One-based position in the ranking; above 1 means fallback.
    pub rank: usize,
    /// Number of ranked candidates.
    pub candidate_count: usize,
    /// Resolved snapshot timestamp.
    pub snapshot_ts: DateTime<Utc>,
    /// Where the timestamp came from.
    pub origin: TimestampOrigin,
    /// SHA-256 hex digest of the document.
    pub digest: String,
    /// Lineage of the document.
    pub lineage: LineageRecord,
    /// Quotes extracted from the document.
    pub quotes: Vec<QuoteRecord>,
}

impl SelectedSnapshot {
    /// Returns true if a higher-ranked candidate was rejected.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.rank > 1
    }
}

/// Picks the latest parseable snapshot document of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSelector {
    config: SelectorConfig,
    ticker_prefix: String,
}

impl Default for SnapshotSelector {
    fn default() -> Self {
        Self::new(SelectorConfig::default())
    }
}

impl SnapshotSelector {
    /// Creates a selector extracting `DI1` quotes.
    #[must_use]
    pub fn new(config: SelectorConfig) -> Self {
        Self {
            config,
            ticker_prefix: DEFAULT_TICKER_PREFIX.to_string(),
        }
    }

    /// Sets the ticker prefix of extracted quotes.
    #[must_use]
    pub fn with_ticker_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ticker_prefix = prefix.into();
        self
    }

    /// Returns the selector configuration.
    #[must_use]
    pub const fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Lists the archive's candidate documents, probing each head.
    ///
    /// A head that cannot be read leaves the candidate without a declared
    /// timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::NoCandidates`] if there are no documents.
    pub fn discover(&self, archive: &mut NestedArchive) -> Result<Vec<CandidateDocument>, SelectError> {
        let names = archive.documents(&self.config.document_suffix);
        if names.is_empty() {
            return Err(SelectError::NoCandidates {
                archive: archive.outer_name().to_string(),
            });
        }

        let candidates = names
            .into_iter()
            .map(|name| {
                let declared = match archive.read_head(&name, self.config.head_bytes) {
                    Ok(head) => probe_snapshot_ts(&head),
                    Err(err) => {
                        tracing::debug!(
                            archive = archive.outer_name(),
                            document = %name,
                            error = %err,
                            "head unreadable; ranking without timestamp"
                        );
                        None
                    }
                };
                CandidateDocument::new(name, declared)
            })
            .collect();
        Ok(candidates)
    }

    /// Returns the archive's candidates, best first.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::NoCandidates`] if there are no documents.
    pub fn rank(&self, archive: &mut NestedArchive) -> Result<Vec<CandidateDocument>, SelectError> {
        let ranked = rank_candidates(self.discover(archive)?);
        tracing::debug!(
            archive = archive.outer_name(),
            ranked = ?ranked.iter().map(CandidateDocument::name).collect::<Vec<_>>(),
            "ranked candidates"
        );
        Ok(ranked)
    }

    /// Walks the ranked candidates and returns the first that parses.
    ///
    /// A candidate that fails is logged and skipped; anything extracted from
    /// it is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::NoCandidates`] for an archive without
    /// documents and [`SelectError::NoParseableCandidate`] if every
    /// candidate fails.
    pub fn select(
        &self,
        archive: &mut NestedArchive,
        ingestion_ts: DateTime<Utc>,
    ) -> Result<SelectedSnapshot, SelectError> {
        let ranked = self.rank(archive)?;
        let candidate_count = ranked.len();
        let lineage = LineageBuilder::new(archive.outer_name());

        for (idx, candidate) in ranked.into_iter().enumerate() {
            let rank = idx + 1;
            match self.accept(archive, &lineage, &candidate, rank, ingestion_ts) {
                Ok((snapshot_ts, origin, digest, lineage, quotes)) => {
                    if rank > 1 {
                        tracing::info!(
                            archive = archive.outer_name(),
                            document = candidate.name(),
                            rank,
                            "fallback applied: selected older parseable document"
                        );
                    }
                    return Ok(SelectedSnapshot {
                        candidate,
                        rank,
                        candidate_count,
                        snapshot_ts,
                        origin,
                        digest,
                        lineage,
                        quotes,
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        archive = archive.outer_name(),
                        document = candidate.name(),
                        rank,
                        error = %err,
                        "document parse failed; trying fallback"
                    );
                }
            }
        }

        let day = archive_day_token(archive.outer_name()).unwrap_or("unknown");
        tracing::warn!(
            archive = archive.outer_name(),
            day,
            "day skipped: no parseable document in archive"
        );
        Err(SelectError::NoParseableCandidate {
            archive: archive.outer_name().to_string(),
            day: day.to_string(),
        })
    }

    #[allow(clippy::type_complexity)]
    fn accept(
        &self,
        archive: &mut NestedArchive,
        lineage: &LineageBuilder,
        candidate: &CandidateDocument,
        rank: usize,
        ingestion_ts: DateTime<Utc>,
    ) -> Result<(DateTime<Utc>, TimestampOrigin, String, LineageRecord, Vec<QuoteRecord>), CandidateError>
    {
        let name = candidate.name();
        let (snapshot_ts, origin) = match candidate.declared_ts() {
            Some(ts) => (ts, TimestampOrigin::Declared),
            None => {
                let head = archive.read_head(name, self.config.head_bytes)?;
                match probe_snapshot_ts(&head) {
                    Some(ts) => (ts, TimestampOrigin::Reprobed),
                    None => (ingestion_ts, TimestampOrigin::Ingestion),
                }
            }
        };

        let digest = archive.member_digest(name, self.config.digest_chunk_size)?;
        let record = lineage.record(name, snapshot_ts, origin, &digest, rank, ingestion_ts);
        let context = QuoteContext::new(snapshot_ts, record.lineage_id.clone(), ingestion_ts)
            .with_ticker_prefix(self.ticker_prefix.clone());

        let quotes = parse_quotes(BufReader::new(archive.open_member(name)?), context)?;
        Ok((snapshot_ts, origin, digest, record, quotes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::test_support::nested_bytes;
    use crate::extract::fixtures::{bad_entity_document, mismatched_document, valid_document};
    use crate::lineage::{INNER_ARCHIVE_MARKER, digest_reader};
    use chrono::TimeZone;
    use std::io::Cursor;

    const OUTER: &str = "PR210104_20210104.zip";

    fn ingestion() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 2, 1, 12, 0, 0).unwrap()
    }

    fn archive(documents: &[(&str, &str)]) -> NestedArchive {
        NestedArchive::from_bytes(OUTER, nested_bytes("PR210104.zip", documents)).unwrap()
    }

    #[test]
    fn test_selects_latest_declared_snapshot() {
        let older = valid_document("DI1F21", "2021-01-04T20:00:00Z");
        let newer = valid_document("DI1F22", "2021-01-04T23:30:00Z");
        let mut archive = archive(&[
            ("BVBG.086.01_file_1.xml", &newer),
            ("BVBG.086.01_file_2.xml", &older),
        ]);

        let selected = SnapshotSelector::default()
            .select(&mut archive, ingestion())
            .unwrap();
        assert_eq!(selected.candidate.name(), "BVBG.086.01_file_1.xml");
        assert_eq!(selected.rank, 1);
        assert!(!selected.is_fallback());
        assert_eq!(selected.candidate_count, 2);
        assert_eq!(selected.origin, TimestampOrigin::Declared);
        assert_eq!(
            selected.snapshot_ts,
            Utc.with_ymd_and_hms(2021, 1, 4, 23, 30, 0).unwrap()
        );
        assert_eq!(selected.quotes.len(), 1);
        assert_eq!(selected.quotes[0].ticker, "DI1F22");
    }

    #[test]
    fn test_fallback_to_next_parseable_document() {
        let bad = mismatched_document("DI1F21", "2021-01-04T23:31:00Z");
        let good = valid_document("DI1F21", "2021-01-04T23:30:00Z");
        let mut archive = archive(&[
            ("BVBG.086.01_file_2.xml", &bad),
            ("BVBG.086.01_file_1.xml", &good),
        ]);

        let selected = SnapshotSelector::default()
            .select(&mut archive, ingestion())
            .unwrap();
        assert_eq!(selected.candidate.name(), "BVBG.086.01_file_1.xml");
        assert_eq!(selected.rank, 2);
        assert!(selected.is_fallback());
        assert_eq!(selected.lineage.rank, 2);
        assert_eq!(selected.lineage.document, "BVBG.086.01_file_1.xml");
        assert_eq!(selected.quotes.len(), 1);
        assert_eq!(selected.quotes[0].ticker, "DI1F21");
    }

    #[test]
    fn test_fallback_past_undefined_entity() {
        let bad = bad_entity_document("DI1F22", "2021-01-04T23:31:00Z");
        let good = valid_document("DI1F21", "2021-01-04T23:30:00Z");
        let mut archive = archive(&[
            ("BVBG.086.01_file_2.xml", &bad),
            ("BVBG.086.01_file_1.xml", &good),
        ]);

        let selected = SnapshotSelector::default()
            .select(&mut archive, ingestion())
            .unwrap();
        assert_eq!(selected.rank, 2);
        assert_eq!(selected.candidate.name(), "BVBG.086.01_file_1.xml");
        assert_eq!(selected.quotes[0].ticker, "DI1F21");
    }

    #[test]
    fn test_quotes_of_failed_candidate_are_discarded() {
        let partial = "<BizData><AppHdr><CreDt>2021-01-04T23:59:00Z</CreDt></AppHdr>\
                       <PricRpt><SctyId><TckrSymb>DI1N99</TckrSymb></SctyId></PricRpt>\
                       <PricRpt><SctyId></TckrSymb></SctyId></PricRpt></BizData>";
        let good = valid_document("DI1F21", "2021-01-04T23:30:00Z");
        let mut archive = archive(&[("a_2.xml", partial), ("a_1.xml", &good)]);

        let selected = SnapshotSelector::default()
            .select(&mut archive, ingestion())
            .unwrap();
        assert_eq!(selected.rank, 2);
        let tickers: Vec<_> = selected.quotes.iter().map(|q| q.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["DI1F21"]);
    }

    #[test]
    fn test_no_parseable_candidate() {
        let bad = mismatched_document("DI1F21", "2021-01-04T23:31:00Z");
        let mut archive = archive(&[("BVBG.086.01_file_2.xml", &bad)]);

        let err = SnapshotSelector::default()
            .select(&mut archive, ingestion())
            .unwrap_err();
        assert_eq!(
            err,
            SelectError::NoParseableCandidate {
                archive: OUTER.to_string(),
                day: "20210104".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_day_token() {
        let bad = mismatched_document("DI1F21", "2021-01-04T23:31:00Z");
        let bytes = nested_bytes("in.zip", &[("doc.xml", &bad)]);
        let mut archive = NestedArchive::from_bytes("undated.zip", bytes).unwrap();
        match SnapshotSelector::default().select(&mut archive, ingestion()) {
            Err(SelectError::NoParseableCandidate { day, .. }) => assert_eq!(day, "unknown"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_no_candidates() {
        let mut archive = archive(&[("readme.txt", "hello")]);
        let err = SnapshotSelector::default()
            .select(&mut archive, ingestion())
            .unwrap_err();
        assert_eq!(
            err,
            SelectError::NoCandidates {
                archive: OUTER.to_string()
            }
        );
    }

    #[test]
    fn test_missing_timestamp_uses_ingestion_time() {
        let doc = "<BizData><PricRpt><SctyId><TckrSymb>DI1F21</TckrSymb></SctyId></PricRpt></BizData>";
        let mut archive = archive(&[("doc.xml", doc)]);

        let selected = SnapshotSelector::default()
            .select(&mut archive, ingestion())
            .unwrap();
        assert_eq!(selected.origin, TimestampOrigin::Ingestion);
        assert_eq!(selected.snapshot_ts, ingestion());
        assert_eq!(selected.quotes[0].snapshot_ts, ingestion());
        assert_eq!(selected.lineage.snapshot_ts, "2021-02-01T12:00:00+00:00");
    }

    #[test]
    fn test_timestamp_beyond_probe_window_is_not_declared() {
        let late = valid_document("DI1F21", "2021-01-04T23:59:00Z");
        let early = valid_document("DI1F22", "2021-01-04T08:00:00Z");
        let mut archive = archive(&[("f_1.xml", &late), ("f_2.xml", &early)]);

        let selector = SnapshotSelector::new(SelectorConfig::default().with_head_bytes(16));
        let ranked = selector.rank(&mut archive).unwrap();
        assert!(ranked.iter().all(|c| c.declared_ts().is_none()));
        assert_eq!(ranked[0].name(), "f_2.xml");

        let selected = selector.select(&mut archive, ingestion()).unwrap();
        assert_eq!(selected.candidate.name(), "f_2.xml");
        assert_eq!(selected.origin, TimestampOrigin::Ingestion);
    }

    #[test]
    fn test_unprobed_candidate_is_reprobed() {
        let doc = valid_document("DI1F21", "2021-01-04T23:30:00Z");
        let mut archive = archive(&[("f_1.xml", &doc)]);
        let selector = SnapshotSelector::default();
        let lineage = LineageBuilder::new(archive.outer_name());
        let unprobed = CandidateDocument::new("f_1.xml", None);

        let (snapshot_ts, origin, _, record, quotes) = selector
            .accept(&mut archive, &lineage, &unprobed, 1, ingestion())
            .unwrap();
        assert_eq!(origin, TimestampOrigin::Reprobed);
        assert_eq!(snapshot_ts, Utc.with_ymd_and_hms(2021, 1, 4, 23, 30, 0).unwrap());
        assert_eq!(record.snapshot_ts_origin, TimestampOrigin::Reprobed);
        assert_eq!(quotes[0].snapshot_ts, snapshot_ts);
    }

    #[test]
    fn test_lineage_binds_quotes_and_digest() {
        let doc = valid_document("DI1F21", "2021-01-04T23:30:00Z");
        let mut archive = archive(&[("BVBG.086.01_file_1.xml", &doc)]);

        let selected = SnapshotSelector::default()
            .select(&mut archive, ingestion())
            .unwrap();
        let expected_digest = digest_reader(Cursor::new(doc.as_bytes()), 7).unwrap();
        assert_eq!(selected.digest, expected_digest);
        assert_eq!(selected.lineage.digest, expected_digest);
        assert_eq!(selected.lineage.inner_archive, INNER_ARCHIVE_MARKER);
        assert_eq!(selected.lineage.outer_archive, OUTER);
        assert_eq!(
            selected.lineage.lineage_id,
            format!(
                "{OUTER}|<inner_in_memory.zip>|BVBG.086.01_file_1.xml|2021-01-04T23:30:00+00:00|{expected_digest}"
            )
        );
        for quote in &selected.quotes {
            assert_eq!(quote.lineage_id, selected.lineage.lineage_id);
            assert_eq!(quote.ingestion_ts, ingestion());
        }
    }

    #[test]
    fn test_ticker_prefix_is_applied() {
        let doc = valid_document("DOLF21", "2021-01-04T23:30:00Z");
        let mut archive = archive(&[("doc.xml", &doc)]);

        let di1 = SnapshotSelector::default()
            .select(&mut archive, ingestion())
            .unwrap();
        assert!(di1.quotes.is_empty());

        let dol = SnapshotSelector::default()
            .with_ticker_prefix("DOL")
            .select(&mut archive, ingestion())
            .unwrap();
        assert_eq!(dol.quotes.len(), 1);
    }

    #[test]
    fn test_document_suffix_and_digest_chunk_size() {
        let doc = valid_document("DI1F21", "2021-01-04T23:30:00Z");
        let mut archive = archive(&[("report.xml", "<broken"), ("report_1.pr", &doc)]);

        let config = SelectorConfig::default()
            .with_document_suffix(".PR")
            .with_digest_chunk_size(3);
        let selected = SnapshotSelector::new(config)
            .select(&mut archive, ingestion())
            .unwrap();
        assert_eq!(selected.candidate.name(), "report_1.pr");
        assert_eq!(selected.candidate_count, 1);
        assert_eq!(
            selected.digest,
            digest_reader(Cursor::new(doc.as_bytes()), 4096).unwrap()
        );
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: SelectorConfig = serde_json::from_str(r#"{"head_bytes": 1024}"#).unwrap();
        assert_eq!(config.head_bytes, 1024);
        assert_eq!(config.digest_chunk_size, DEFAULT_DIGEST_CHUNK);
        assert_eq!(config.document_suffix, ".xml");
    }
}
