//! Archive reading and snapshot selection for pricrpt.
//!
//! This crate provides the per-archive pipeline:
//!
//! - [`NestedArchive`] - Opens the outer archive and its single inner archive
//! - [`probe_snapshot_ts`] - Finds the declared snapshot time in a document head
//! - [`rank_candidates`] - Orders candidate documents, newest first
//! - [`QuoteReader`] - Streams quote entries out of a document
//! - [`LineageBuilder`] - Content digest and lineage identifier
//! - [`SnapshotSelector`] - Walks the ranking until a document parses

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pricrpt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod archive;
mod extract;
mod lineage;
mod probe;
mod rank;
mod select;

pub use archive::{ArchiveError, NestedArchive};
pub use extract::{
    DEFAULT_TICKER_PREFIX, ENTRY_ELEMENT, ExtractError, QuoteContext, QuoteReader, parse_decimal,
    parse_integer, parse_quotes, parse_trade_date,
};
pub use lineage::{
    DEFAULT_DIGEST_CHUNK, INNER_ARCHIVE_MARKER, LineageBuilder, digest_reader, lineage_id,
    snapshot_ts_iso,
};
pub use probe::probe_snapshot_ts;
pub use rank::{
    CandidateDocument, LatestPick, NumericSuffix, PickMethod, pick_latest, rank_candidates,
    trailing_number,
};
pub use select::{SelectError, SelectedSnapshot, SelectorConfig, SnapshotSelector};
