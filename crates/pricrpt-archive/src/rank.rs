//! Candidate document ranking.
//!
//! Ranking is a pure function of the candidates: declared snapshot
//! timestamp first, then the numeric filename suffix, then the name itself,
//! all descending.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::archive::has_suffix;

const XML_EXT: &str = ".xml";

/// Digits immediately before a document's `.xml` extension.
///
/// Stored as a digit string with leading zeros stripped so that arbitrarily
/// long runs still compare numerically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NumericSuffix(String);

impl NumericSuffix {
    /// Builds a suffix from ASCII digits. Returns `None` for an empty or
    /// non-digit string.
    #[must_use]
    pub fn from_digits(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let trimmed = digits.trim_start_matches('0');
        let canonical = if trimmed.is_empty() { "0" } else { trimmed };
        Some(Self(canonical.to_string()))
    }

    /// Returns the canonical digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the value if it fits in a `u64`.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl Ord for NumericSuffix {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for NumericSuffix {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for NumericSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the digits immediately before a trailing `.xml` (any case).
///
/// ```
/// use pricrpt_archive::trailing_number;
///
/// assert_eq!(trailing_number("BVBG.086.01_file_12.xml").unwrap().to_u64(), Some(12));
/// assert!(trailing_number("BVBG.086.01_file.xml").is_none());
/// ```
#[must_use]
pub fn trailing_number(name: &str) -> Option<NumericSuffix> {
    if !has_suffix(name, XML_EXT) {
        return None;
    }
    let stem = &name[..name.len() - XML_EXT.len()];
    let start = stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    NumericSuffix::from_digits(&stem[start..])
}

/// One candidate snapshot document inside an inner archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateDocument {
    name: String,
    declared_ts: Option<DateTime<Utc>>,
    suffix: Option<NumericSuffix>,
}

impl CandidateDocument {
    /// Creates a candidate, deriving the numeric suffix from the name.
    #[must_use]
    pub fn new(name: impl Into<String>, declared_ts: Option<DateTime<Utc>>) -> Self {
        let name = name.into();
        let suffix = trailing_number(&name);
        Self {
            name,
            declared_ts,
            suffix,
        }
    }

    /// Returns the member name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the timestamp probed from the document head, if any.
    #[must_use]
    pub const fn declared_ts(&self) -> Option<DateTime<Utc>> {
        self.declared_ts
    }

    /// Returns the numeric filename suffix, if any.
    #[must_use]
    pub const fn suffix(&self) -> Option<&NumericSuffix> {
        self.suffix.as_ref()
    }

    #[allow(clippy::type_complexity)]
    fn rank_key(&self) -> (bool, Option<DateTime<Utc>>, bool, Option<&NumericSuffix>, &str) {
        (
            self.declared_ts.is_some(),
            self.declared_ts,
            self.suffix.is_some(),
            self.suffix.as_ref(),
            &self.name,
        )
    }
}

/// Orders candidates from most to least likely to be the latest snapshot.
///
/// The result does not depend on input order.
#[must_use]
pub fn rank_candidates(mut candidates: Vec<CandidateDocument>) -> Vec<CandidateDocument> {
    candidates.sort_by(|a, b| b.rank_key().cmp(&a.rank_key()));
    candidates
}

/// Which signal decided the top-ranked candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickMethod {
    /// A timestamp was found in the document head.
    HeaderTs,
    /// No timestamp; the numeric filename suffix decided.
    NameSuffix,
    /// Neither signal; the name decided.
    Lexicographic,
}

impl PickMethod {
    /// Returns the method label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HeaderTs => "header_ts",
            Self::NameSuffix => "name_suffix",
            Self::Lexicographic => "lexicographic",
        }
    }
}

impl fmt::Display for PickMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The top-ranked candidate and the signal that put it there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestPick {
    /// Member name of the pick.
    pub name: String,
    /// Declared snapshot timestamp, when the header decided.
    pub declared_ts: Option<DateTime<Utc>>,
    /// Deciding signal.
    pub method: PickMethod,
}

/// Reports the first of an already ranked candidate list.
///
/// Returns `None` for an empty list.
#[must_use]
pub fn pick_latest(ranked: &[CandidateDocument]) -> Option<LatestPick> {
    let first = ranked.first()?;
    let method = if first.declared_ts.is_some() {
        PickMethod::HeaderTs
    } else if first.suffix.is_some() {
        PickMethod::NameSuffix
    } else {
        PickMethod::Lexicographic
    };
    Some(LatestPick {
        name: first.name.clone(),
        declared_ts: first.declared_ts,
        method,
    })
}
