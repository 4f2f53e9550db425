//! Monthly trusted table construction.

use chrono::{DateTime, Utc};
use derive_more::Display;
use pricrpt_archive::{NestedArchive, SelectError, SnapshotSelector};
use pricrpt_calendar::FirstBusinessDayLookup;
use pricrpt_instruments::{InstrumentError, InstrumentRegistry, InstrumentResolver};
use pricrpt_types::{
    LineageRecord, QuoteRecord, YearMonth, YearMonthError, archive_day_token,
    archive_trading_day, file_name,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::BuildConfig;

/// Errors that abort a build.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrustedError {
    /// A contract seen in the month could not be resolved.
    #[error("Instrument resolution failed: {0}")]
    Instrument(#[from] InstrumentError),

    /// The requested month range is empty or inverted.
    #[error("Invalid month range: {0}")]
    InvalidRange(#[from] YearMonthError),
}

/// Non-fatal events recorded while building a month.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A lower-ranked document was accepted.
    #[display("fallback applied in {archive}: {document} (rank {rank})")]
    FallbackApplied {
        /// Outer archive name.
        archive: String,
        /// Accepted document.
        document: String,
        /// One-based rank of the accepted document.
        rank: usize,
    },

    /// No document of the archive could be used; the day has no data.
    #[display("day {day} skipped: no parseable document in {archive}")]
    DaySkipped {
        /// Outer archive name.
        archive: String,
        /// `YYYYMMDD` token, or `unknown`.
        day: String,
    },

    /// The archive itself could not be read.
    #[display("archive {archive} failed: {reason}")]
    ArchiveFailed {
        /// Outer archive name.
        archive: String,
        /// Error message.
        reason: String,
    },
}

/// Tables produced for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthOutput {
    /// The month built.
    pub year_month: YearMonth,
    /// Ingestion timestamp of the run.
    pub ingestion_ts: DateTime<Utc>,
    /// Quotes of every accepted snapshot, in archive order.
    pub quotes: Vec<QuoteRecord>,
    /// One lineage record per accepted snapshot.
    pub lineage: Vec<LineageRecord>,
    /// Previous registry plus the contracts first seen this month.
    pub registry: InstrumentRegistry,
    /// Number of contracts resolved this month.
    pub resolved: usize,
    /// Fallbacks, skipped days and unreadable archives.
    pub diagnostics: Vec<Diagnostic>,
}

impl MonthOutput {
    /// Returns the number of days skipped for lack of a parseable document.
    #[must_use]
    pub fn skipped_days(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::DaySkipped { .. }))
            .count()
    }
}

/// Returns the archives whose file name dates fall in `year_month`, sorted
/// by file name.
///
/// Paths without an `_YYYYMMDD.zip` suffix naming a real date are ignored.
pub fn archives_for_month<P: AsRef<Path>>(archives: &[P], year_month: YearMonth) -> Vec<PathBuf> {
    let mut selected: Vec<(String, PathBuf)> = archives
        .iter()
        .filter_map(|path| {
            let path: &Path = path.as_ref();
            let name = file_name(path);
            let day = archive_trading_day(&name)?;
            year_month
                .contains(day)
                .then(|| (name, path.to_path_buf()))
        })
        .collect();
    selected.sort();
    selected.into_iter().map(|(_, path)| path).collect()
}

/// Builds monthly trusted tables from daily archives.
#[derive(Debug)]
pub struct MonthlyTrustedBuilder<'a, L: ?Sized> {
    config: BuildConfig,
    selector: SnapshotSelector,
    resolver: InstrumentResolver,
    calendar: &'a L,
}

impl<'a, L> MonthlyTrustedBuilder<'a, L>
where
    L: FirstBusinessDayLookup + ?Sized,
{
    /// Creates a builder resolving maturities against `calendar`.
    #[must_use]
    pub fn new(config: BuildConfig, calendar: &'a L) -> Self {
        let selector =
            SnapshotSelector::new(config.selector.clone()).with_ticker_prefix(config.asset.clone());
        let resolver = InstrumentResolver::new(config.asset.clone());
        Self {
            config,
            selector,
            resolver,
            calendar,
        }
    }

    /// Returns the build configuration.
    #[must_use]
    pub const fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Builds one month.
    ///
    /// Archives outside the month are ignored. Unreadable archives and days
    /// without a parseable document are recorded as diagnostics and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`TrustedError::Instrument`] if a contract first seen this
    /// month cannot be resolved.
    pub fn build_month<P: AsRef<Path>>(
        &self,
        archives: &[P],
        year_month: YearMonth,
        previous: InstrumentRegistry,
    ) -> Result<MonthOutput, TrustedError> {
        let ingestion_ts = self.config.clock.now();
        let paths = archives_for_month(archives, year_month);
        tracing::info!(month = %year_month, archives = paths.len(), "building month");

        let mut quotes = Vec::new();
        let mut lineage = Vec::new();
        let mut resolved = InstrumentRegistry::new();
        let mut diagnostics = Vec::new();

        for path in &paths {
            let name = file_name(path);
            let mut archive = match NestedArchive::open(path) {
                Ok(archive) => archive,
                Err(err) => {
                    tracing::error!(archive = %name, error = %err, "archive unreadable; skipping");
                    diagnostics.push(Diagnostic::ArchiveFailed {
                        archive: name,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let selected = match self.selector.select(&mut archive, ingestion_ts) {
                Ok(selected) => selected,
                Err(SelectError::NoParseableCandidate { archive, day }) => {
                    diagnostics.push(Diagnostic::DaySkipped { archive, day });
                    continue;
                }
                Err(SelectError::NoCandidates { archive }) => {
                    let day = archive_day_token(&archive).unwrap_or("unknown").to_string();
                    tracing::warn!(archive = %archive, day = %day, "day skipped: archive holds no documents");
                    diagnostics.push(Diagnostic::DaySkipped { archive, day });
                    continue;
                }
            };

            if selected.is_fallback() {
                diagnostics.push(Diagnostic::FallbackApplied {
                    archive: name,
                    document: selected.candidate.name().to_string(),
                    rank: selected.rank,
                });
            }

            for quote in &selected.quotes {
                if !resolved.contains(&quote.ticker) {
                    resolved.insert(self.resolver.resolve(&quote.ticker, self.calendar)?);
                }
            }
            lineage.push(selected.lineage);
            quotes.extend(selected.quotes);
        }

        let resolved_count = resolved.len();
        let mut registry = previous;
        registry.merge(resolved);

        tracing::info!(
            month = %year_month,
            quotes = quotes.len(),
            snapshots = lineage.len(),
            resolved = resolved_count,
            registry = registry.len(),
            diagnostics = diagnostics.len(),
            "month built"
        );

        Ok(MonthOutput {
            year_month,
            ingestion_ts,
            quotes,
            lineage,
            registry,
            resolved: resolved_count,
            diagnostics,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use pricrpt_calendar::FirstBusinessDays;
    use std::io::{Cursor, Write};
    use std::path::{Path, PathBuf};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn zip_bytes(members: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in members {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    /// Writes an outer archive embedding one inner archive of documents.
    pub(crate) fn write_archive(
        dir: &Path,
        outer: &str,
        inner: &str,
        documents: &[(&str, String)],
    ) -> PathBuf {
        let docs: Vec<(&str, &[u8])> = documents
            .iter()
            .map(|(name, text)| (*name, text.as_bytes()))
            .collect();
        let inner_bytes = zip_bytes(&docs);
        let path = dir.join(outer);
        std::fs::write(&path, zip_bytes(&[(inner, &inner_bytes)])).unwrap();
        path
    }

    pub(crate) fn document(tickers: &[&str], created: &str) -> String {
        let entries: String = tickers
            .iter()
            .map(|ticker| {
                format!(
                    "<PricRpt><TradDt><Dt>2021-01-04</Dt></TradDt>\
                     <SctyId><TckrSymb>{ticker}</TckrSymb></SctyId>\
                     <TradDtls><TradQty>10</TradQty></TradDtls>\
                     <FinInstrmAttrbts><AdjstdQtTax>1.23</AdjstdQtTax><AdjstdQt>1000</AdjstdQt></FinInstrmAttrbts>\
                     </PricRpt>"
                )
            })
            .collect();
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <BizData xmlns=\"urn:bvmf.217.01.xsd\"><AppHdr><CreDt>{created}</CreDt></AppHdr>\
             <Document>{entries}</Document></BizData>\n"
        )
    }

    pub(crate) fn mismatched(created: &str) -> String {
        format!(
            "<BizData xmlns=\"urn:bvmf.217.01.xsd\"><AppHdr><CreDt>{created}</CreDt></AppHdr>\
             <Document><PricRpt><SctyId><TckrSymb>DI1F21</TckrSymb></SctyId>\
             <FinInstrmAttrbts><AdjstdQtTax>1.23</AdjstdQtTax><AdjstdQt>1000/AdjstdQt>\
             </FinInstrmAttrbts></PricRpt></Document></BizData>"
        )
    }

    /// First business days from Jan 2021 through Dec 2023.
    pub(crate) fn calendar() -> FirstBusinessDays {
        [
            "2021-01-04", "2021-02-01", "2021-03-01", "2021-04-01", "2021-05-03",
            "2021-06-01", "2021-07-01", "2021-08-02", "2021-09-01", "2021-10-01",
            "2021-11-01", "2021-12-01", "2022-01-03", "2022-07-01", "2023-01-02",
        ]
        .iter()
        .map(|s| s.parse::<NaiveDate>().unwrap())
        .fold(FirstBusinessDays::new(), |mut days, date| {
            days.insert(date);
            days
        })
    }
}
