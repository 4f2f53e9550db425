//! CSV output format.

use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use pricrpt_types::{InstrumentRecord, LineageRecord, QuoteRecord};
use std::fmt::Display;
use std::io::Write;

use crate::{FormatError, Formatter};

const QUOTE_COLUMNS: [&str; 16] = [
    "trade_date",
    "ticker",
    "snapshot_ts",
    "adjusted_rate",
    "adjusted_price",
    "best_bid",
    "best_ask",
    "last_price",
    "avg_price",
    "min_price",
    "max_price",
    "traded_quantity",
    "instrument_quantity",
    "open_interest",
    "lineage_id",
    "ingestion_ts",
];

const LINEAGE_COLUMNS: [&str; 9] = [
    "lineage_id",
    "outer_archive",
    "inner_archive",
    "document",
    "snapshot_ts",
    "snapshot_ts_origin",
    "digest",
    "rank",
    "ingestion_ts",
];

const INSTRUMENT_COLUMNS: [&str; 5] = [
    "ticker",
    "asset",
    "month_code",
    "contract_year",
    "maturity_date",
];

/// CSV formatter.
///
/// Fields holding the delimiter, a quote or a line break are quoted.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: u8,
    /// Whether to include header row.
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: b',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            include_header: true,
        }
    }

    fn write_table<W, T, const N: usize>(
        &self,
        writer: W,
        columns: [&str; N],
        rows: &[T],
        fields: impl Fn(&T) -> [String; N],
    ) -> Result<(), FormatError>
    where
        W: Write,
    {
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .from_writer(writer);
        if self.include_header {
            writer.write_record(columns)?;
        }
        for row in rows {
            writer.write_record(fields(row))?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn opt<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn ts(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}

impl Formatter for CsvFormatter {
    fn write_quotes<W: Write>(&self, quotes: &[QuoteRecord], writer: W) -> Result<(), FormatError> {
        self.write_table(writer, QUOTE_COLUMNS, quotes, |q| {
            [
                opt(q.trade_date),
                q.ticker.clone(),
                ts(q.snapshot_ts),
                opt(q.adjusted_rate),
                opt(q.adjusted_price),
                opt(q.best_bid),
                opt(q.best_ask),
                opt(q.last_price),
                opt(q.avg_price),
                opt(q.min_price),
                opt(q.max_price),
                opt(q.traded_quantity),
                opt(q.instrument_quantity),
                opt(q.open_interest),
                q.lineage_id.clone(),
                ts(q.ingestion_ts),
            ]
        })
    }

    fn write_lineage<W: Write>(
        &self,
        lineage: &[LineageRecord],
        writer: W,
    ) -> Result<(), FormatError> {
        self.write_table(writer, LINEAGE_COLUMNS, lineage, |l| {
            [
                l.lineage_id.clone(),
                l.outer_archive.clone(),
                l.inner_archive.clone(),
                l.document.clone(),
                l.snapshot_ts.clone(),
                l.snapshot_ts_origin.to_string(),
                l.digest.clone(),
                l.rank.to_string(),
                ts(l.ingestion_ts),
            ]
        })
    }

    fn write_instruments<W: Write>(
        &self,
        instruments: &[InstrumentRecord],
        writer: W,
    ) -> Result<(), FormatError> {
        self.write_table(writer, INSTRUMENT_COLUMNS, instruments, |i| {
            [
                i.ticker().to_string(),
                i.asset().to_string(),
                i.month_code().to_string(),
                i.contract_year().to_string(),
                i.maturity_date().to_string(),
            ]
        })
    }

    fn extension(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use pricrpt_types::{MonthCode, TimestampOrigin};
    use std::io::Cursor;

    fn create_test_quote() -> QuoteRecord {
        let snapshot = Utc.with_ymd_and_hms(2021, 1, 4, 23, 30, 0).unwrap();
        let ingestion = Utc.with_ymd_and_hms(2021, 2, 1, 8, 0, 0).unwrap();
        let mut quote = QuoteRecord::new("DI1F21", snapshot, "out.zip|<inner>|a.xml|ts|ab", ingestion);
        quote.trade_date = NaiveDate::from_ymd_opt(2021, 1, 4);
        quote.adjusted_rate = Some(1.9);
        quote.traded_quantity = Some(10);
        quote
    }

    fn output(write: impl FnOnce(&mut Cursor<Vec<u8>>)) -> String {
        let mut output = Cursor::new(Vec::new());
        write(&mut output);
        String::from_utf8(output.into_inner()).unwrap()
    }

    #[test]
    fn test_csv_quotes() {
        let result = output(|out| {
            CsvFormatter::new()
                .write_quotes(&[create_test_quote()], out)
                .unwrap();
        });
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("trade_date,ticker,snapshot_ts,adjusted_rate"));
        assert_eq!(
            lines[1],
            "2021-01-04,DI1F21,2021-01-04T23:30:00+00:00,1.9,,,,,,,,10,,,out.zip|<inner>|a.xml|ts|ab,2021-02-01T08:00:00+00:00"
        );
    }

    #[test]
    fn test_csv_lineage() {
        let record = LineageRecord {
            lineage_id: "id".to_string(),
            outer_archive: "PR210104_20210104.zip".to_string(),
            inner_archive: "<inner_in_memory.zip>".to_string(),
            document: "a,b.xml".to_string(),
            snapshot_ts: "2021-01-04T23:30:00+00:00".to_string(),
            snapshot_ts_origin: TimestampOrigin::Declared,
            digest: "ff".to_string(),
            rank: 2,
            ingestion_ts: Utc.with_ymd_and_hms(2021, 2, 1, 0, 0, 0).unwrap(),
        };
        let result = output(|out| CsvFormatter::new().write_lineage(&[record], out).unwrap());
        assert!(result.contains("\"a,b.xml\""));
        assert!(result.contains(",declared,ff,2,"));
    }

    #[test]
    fn test_csv_instruments() {
        let record = InstrumentRecord::new(
            "DI1F21",
            "DI1",
            MonthCode::F,
            2021,
            NaiveDate::from_ymd_opt(2021, 1, 4).unwrap(),
        );
        let result = output(|out| CsvFormatter::new().write_instruments(&[record], out).unwrap());
        assert_eq!(
            result,
            "ticker,asset,month_code,contract_year,maturity_date\nDI1F21,DI1,F,2021,2021-01-04\n"
        );
    }

    #[test]
    fn test_csv_quoting() {
        let mut quote = create_test_quote();
        quote.lineage_id = "say \"hi\", twice\nplease".to_string();
        let result = output(|out| {
            CsvFormatter::new()
                .with_header(false)
                .write_quotes(&[quote.clone()], out)
                .unwrap();
        });
        assert!(result.contains(",\"say \"\"hi\"\", twice\nplease\","));

        let tsv = output(|out| {
            CsvFormatter::tsv()
                .with_header(false)
                .write_quotes(&[quote], out)
                .unwrap();
        });
        assert!(tsv.contains("\t\"say \"\"hi\"\", twice\nplease\"\t"));

        let mut plain = create_test_quote();
        plain.lineage_id = "a,b".to_string();
        let tsv = output(|out| CsvFormatter::tsv().write_quotes(&[plain], out).unwrap());
        assert!(tsv.contains("\ta,b\t"));
    }

    #[test]
    fn test_csv_no_header() {
        let result = output(|out| {
            CsvFormatter::new()
                .with_header(false)
                .write_quotes(&[create_test_quote()], out)
                .unwrap();
        });
        assert!(!result.contains("trade_date,ticker"));
        assert_eq!(result.lines().count(), 1);
    }

    #[test]
    fn test_tsv() {
        let result = output(|out| CsvFormatter::tsv().write_quotes(&[], out).unwrap());
        assert!(result.starts_with("trade_date\tticker\tsnapshot_ts"));
    }

    #[test]
    fn test_custom_delimiter() {
        let result = output(|out| {
            CsvFormatter::new()
                .with_delimiter(b';')
                .write_quotes(&[create_test_quote()], out)
                .unwrap();
        });
        assert!(result.contains("2021-01-04;DI1F21;"));
    }
}
