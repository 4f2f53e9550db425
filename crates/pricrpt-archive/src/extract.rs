//! Streaming quote extraction from price report documents.
//!
//! Documents are walked event by event; only the text of the tracked
//! fields of the entry currently open is held in memory.

use chrono::{DateTime, NaiveDate, Utc};
use pricrpt_types::QuoteRecord;
use quick_xml::Reader;
use quick_xml::encoding::Decoder;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use std::io::BufRead;
use std::sync::Arc;
use thiserror::Error;

/// Local name of one price report entry.
pub const ENTRY_ELEMENT: &str = "PricRpt";

/// Ticker prefix of the contracts extracted by default.
pub const DEFAULT_TICKER_PREFIX: &str = "DI1";

/// Errors that can occur while extracting quotes.
#[derive(Error, Debug, Clone)]
pub enum ExtractError {
    /// The document is not well-formed.
    #[error("Malformed document at byte {position}: {message}")]
    Structural {
        /// Byte offset where the problem was detected.
        position: u64,
        /// Description of the problem.
        message: String,
    },

    /// The underlying stream failed.
    #[error("Failed to read document: {0}")]
    Io(Arc<std::io::Error>),
}

/// Values stamped on every quote extracted from one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteContext {
    /// Resolved snapshot timestamp of the document.
    pub snapshot_ts: DateTime<Utc>,
    /// Lineage identifier of the document.
    pub lineage_id: String,
    /// Start of the pipeline run.
    pub ingestion_ts: DateTime<Utc>,
    /// Only entries whose ticker starts with this are kept.
    pub ticker_prefix: String,
}

impl QuoteContext {
    /// Creates a context keeping `DI1` tickers.
    #[must_use]
    pub fn new(
        snapshot_ts: DateTime<Utc>,
        lineage_id: impl Into<String>,
        ingestion_ts: DateTime<Utc>,
    ) -> Self {
        Self {
            snapshot_ts,
            lineage_id: lineage_id.into(),
            ingestion_ts,
            ticker_prefix: DEFAULT_TICKER_PREFIX.to_string(),
        }
    }

    /// Sets the ticker prefix filter.
    #[must_use]
    pub fn with_ticker_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ticker_prefix = prefix.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    TradeDate,
    Ticker,
    TradedQuantity,
    OpenInterest,
    InstrumentQuantity,
    BestBid,
    BestAsk,
    LastPrice,
    AvgPrice,
    MinPrice,
    MaxPrice,
    AdjustedPrice,
    AdjustedRate,
}

const FIELD_COUNT: usize = 13;

const FIELD_PATHS: [(&[u8], &[u8], Field); FIELD_COUNT] = [
    (b"TradDt", b"Dt", Field::TradeDate),
    (b"SctyId", b"TckrSymb", Field::Ticker),
    (b"TradDtls", b"TradQty", Field::TradedQuantity),
    (b"FinInstrmAttrbts", b"OpnIntrst", Field::OpenInterest),
    (b"FinInstrmAttrbts", b"FinInstrmQty", Field::InstrumentQuantity),
    (b"FinInstrmAttrbts", b"BestBidPric", Field::BestBid),
    (b"FinInstrmAttrbts", b"BestAskPric", Field::BestAsk),
    (b"FinInstrmAttrbts", b"LastPric", Field::LastPrice),
    (b"FinInstrmAttrbts", b"TradAvrgPric", Field::AvgPrice),
    (b"FinInstrmAttrbts", b"MinPric", Field::MinPrice),
    (b"FinInstrmAttrbts", b"MaxPric", Field::MaxPrice),
    (b"FinInstrmAttrbts", b"AdjstdQt", Field::AdjustedPrice),
    (b"FinInstrmAttrbts", b"AdjstdQtTax", Field::AdjustedRate),
];

fn field_at(group: &[u8], leaf: &[u8]) -> Option<Field> {
    FIELD_PATHS
        .iter()
        .find(|(g, l, _)| *g == group && *l == leaf)
        .map(|(_, _, field)| *field)
}

/// Rejects a start tag with an undecodable name or malformed attributes.
fn check_start(start: &BytesStart<'_>, decoder: Decoder) -> Result<(), String> {
    decoder
        .decode(start.name().as_ref())
        .map_err(|err| err.to_string())?;
    for attr in start.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        decoder
            .decode(attr.key.as_ref())
            .map_err(|err| err.to_string())?;
        let value = decoder.decode(&attr.value).map_err(|err| err.to_string())?;
        unescape(&value).map_err(|err| err.to_string())?;
    }
    Ok(())
}

/// Captured text of one entry.
#[derive(Debug, Default)]
struct EntryValues([Option<String>; FIELD_COUNT]);

impl EntryValues {
    fn push(&mut self, field: Field, text: &str) {
        self.0[field as usize]
            .get_or_insert_with(String::new)
            .push_str(text);
    }

    fn text(&self, field: Field) -> Option<&str> {
        self.0[field as usize]
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn decimal(&self, field: Field) -> Option<f64> {
        self.text(field).and_then(parse_decimal)
    }

    fn integer(&self, field: Field) -> Option<i64> {
        self.text(field).and_then(parse_integer)
    }
}

/// An open element inside the current entry.
#[derive(Debug)]
struct Frame {
    name: Vec<u8>,
    /// Reached only through first-of-name children from the entry root.
    first_path: bool,
    field: Option<Field>,
    children: Vec<Vec<u8>>,
}

enum Step {
    Continue,
    EntryClosed(EntryValues),
    Eof,
}

/// Well-formedness bookkeeping plus the current entry's frames.
#[derive(Debug, Default)]
struct Walker {
    depth: usize,
    seen_root: bool,
    frames: Vec<Frame>,
    values: EntryValues,
}

impl Walker {
    fn handle(&mut self, event: Event<'_>, decoder: Decoder) -> Result<Step, String> {
        match event {
            Event::Start(start) => {
                check_start(&start, decoder)?;
                self.open(start.local_name().as_ref(), true)?;
            }
            Event::Empty(start) => {
                check_start(&start, decoder)?;
                self.open(start.local_name().as_ref(), false)?;
            }
            Event::End(_) => return self.close(),
            Event::Text(text) => {
                let text = text.unescape().map_err(|err| err.to_string())?;
                if self.depth == 0 {
                    if !text.chars().all(char::is_whitespace) {
                        return Err("text outside the root element".to_string());
                    }
                } else if let Some(field) = self.capturing() {
                    self.values.push(field, &text);
                }
            }
            Event::CData(data) => {
                let text = decoder.decode(&data).map_err(|err| err.to_string())?;
                if let Some(field) = self.capturing() {
                    self.values.push(field, &text);
                }
            }
            Event::Comment(comment) => {
                decoder.decode(&comment).map_err(|err| err.to_string())?;
            }
            Event::Eof => {
                if self.depth > 0 {
                    return Err(format!("{} unclosed element(s) at end of document", self.depth));
                }
                if !self.seen_root {
                    return Err("no element found".to_string());
                }
                return Ok(Step::Eof);
            }
            _ => {}
        }
        Ok(Step::Continue)
    }

    fn open(&mut self, name: &[u8], has_body: bool) -> Result<(), String> {
        if self.depth == 0 {
            if self.seen_root {
                return Err("content after the root element".to_string());
            }
            self.seen_root = true;
        }
        if has_body {
            self.depth += 1;
        }

        let level = self.frames.len();
        if let Some(parent) = self.frames.last_mut() {
            let first = !parent.children.iter().any(|child| child == name);
            if first {
                parent.children.push(name.to_vec());
            }
            let first_path = parent.first_path && first;
            let field = if first_path && level == 2 {
                field_at(&parent.name, name)
            } else {
                None
            };
            if has_body {
                self.frames.push(Frame {
                    name: name.to_vec(),
                    first_path,
                    field,
                    children: Vec::new(),
                });
            }
        } else if has_body && name == ENTRY_ELEMENT.as_bytes() {
            self.values = EntryValues::default();
            self.frames.push(Frame {
                name: name.to_vec(),
                first_path: true,
                field: None,
                children: Vec::new(),
            });
        }
        Ok(())
    }

    fn close(&mut self) -> Result<Step, String> {
        self.depth = self
            .depth
            .checked_sub(1)
            .ok_or_else(|| "end tag without start tag".to_string())?;
        if self.frames.pop().is_some() && self.frames.is_empty() {
            return Ok(Step::EntryClosed(std::mem::take(&mut self.values)));
        }
        Ok(Step::Continue)
    }

    /// Field whose text is being read: the innermost frame, before any child.
    fn capturing(&self) -> Option<Field> {
        let frame = self.frames.last()?;
        if frame.children.is_empty() {
            frame.field
        } else {
            None
        }
    }
}

/// Streams quotes out of one price report document.
///
/// Yields one record per entry whose ticker starts with the context's
/// prefix. A malformed document yields a single error, after which the
/// iterator is exhausted. Quotes yielded before the error must be treated
/// as unreliable by the caller.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use pricrpt_archive::{QuoteContext, QuoteReader};
///
/// let xml = "<BizData><PricRpt><SctyId><TckrSymb>DI1F21</TckrSymb></SctyId>\
///            <FinInstrmAttrbts><AdjstdQtTax>1,9</AdjstdQtTax></FinInstrmAttrbts>\
///            </PricRpt></BizData>";
/// let ts = Utc.with_ymd_and_hms(2021, 1, 4, 23, 30, 0).unwrap();
/// let context = QuoteContext::new(ts, "lineage", ts);
///
/// let quotes: Vec<_> = QuoteReader::new(xml.as_bytes(), context)
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(quotes[0].ticker, "DI1F21");
/// assert_eq!(quotes[0].adjusted_rate, Some(1.9));
/// ```
pub struct QuoteReader<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    walker: Walker,
    context: QuoteContext,
    finished: bool,
}

impl<R: BufRead> QuoteReader<R> {
    /// Creates a reader over a document stream.
    pub fn new(reader: R, context: QuoteContext) -> Self {
        let mut reader = Reader::from_reader(reader);
        let config = reader.config_mut();
        config.check_end_names = true;
        config.expand_empty_elements = false;
        Self {
            reader,
            buf: Vec::new(),
            walker: Walker::default(),
            context,
            finished: false,
        }
    }

    /// Returns the context stamped on each quote.
    #[must_use]
    pub const fn context(&self) -> &QuoteContext {
        &self.context
    }

    fn advance(&mut self) -> Result<Option<QuoteRecord>, ExtractError> {
        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(quick_xml::Error::Io(err)) => return Err(ExtractError::Io(err)),
                Err(err) => {
                    return Err(ExtractError::Structural {
                        position: self.reader.error_position(),
                        message: err.to_string(),
                    });
                }
            };
            let decoder = self.reader.decoder();
            let step = self
                .walker
                .handle(event, decoder)
                .map_err(|message| ExtractError::Structural {
                    position: self.reader.buffer_position(),
                    message,
                })?;
            match step {
                Step::Continue => {}
                Step::EntryClosed(values) => {
                    if let Some(quote) = self.build(&values) {
                        return Ok(Some(quote));
                    }
                }
                Step::Eof => return Ok(None),
            }
        }
    }

    fn build(&self, values: &EntryValues) -> Option<QuoteRecord> {
        let ticker = values.text(Field::Ticker)?;
        if !ticker.starts_with(self.context.ticker_prefix.as_str()) {
            return None;
        }

        let mut quote = QuoteRecord::new(
            ticker,
            self.context.snapshot_ts,
            self.context.lineage_id.clone(),
            self.context.ingestion_ts,
        );
        quote.trade_date = values.text(Field::TradeDate).and_then(parse_trade_date);
        quote.adjusted_rate = values.decimal(Field::AdjustedRate);
        quote.adjusted_price = values.decimal(Field::AdjustedPrice);
        quote.best_bid = values.decimal(Field::BestBid);
        quote.best_ask = values.decimal(Field::BestAsk);
        quote.last_price = values.decimal(Field::LastPrice);
        quote.avg_price = values.decimal(Field::AvgPrice);
        quote.min_price = values.decimal(Field::MinPrice);
        quote.max_price = values.decimal(Field::MaxPrice);
        quote.traded_quantity = values.integer(Field::TradedQuantity);
        quote.instrument_quantity = values.integer(Field::InstrumentQuantity);
        quote.open_interest = values.integer(Field::OpenInterest);
        Some(quote)
    }
}

impl<R: BufRead> Iterator for QuoteReader<R> {
    type Item = Result<QuoteRecord, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.advance() {
            Ok(Some(quote)) => Some(Ok(quote)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

impl<R> std::fmt::Debug for QuoteReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteReader")
            .field("context", &self.context)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

/// Reads a whole document, failing on the first structural error.
///
/// # Errors
///
/// Returns the first [`ExtractError`] encountered; no quotes are returned
/// in that case.
pub fn parse_quotes<R: BufRead>(
    reader: R,
    context: QuoteContext,
) -> Result<Vec<QuoteRecord>, ExtractError> {
    QuoteReader::new(reader, context).collect()
}

/// Parses a decimal that may use `,` as separator. Empty or non-numeric
/// input gives `None`.
#[must_use]
pub fn parse_decimal(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.replace(',', ".").parse().ok()
}

/// Parses a base-10 integer. Empty or non-numeric input gives `None`.
#[must_use]
pub fn parse_integer(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

/// Parses an ISO `YYYY-MM-DD` date.
#[must_use]
pub fn parse_trade_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}
