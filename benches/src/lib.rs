//! Synthetic price report fixtures for pricrpt benchmarks.

use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;

/// Month codes cycled through when generating tickers.
const MONTH_CODES: [char; 12] = ['F', 'G', 'H', 'J', 'K', 'M', 'N', 'Q', 'U', 'V', 'X', 'Z'];

/// Builds a price report document with `entries` entries.
///
/// Every third entry belongs to another asset family so the extractor has
/// entries to drop.
pub fn synthetic_document(entries: usize, created: &str) -> String {
    let mut doc = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <BizData xmlns=\"urn:bvmf.217.01.xsd\">\n\
         <AppHdr><CreDt>{created}</CreDt></AppHdr>\n<Document>\n"
    );
    for idx in 0..entries {
        let family = if idx % 3 == 2 { "DOL" } else { "DI1" };
        let code = MONTH_CODES[idx % MONTH_CODES.len()];
        let year = 21 + (idx / MONTH_CODES.len()) % 20;
        doc.push_str(&format!(
            "<PricRpt>\
             <TradDt><Dt>2021-01-04</Dt></TradDt>\
             <SctyId><TckrSymb>{family}{code}{year:02}</TckrSymb></SctyId>\
             <TradDtls><TradQty>{idx}</TradQty></TradDtls>\
             <FinInstrmAttrbts>\
             <OpnIntrst>{idx}</OpnIntrst>\
             <BestBidPric>2,{idx}</BestBidPric>\
             <BestAskPric>2,{idx}5</BestAskPric>\
             <AdjstdQtTax>1.{idx}</AdjstdQtTax>\
             <AdjstdQt>99999,{idx}</AdjstdQt>\
             </FinInstrmAttrbts>\
             </PricRpt>\n"
        ));
    }
    doc.push_str("</Document>\n</BizData>\n");
    doc
}

fn zip_members(members: &[(String, Vec<u8>)]) -> Result<Vec<u8>, ZipError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in members {
        writer.start_file(name.as_str(), SimpleFileOptions::default())?;
        writer.write_all(data)?;
    }
    Ok(writer.finish()?.into_inner())
}

/// Builds a nested daily archive holding `documents` snapshots of
/// `entries` entries each. The newest snapshot is truncated so selection
/// has to fall back once.
///
/// # Errors
///
/// Returns an error if writing either archive fails.
pub fn synthetic_archive(documents: usize, entries: usize) -> Result<Vec<u8>, ZipError> {
    let mut members = Vec::with_capacity(documents);
    for idx in 0..documents {
        let created = format!("2021-01-04T{:02}:00:00Z", 10 + idx % 12);
        let mut doc = synthetic_document(entries, &created);
        if idx + 1 == documents {
            doc.truncate(doc.len() / 2);
        }
        members.push((format!("BVBG.086.01_BV000328202101040328{idx:06}.xml"), doc.into_bytes()));
    }
    let inner = zip_members(&members)?;
    zip_members(&[("PR210104.zip".to_string(), inner)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_document_shape() {
        let doc = synthetic_document(6, "2021-01-04T18:00:00Z");
        assert_eq!(doc.matches("<PricRpt>").count(), 6);
        assert_eq!(doc.matches("<TckrSymb>DOL").count(), 2);
        assert!(doc.contains("<CreDt>2021-01-04T18:00:00Z</CreDt>"));
    }

    #[test]
    fn test_synthetic_archive_builds() {
        let bytes = synthetic_archive(3, 10).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
