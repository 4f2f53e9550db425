//! Inspect command implementation.
//!
//! Shows how the documents of one archive rank and which signal decided
//! the latest snapshot, without parsing any document.

use anyhow::{Context, Result};
use pricrpt_lib::prelude::*;
use std::path::Path;

use crate::display::format_ts;

/// Print the ranked candidates of an archive and the pick method.
pub(crate) fn inspect(path: &Path, head_bytes: Option<usize>) -> Result<()> {
    let mut config = SelectorConfig::default();
    if let Some(head_bytes) = head_bytes {
        config = config.with_head_bytes(head_bytes);
    }

    let mut archive = NestedArchive::open(path)
        .with_context(|| format!("Failed to open archive {}", path.display()))?;
    let ranked = SnapshotSelector::new(config).rank(&mut archive)?;

    println!("Archive: {}", archive.outer_name());
    println!("Inner:   {}", archive.inner_name());
    println!();
    println!("{:<5} {:<45} {:<20} {:>10}", "RANK", "DOCUMENT", "DECLARED TS", "SUFFIX");
    println!("{}", "-".repeat(83));

    for (idx, candidate) in ranked.iter().enumerate() {
        println!(
            "{:<5} {:<45} {:<20} {:>10}",
            idx + 1,
            candidate.name(),
            format_ts(candidate.declared_ts()),
            candidate.suffix().map_or("-", |s| s.as_str()),
        );
    }

    if let Some(pick) = pick_latest(&ranked) {
        println!();
        println!("Latest: {} (by {})", pick.name, pick.method);
    }

    Ok(())
}
