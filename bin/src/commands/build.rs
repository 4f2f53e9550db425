//! Build command implementation.
//!
//! Runs the monthly trusted build over a directory of daily archives and
//! writes one quote table and one lineage table per month, plus the
//! instrument registry carried into the next run.

use anyhow::{Context, Result, bail};
use pricrpt_lib::prelude::*;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::display::{Format, parse_month, print_month_summary, write_month_tables};

/// Years past the last built month covered by the maturity lookup.
const MATURITY_HORIZON_YEARS: i32 = 40;

/// Registry file name inside the output directory.
const REGISTRY_FILE: &str = "instruments.json";

/// Arguments of `pricrpt build`.
pub(crate) struct BuildArgs {
    pub(crate) archives: PathBuf,
    pub(crate) holidays: PathBuf,
    pub(crate) start: String,
    pub(crate) end: Option<String>,
    pub(crate) registry: Option<PathBuf>,
    pub(crate) output: PathBuf,
    pub(crate) format: Format,
    pub(crate) config: Option<PathBuf>,
    pub(crate) asset: Option<String>,
    pub(crate) head_bytes: Option<usize>,
    pub(crate) quiet: bool,
}

/// List the `*.zip` files of a directory, sorted by path.
fn list_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read archive directory {}", dir.display()))?;

    let mut archives = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_zip = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
        if is_zip && path.is_file() {
            archives.push(path);
        }
    }
    archives.sort();
    Ok(archives)
}

/// Load a JSON build configuration, or the defaults.
fn load_config(path: Option<&Path>) -> Result<BuildConfig> {
    let Some(path) = path else {
        return Ok(BuildConfig::default());
    };
    let file =
        File::open(path).with_context(|| format!("Failed to open config {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid config {}", path.display()))
}

/// Apply command-line overrides on top of the loaded configuration.
fn apply_overrides(
    mut config: BuildConfig,
    asset: Option<&str>,
    head_bytes: Option<usize>,
) -> BuildConfig {
    if let Some(asset) = asset {
        config = config.with_asset(asset);
    }
    if let Some(head_bytes) = head_bytes {
        let selector = config.selector.clone().with_head_bytes(head_bytes);
        config = config.with_selector(selector);
    }
    config
}

/// Run the build and write every month's tables.
pub(crate) fn build(args: &BuildArgs) -> Result<()> {
    let start = parse_month(&args.start)?;
    let end = match &args.end {
        Some(end) => parse_month(end)?,
        None => start,
    };
    if start > end {
        bail!("Start month {start} is after end month {end}");
    }

    let config = apply_overrides(
        load_config(args.config.as_deref())?,
        args.asset.as_deref(),
        args.head_bytes,
    );

    let holidays = load_holidays(&args.holidays)
        .with_context(|| format!("Failed to load holidays from {}", args.holidays.display()))?;
    let calendar = BusinessDayCalendar::with_holidays(holidays);
    let horizon = YearMonth::new(end.year() + MATURITY_HORIZON_YEARS, 12)?;
    let lookup = calendar.first_business_days(start, horizon)?;

    let registry_path = args
        .registry
        .clone()
        .unwrap_or_else(|| args.output.join(REGISTRY_FILE));
    let previous = load_registry(&registry_path)
        .with_context(|| format!("Failed to load registry {}", registry_path.display()))?;

    let archives = list_archives(&args.archives)?;
    tracing::info!(
        archives = archives.len(),
        %start,
        %end,
        known_instruments = previous.len(),
        "starting build"
    );

    let builder = MonthlyTrustedBuilder::new(config, &lookup);
    let output = builder.build_range(&archives, start, end, previous)?;

    fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    for month in output.months.values() {
        let (quotes_path, lineage_path) = write_month_tables(month, &args.output, args.format)?;
        tracing::debug!(
            quotes = %quotes_path.display(),
            lineage = %lineage_path.display(),
            "wrote month tables"
        );
        if !args.quiet {
            print_month_summary(month);
        }
    }

    let out_registry = args.output.join(REGISTRY_FILE);
    save_registry(&output.registry, &out_registry)
        .with_context(|| format!("Failed to write registry {}", out_registry.display()))?;

    if !args.quiet {
        println!(
            "\nBuilt {} month(s): {} quotes, {} instruments -> {}",
            output.months.len(),
            output.quote_count(),
            output.registry.len(),
            args.output.display()
        );
    }

    Ok(())
}
