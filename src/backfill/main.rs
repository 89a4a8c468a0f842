//! Region backfill driver.
//!
//! Reads a CSV export of collision rows, fills in missing regions from
//! coordinates using reference polygons, and writes the updated table.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use regionfill::batch::{write_overlay, Backfill, RecordTable, OVERLAY_DEFAULT_LIMIT};
use regionfill::config::Config;
use regionfill::pip::{load_regions_file, DuplicatePolicy};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "backfill")]
#[command(about = "Fill missing regions from coordinates using reference polygons")]
struct Args {
    /// GeoJSON file with region polygons (.geojson or .geojson.gz)
    #[arg(short, long)]
    regions: PathBuf,

    /// CSV file with the rows to backfill
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the updated CSV
    #[arg(short, long)]
    output: PathBuf,

    /// Optional TOML config with property and column names
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Merge same-named regions instead of failing
    #[arg(long)]
    merge_duplicates: bool,

    /// Also write resolved rows as a GeoJSON point overlay
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Maximum number of points in the overlay
    #[arg(long, default_value_t = OVERLAY_DEFAULT_LIMIT)]
    overlay_limit: usize,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Resolve on a single thread
    #[arg(long)]
    sequential: bool,

    /// Points resolved per progress update
    #[arg(long, default_value = "10000")]
    chunk_size: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Regionfill Backfill");

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    if args.merge_duplicates {
        config.regions.duplicates = DuplicatePolicy::Merge;
    }

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    let regions = load_regions_file(&args.regions, &config.regions)
        .with_context(|| format!("Failed to load regions from {}", args.regions.display()))?;
    if regions.is_empty() {
        anyhow::bail!("No regions found in {}", args.regions.display());
    }
    for region in regions.regions() {
        info!("  {} ({} polygons)", region.name, region.geometry.0.len());
    }

    let mut table = RecordTable::read_path(&args.input, &config.columns)?;

    // Create progress bar
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
            )?
            .progress_chars("#>-"),
    );

    let backfill = Backfill {
        parallel: !args.sequential,
        chunk_size: args.chunk_size,
    };
    let summary = backfill.run_with_progress(&regions, &mut table.records, |done, total| {
        pb.set_length(total as u64);
        pb.set_position(done as u64);
    });
    pb.finish_with_message("Resolution complete");

    summary.log();

    table.write_path(&args.output)?;

    if let Some(path) = &args.overlay {
        let file = File::create(path)
            .with_context(|| format!("Failed to create overlay file {}", path.display()))?;
        let count = write_overlay(&table.records, BufWriter::new(file), Some(args.overlay_limit))?;
        info!("GeoJSON overlay saved: {} ({} points)", path.display(), count);
    }

    Ok(())
}
