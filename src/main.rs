//! Command-line interface for the GNSS navigation data loader.
//!
//! This binary converts a directory of Android GnssLogger raw logs (`.txt`) and derived
//! measurement exports (`.csv`) to Parquet or CSV.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use gnss_navdata::formats::android::derived_column_map;
use gnss_navdata::{read_derived, CsvWriter, NavData, ParquetWriter, RawLogReaderBuilder, RecordKind};
use log::{info, LevelFilter};
use std::fs;
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputKind {
    Parquet,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    Raw,
    Fix,
    Imu,
}

impl StoreKind {
    fn label(self) -> &'static str {
        match self {
            StoreKind::Raw => "raw",
            StoreKind::Fix => "fix",
            StoreKind::Imu => "imu",
        }
    }

    fn record_kinds(self) -> &'static [RecordKind] {
        match self {
            StoreKind::Raw => &[RecordKind::Raw],
            StoreKind::Fix => &[RecordKind::Fix],
            StoreKind::Imu => &[RecordKind::Accel, RecordKind::Gyro, RecordKind::Mag],
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Convert Android GNSS logs to Parquet or CSV",
    long_about = "Loads Android GnssLogger raw logs (.txt) and derived measurement exports (.csv) \
                  into columnar stores and writes one output per store.\n\n\
                  Raw logs produce `raw`, `fix` and `imu` stores; derived files produce a `derived` store."
)]
struct Args {
    /// Directory containing .txt raw logs and/or .csv derived files
    #[arg(value_name = "IN_DIR")]
    in_dir: String,

    /// Root output directory for converted files
    #[arg(short, long, value_name = "OUT_ROOT")]
    out_root: String,

    /// Number of samples per Parquet file chunk
    #[arg(long, default_value = "50000")]
    chunk_size: usize,

    /// Output format
    #[arg(long, value_enum, default_value = "parquet")]
    format: OutputKind,

    /// Stores to build from raw logs
    #[arg(long, value_enum, value_delimiter = ',', default_values = ["raw", "fix", "imu"])]
    kinds: Vec<StoreKind>,

    /// Print a JSON summary of every store
    #[arg(long)]
    summary: bool,
}

fn write_store(nav: &NavData, label: &str, output_dir: &Path, args: &Args) -> Result<()> {
    if nav.is_empty() {
        info!("   ├─ {}: no samples, skipped", label);
        return Ok(());
    }

    if args.summary {
        println!("{}", serde_json::to_string_pretty(&nav.summary())?);
    }

    let kind_dir = output_dir.join(format!("kind={}", label));
    let map = (label == "derived").then(derived_column_map);

    match args.format {
        OutputKind::Parquet => {
            let mut writer = ParquetWriter::new(&kind_dir).chunk_size(args.chunk_size);
            if let Some(map) = map {
                writer = writer.column_map(map);
            }
            let stats = writer.write_with_stats(nav)?;
            info!("   ├─ {}: {}", label, stats.summary());
        }
        OutputKind::Csv => {
            let mut writer = CsvWriter::new(kind_dir.join(format!("{}.csv", label)));
            if let Some(map) = map {
                writer = writer.column_map(map);
            }
            let path = writer.write(nav)?;
            info!("   ├─ {}: {} samples -> {}", label, nav.len(), path.display());
        }
    }
    Ok(())
}

fn convert_raw_log(input_file: &Path, output_dir: &Path, args: &Args) -> Result<()> {
    let t0 = Instant::now();
    let log = RawLogReaderBuilder::new()
        .kinds(args.kinds.iter().flat_map(|k| k.record_kinds().iter().copied()))
        .from_file(input_file)?;
    let stats = log.stats();
    info!(
        "   ├─ Parsed {} lines ({} headers) in {:.2?}",
        stats.lines,
        stats.headers,
        t0.elapsed()
    );
    for (kind, count) in &stats.records {
        info!("   ├─ {}: {} records", kind, count);
    }
    if stats.dropped() > 0 {
        info!("   ├─ Dropped {} malformed line(s)", stats.dropped());
    }

    let mut written: Vec<StoreKind> = Vec::new();
    for &kind in &args.kinds {
        if written.contains(&kind) {
            continue;
        }
        written.push(kind);
        let nav = match kind {
            StoreKind::Raw => log.raw_gnss()?,
            StoreKind::Fix => log.fixes()?,
            StoreKind::Imu => log.imu()?,
        };
        write_store(&nav, kind.label(), output_dir, args)?;
    }
    Ok(())
}

fn convert_one_file(input_file: &Path, output_dir: &Path, args: &Args) -> Result<()> {
    let file_name = input_file.to_string_lossy();
    info!("📄 Processing: {}", file_name);

    let start_time = Instant::now();

    match input_file.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => {
            let nav = read_derived(input_file)?;
            write_store(&nav, "derived", output_dir, args)?;
        }
        _ => convert_raw_log(input_file, output_dir, args)?,
    }

    info!("   └─ ✓ Total time: {:.2?}\n", start_time.elapsed());

    Ok(())
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    let in_path = Path::new(&args.in_dir);
    let out_path = Path::new(&args.out_root);

    if !in_path.is_dir() {
        anyhow::bail!("'{}' is not a valid directory", args.in_dir);
    }

    // Find all raw logs and derived exports
    let mut input_files: Vec<_> = fs::read_dir(in_path)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("txt") | Some("csv")
            )
        })
        .collect();
    input_files.sort();

    if input_files.is_empty() {
        info!("No .txt or .csv files found in {}", args.in_dir);
        return Ok(());
    }

    info!(
        "📂 Found {} input file(s) in {}",
        input_files.len(),
        args.in_dir
    );
    info!("📁 Output directory: {}", args.out_root);
    info!("");

    let total_start = Instant::now();

    for (idx, input_file) in input_files.iter().enumerate() {
        let file_name = input_file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown");

        info!("[{}/{}]", idx + 1, input_files.len());

        let output_dir = out_path.join(format!("filename={}", file_name));
        fs::create_dir_all(&output_dir)?;

        if let Err(e) = convert_one_file(input_file, &output_dir, &args) {
            log::error!("   └─ ✗ Error: {}", e);
            log::error!("");
            continue;
        }
    }

    info!("🏁 All files processed in {:.2?}", total_start.elapsed());

    Ok(())
}
