use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

// Import from fecdir-core
use fecdir_core::{
    DirectoryLayout, DirectoryProcessor, ExtractionConfig, LogReporter, OutputNaming,
    ProgressReporter,
};

// Import CLI utilities
use fecdir::ProgressBarReporter;

#[derive(Parser)]
#[command(name = "fecdir")]
#[command(about = "Extract company records from a business directory dump into newline-delimited JSON")]
struct Args {
    /// Directory dump to process (.txt, .html/.xhtml or .pdf)
    #[arg(short, long)]
    filename: Option<PathBuf>,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Print layout: lines or table
    #[arg(long)]
    layout: Option<DirectoryLayout>,

    /// Number of leading title/index pages to skip
    #[arg(long)]
    skip_pages: Option<u32>,

    /// Directory the output file is written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Write `_produced.json` instead of a timestamped file name
    #[arg(long)]
    fixed_name: bool,

    /// Enable detailed profiling of all pipeline steps
    #[arg(long)]
    profile: bool,

    /// Log progress instead of drawing a progress bar
    #[arg(long)]
    no_progress: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    println!("🦀 fecdir directory extractor");

    let filename = require_filename(&args)?;

    // Load config, then apply CLI overrides
    let mut config = ExtractionConfig::load_with_fallback(args.config.as_deref());
    if let Some(config_path) = &args.config {
        println!("📋 Loaded config from: {}", config_path);
    } else {
        println!("📋 Using default config");
    }
    apply_overrides(&mut config, &args);

    println!(
        "📄 Processing: {} ({:?} layout, skipping {} pages)",
        filename.display(),
        config.layout,
        config.effective_skip_pages()
    );

    let mut processor = DirectoryProcessor::new(filename, config).with_profiling(args.profile);
    let mut reporter: Box<dyn ProgressReporter> = if args.no_progress {
        Box::new(LogReporter::default())
    } else {
        Box::new(ProgressBarReporter::new())
    };

    match processor.start_processing_with_reporter(reporter.as_mut()) {
        Ok(destination) => {
            println!("✅ Successfully processed document");
            if let Some(summary) = processor.summary() {
                println!("📊 Extraction summary:");
                println!("   - Pages: {} ({} skipped)", summary.pages_seen, summary.pages_skipped);
                println!("   - Raw records: {}", summary.raw_records);
                println!("   - Records kept: {}", summary.records_kept);
                println!("   - Records dropped: {}", summary.records_dropped());
            }
            println!("💾 Records saved to: {}", destination.display());
            println!("{}", serde_json::to_string(processor.status())?);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Processing failed: {e}");
            println!("{}", serde_json::to_string(processor.status())?);
            std::process::exit(1);
        }
    }
}

/// The input file is the only mandatory argument
fn require_filename(args: &Args) -> Result<PathBuf> {
    let Some(filename) = args.filename.clone() else {
        tracing::error!("missing filename");
        bail!("Bad argument: filename is missing (use -f <path>)");
    };
    Ok(filename)
}

fn apply_overrides(config: &mut ExtractionConfig, args: &Args) {
    if let Some(layout) = args.layout {
        config.layout = layout;
    }
    if let Some(skip_pages) = args.skip_pages {
        config.skip_pages = Some(skip_pages);
    }
    if let Some(output_dir) = &args.output_dir {
        config.output.directory = output_dir.clone();
    }
    if args.fixed_name {
        config.output.naming = OutputNaming::Fixed;
    }
}
