// src/main.rs
use std::path::PathBuf;

use clap::Parser;
use program_extractor::exams::SharedExamDirectory;
use program_extractor::fetch::HttpFetcher;
use program_extractor::manifest::{self, Manifest, RunMetadata};
use program_extractor::pipeline::{self, BatchSettings};
use program_extractor::storage::StorageManager;
use program_extractor::utils::{self, html_debug, AppError};
use program_extractor::RunConfig;

const DEFAULT_EXAM_DIRECTORY_URL: &str = "https://ba.hse.ru/minkrit";

/// Command Line Interface for the program page extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with the campus and the list of programs to process
    #[arg(short, long, default_value = "config/programs_moscow.json")]
    config: PathBuf,

    /// Output directory for raw pages, parsed records and the manifest
    #[arg(short, long, default_value = "data/moscow")]
    output: PathBuf,

    /// Process only the first N programs
    #[arg(short, long)]
    limit: Option<usize>,

    /// Admission year stamped on every record
    #[arg(long, default_value_t = 2025)]
    admission_year: u32,

    /// Page with the minimum exam scores per program
    #[arg(long, default_value = DEFAULT_EXAM_DIRECTORY_URL)]
    exam_directory_url: String,

    /// Debug mode - verbose logs and annotated copies of every page
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Parse CLI Arguments and set up logging (reads RUST_LOG env var)
    let args = Args::parse();
    utils::logging::setup_logging(args.debug);
    tracing::info!("Starting processing for args: {:?}", args);

    let started_at = chrono::Utc::now().to_rfc3339();

    // 2. Load configuration; nothing is fetched if this fails
    let mut run_config = RunConfig::load(&args.config)?;
    run_config.truncate(args.limit);
    tracing::info!("Processing {} programs for campus '{}'", run_config.programs.len(), run_config.campus);

    // 3. Initialize storage, fetcher and the lazily built exam directory
    let storage = StorageManager::new(&args.output)?;
    let fetcher = HttpFetcher::new()?;
    let directory = SharedExamDirectory::new(args.exam_directory_url.as_str());

    let settings = BatchSettings {
        campus: run_config.campus.clone(),
        admission_year: args.admission_year,
    };

    // 4. Process each program, persisting as we go
    let outcome = pipeline::run_batch(&fetcher, &directory, &run_config.programs, &settings, |slug, raw, record| {
        if let Err(e) = storage.save_raw(slug, raw) {
            tracing::error!("Failed to save raw page for {}: {}", slug, e);
        }
        match storage.save_record(slug, record) {
            Ok(path) => tracing::debug!("Saved record to: {}", path.display()),
            Err(e) => tracing::error!("Failed to save record for {}: {}", slug, e),
        }
        if args.debug {
            let annotated = storage
                .debug_path(slug)
                .and_then(|path| html_debug::save_annotated(&String::from_utf8_lossy(raw), &path));
            if let Err(e) = annotated {
                tracing::warn!("Failed to create debug HTML for {}: {}", slug, e);
            }
        }
    })
    .await;

    // 5. Aggregate and persist the run outputs
    storage.save_all(&outcome.records)?;

    let metadata = RunMetadata {
        campus: run_config.campus.clone(),
        admission_year: args.admission_year,
        config_path: args.config.display().to_string(),
        output_dir: args.output.display().to_string(),
        started_at,
    };
    let manifest = manifest::build_manifest(
        &outcome.records,
        &outcome.download_failed,
        &metadata,
        &chrono::Utc::now().to_rfc3339(),
    );
    storage.save_manifest(&manifest)?;

    log_summary(&manifest);
    Ok(())
}

fn log_summary(manifest: &Manifest) {
    let stats = &manifest.statistics;
    tracing::info!(
        "Pipeline v{} finished. Total: {}, success: {}, partial: {}, failed: {}, download failed: {}",
        manifest.pipeline_version,
        stats.total,
        stats.success,
        stats.partial,
        stats.failed,
        manifest.download_failed.len()
    );

    for (field, coverage) in manifest.field_coverage.iter() {
        tracing::info!("  {:<16} {}/{} ({}%)", field, coverage.count, coverage.total, coverage.percent);
    }
}
