//! Injectable template extraction job.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use injectable_extractor::{
    discover_description_files, run_extraction, MemoryTemplateStore, PipelineConfig,
    SqliteTemplateStore, TemplateStore,
};
use injectable_types::RunReport;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let paths = resolve_inputs(&cli)?;
    let config = PipelineConfig {
        batch_size: cli.batch_size,
        ..PipelineConfig::default()
    };

    let report = if cli.dry_run {
        tracing::info!("Dry run: loading into an in-memory catalog");
        extract(&paths, &mut MemoryTemplateStore::new(), &config)?
    } else {
        tracing::info!("Opening catalog {}", cli.db.display());
        let mut store = SqliteTemplateStore::open(&cli.db)
            .with_context(|| format!("Failed opening catalog {}", cli.db.display()))?;
        extract(&paths, &mut store, &config)?
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

fn resolve_inputs(cli: &Cli) -> anyhow::Result<Vec<PathBuf>> {
    if !cli.files.is_empty() {
        if !cli.releases.is_empty() {
            tracing::info!("Reading --file inputs; release directories are ignored");
        }
        return Ok(cli.files.clone());
    }
    if cli.releases.is_empty() {
        bail!("No input: pass --release <DIR> or --file <PATH> (or set INJECTABLE_RELEASE_PATHS)");
    }

    let files = discover_description_files(&cli.releases)
        .context("Failed discovering description files")?;
    if files.is_empty() {
        bail!("No description snapshot files found in the given releases");
    }
    Ok(files.into_iter().map(|f| f.path).collect())
}

fn extract<S: TemplateStore>(
    paths: &[PathBuf],
    store: &mut S,
    config: &PipelineConfig,
) -> anyhow::Result<RunReport> {
    let report = run_extraction(paths, store, config).context("Extraction run failed")?;
    let stats = &report.statistics;

    tracing::info!("Files processed:   {}", stats.files_processed);
    tracing::info!("Records read:      {}", stats.records_read);
    tracing::info!("Injectables found: {}", stats.found);
    tracing::info!("Inserted:          {}", stats.inserted);
    tracing::info!(
        "Skipped:           {} ({} duplicates, {} already in catalog)",
        stats.skipped,
        stats.duplicates,
        stats.existing
    );
    tracing::info!("Errors:            {}", stats.errors);
    tracing::info!(
        "Catalog:           {} -> {} (+{})",
        report.catalog_before,
        report.catalog_after,
        report.catalog_growth()
    );

    Ok(report)
}
