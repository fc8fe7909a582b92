// src/main.rs
use anyhow::{ensure, Context, Result};
use chrono::Utc;
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::time::Instant;
use uuid::Uuid;

use reconcile_lib::{
    clustering, config, ingest,
    matching::{embedding::EmbeddingOracle, lexical::LexicalOracle, SimilarityOracle},
    merge,
    results::{self, PipelineStats},
    writer,
};

/// Reconciles scraped grocery listings from several delivery platforms into
/// one canonical catalog with per-platform prices.
#[derive(Debug, Parser)]
#[command(name = "reconcile", version, about)]
struct Cli {
    /// Platform listing files (JSON arrays). File names containing
    /// "jiomart" are adapted from the flat JioMart shape.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output path for the merged catalog.
    #[arg(short, long, default_value = config::DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Similarity threshold in (0, 1] for unifying two listings.
    #[arg(short, long, default_value_t = config::DEFAULT_SIMILARITY_THRESHOLD)]
    threshold: f64,

    /// Use the oracle's top-k form instead of the exhaustive pairwise scan.
    /// Faster, at the cost of possibly missing matches beyond the window.
    #[arg(long, value_name = "K")]
    top_k: Option<usize>,

    /// Precomputed title-embedding map (JSON object of title -> vector).
    /// Without it the lexical Jaro-Winkler oracle is used.
    #[arg(long, value_name = "PATH")]
    embeddings: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();
    ensure!(
        cli.threshold > 0.0 && cli.threshold <= 1.0,
        "similarity threshold must be in (0, 1], got {}",
        cli.threshold
    );
    if let Some(k) = cli.top_k {
        ensure!(k > 0, "--top-k must be at least 1");
    }

    info!("Starting catalog reconciliation pipeline");
    let start_time = Instant::now();

    let run_id = Uuid::new_v4().to_string();
    let run_timestamp = Utc::now().naive_utc();

    // The oracle is built once here and handed down; the core never
    // constructs or globally caches one.
    let oracle: Box<dyn SimilarityOracle> = match &cli.embeddings {
        Some(path) => Box::new(
            EmbeddingOracle::from_file(path)
                .context("Failed to load precomputed embeddings")?,
        ),
        None => Box::new(LexicalOracle::new()),
    };
    info!(
        "Using {} oracle at threshold {}",
        oracle.name(),
        cli.threshold
    );

    // Phase 1: ingestion
    let phase = Instant::now();
    let records = ingest::load_sources(&cli.inputs).context("Ingestion failed")?;
    let ingest_time = phase.elapsed().as_secs_f64();

    // Phase 2: clustering
    let phase = Instant::now();
    let clusters = match cli.top_k {
        Some(k) => clustering::cluster_records_top_k(&records, oracle.as_ref(), cli.threshold, k),
        None => clustering::cluster_records(&records, oracle.as_ref(), cli.threshold),
    }
    .context("Clustering failed")?;
    let clustering_time = phase.elapsed().as_secs_f64();

    // Phase 3: merge
    let phase = Instant::now();
    let (entries, merge_stats) = merge::merge_clusters(&clusters, &records);
    let merge_time = phase.elapsed().as_secs_f64();

    // Phase 4: output
    let phase = Instant::now();
    writer::write_catalog_file(&entries, &cli.output)
        .with_context(|| format!("Failed to write catalog to {}", cli.output.display()))?;
    let write_time = phase.elapsed().as_secs_f64();

    let stats = PipelineStats {
        run_id,
        run_timestamp,
        oracle: oracle.name(),
        threshold: cli.threshold,
        top_k: cli.top_k,
        total_sources: cli.inputs.len(),
        total_records: records.len(),
        total_entries: entries.len(),
        cluster_stats: results::collect_cluster_stats(&clusters),
        merge_stats,
        ingest_time,
        clustering_time,
        merge_time,
        write_time,
        total_time: start_time.elapsed().as_secs_f64(),
    };

    info!(
        "Pipeline completed in {:.2?}. Processed: {} records, {} clusters, {} entries",
        start_time.elapsed(),
        stats.total_records,
        stats.cluster_stats.total_clusters,
        stats.total_entries
    );
    results::print_report(&stats);

    Ok(())
}
