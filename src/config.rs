// src/config.rs

// Minimum similarity score required to unify a candidate listing into a
// cluster. Default mirrors the scraper-side merge pipeline.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.90;

// Where the merged catalog lands when no output path is given.
pub const DEFAULT_OUTPUT_PATH: &str = "merged_catalog.json";
