// src/lib.rs
pub mod clustering;
pub mod config;
pub mod error;
pub mod ingest;
pub mod matching;
pub mod merge;
pub mod models;
pub mod results;
pub mod utils;
pub mod writer;

// Re-export common types for easier access
pub use error::PipelineError;
pub use matching::{embedding::EmbeddingOracle, lexical::LexicalOracle, SimilarityOracle};
pub use models::{
    CanonicalEntry, CanonicalProduct, CanonicalVariant, CatalogVariant, Cluster, PriceEntry,
    PriceValue, ProductRecord, Variant,
};

// Re-export important functionality
pub use clustering::{cluster_records, cluster_records_top_k};
pub use merge::{merge_clusters, reduce_cluster};
