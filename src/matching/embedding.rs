// src/matching/embedding.rs

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::error::PipelineError;
use crate::matching::SimilarityOracle;

/// Cosine similarity over precomputed title embeddings.
///
/// The vectors are batch-computed offline by whatever sentence-embedding
/// model the scraping side runs, and handed to this tool as a JSON map of
/// `title -> [f32, ...]`. Loading happens once, up front; scoring is then a
/// pure in-memory comparison, so a fixed map makes the whole pipeline
/// reproducible.
pub struct EmbeddingOracle {
    vectors: HashMap<String, Vec<f32>>,
}

impl EmbeddingOracle {
    pub fn new(vectors: HashMap<String, Vec<f32>>) -> Self {
        Self { vectors }
    }

    /// Loads the title -> vector map from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| PipelineError::malformed(path, e.to_string()))?;
        let vectors: HashMap<String, Vec<f32>> = serde_json::from_str(&raw)
            .map_err(|e| PipelineError::malformed(path, format!("not a title->vector map: {e}")))?;
        info!(
            "Loaded {} title embeddings from {}",
            vectors.len(),
            path.display()
        );
        Ok(Self::new(vectors))
    }

    fn vector(&self, title: &str) -> Result<&[f32], PipelineError> {
        self.vectors
            .get(title)
            .map(Vec::as_slice)
            .ok_or_else(|| PipelineError::OracleUnavailable {
                title: title.to_string(),
                detail: "no precomputed embedding for this title".to_string(),
            })
    }
}

impl SimilarityOracle for EmbeddingOracle {
    fn name(&self) -> &'static str {
        "embedding"
    }

    fn similarity(&self, a: &str, b: &str) -> Result<f64, PipelineError> {
        let v1 = self.vector(a)?;
        let v2 = self.vector(b)?;
        if v1.len() != v2.len() {
            debug!(
                "Embedding dimension mismatch for {:?} ({}) vs {:?} ({})",
                a,
                v1.len(),
                b,
                v2.len()
            );
            return Err(PipelineError::OracleUnavailable {
                title: b.to_string(),
                detail: format!("embedding dimensions differ ({} vs {})", v1.len(), v2.len()),
            });
        }
        // Sentence embeddings can have slightly negative cosines for
        // unrelated titles; the oracle contract is [0, 1].
        Ok(cosine_similarity(v1, v2).clamp(0.0, 1.0))
    }
}

/// Cosine similarity between two vectors, accumulated in f64.
fn cosine_similarity(v1: &[f32], v2: &[f32]) -> f64 {
    if v1.len() != v2.len() || v1.is_empty() {
        return 0.0;
    }
    let dot_product: f64 = v1
        .iter()
        .zip(v2.iter())
        .map(|(a, b)| (*a as f64) * (*b as f64))
        .sum();
    let norm1_sq: f64 = v1.iter().map(|a| (*a as f64) * (*a as f64)).sum();
    let norm2_sq: f64 = v2.iter().map(|b| (*b as f64) * (*b as f64)).sum();

    if norm1_sq == 0.0 || norm2_sq == 0.0 {
        return 0.0;
    }

    let magnitude = (norm1_sq * norm2_sq).sqrt();
    if magnitude == 0.0 {
        0.0
    } else {
        dot_product / magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oracle() -> EmbeddingOracle {
        let mut vectors = HashMap::new();
        vectors.insert("tata salt".to_string(), vec![1.0, 0.0]);
        vectors.insert("tata salt 1kg".to_string(), vec![0.9, 0.1]);
        vectors.insert("sunflower oil".to_string(), vec![0.0, 1.0]);
        vectors.insert("anti salt".to_string(), vec![-1.0, 0.0]);
        EmbeddingOracle::new(vectors)
    }

    #[test]
    fn parallel_vectors_score_one() {
        let score = oracle().similarity("tata salt", "tata salt").unwrap();
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        let score = oracle().similarity("tata salt", "sunflower oil").unwrap();
        assert!(score.abs() < 1e-9);
    }

    #[test]
    fn negative_cosine_clamps_to_zero() {
        let score = oracle().similarity("tata salt", "anti salt").unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn unknown_title_is_oracle_unavailable() {
        let err = oracle().similarity("tata salt", "never embedded").unwrap_err();
        assert!(matches!(err, PipelineError::OracleUnavailable { .. }));
    }

    #[test]
    fn cosine_of_empty_or_mismatched_is_zero() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
    }
}
