// src/matching/mod.rs

pub mod embedding;
pub mod lexical;

use crate::error::PipelineError;

/// The similarity signal the clustering engine consumes.
///
/// Implementations score two titles in [0.0, 1.0]. No ordering or
/// transitivity guarantee is assumed by the callers; the backend may be a
/// semantic embedding comparison or a lexical-edit heuristic, and the
/// clustering engine is agnostic to which. The oracle is constructed once
/// per run by the caller and passed in; there is no global instance.
pub trait SimilarityOracle {
    /// Backend name, for logs and the run report.
    fn name(&self) -> &'static str;

    /// Score two titles. Total over non-empty strings for lexical backends;
    /// embedding backends fail with `OracleUnavailable` when a title has no
    /// precomputed vector.
    fn similarity(&self, a: &str, b: &str) -> Result<f64, PipelineError>;

    /// Top-k form: the `k` best-scoring candidates for `title`, as
    /// `(candidate_index, score)` in descending score order. Candidates are
    /// addressed by index rather than by title because scraped titles are
    /// not unique across records.
    ///
    /// The default implementation scores every candidate exhaustively;
    /// backends with an index can override it.
    fn top_matches(
        &self,
        title: &str,
        candidates: &[&str],
        k: usize,
    ) -> Result<Vec<(usize, f64)>, PipelineError> {
        let mut scored = Vec::with_capacity(candidates.len());
        for (idx, candidate) in candidates.iter().enumerate() {
            scored.push((idx, self.similarity(title, candidate)?));
        }
        // Descending by score; ties resolve to the earlier candidate so the
        // result is deterministic for a deterministic backend.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}
