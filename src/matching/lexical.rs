// src/matching/lexical.rs

use strsim::jaro_winkler;

use crate::error::PipelineError;
use crate::matching::SimilarityOracle;
use crate::utils::normalize_title;

/// String-edit similarity over normalized titles.
///
/// Jaro-Winkler suits listing titles well: the discriminating tokens (brand,
/// product) lead the string and the packaging noise trails it. Scores are
/// already in [0, 1] and the computation is total, so this backend never
/// fails; it is the default when no embedding map is supplied.
#[derive(Debug, Default)]
pub struct LexicalOracle;

impl LexicalOracle {
    pub fn new() -> Self {
        Self
    }
}

impl SimilarityOracle for LexicalOracle {
    fn name(&self) -> &'static str {
        "lexical"
    }

    fn similarity(&self, a: &str, b: &str) -> Result<f64, PipelineError> {
        Ok(jaro_winkler(&normalize_title(a), &normalize_title(b)))
    }
}
