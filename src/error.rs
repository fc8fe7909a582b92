// src/error.rs

use std::path::PathBuf;

use thiserror::Error;

/// Error kinds the pipeline can surface to the caller.
///
/// All of these are fatal: the tool runs to completion or fails outright,
/// with enough context (source file and failing record index) to diagnose
/// without re-running. No retry policy is defined anywhere.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A source file could not be read or did not parse as a listing array.
    /// Aborts the run with no partial output, since clustering assumes a
    /// complete, validated index space.
    #[error("malformed input in {path}: {detail}")]
    MalformedInput { path: PathBuf, detail: String },

    /// A record came out of adaptation without a usable `title` or `url`.
    /// Aborts ingestion of that source; the core never receives
    /// partially-valid records.
    #[error("record {index} in {path} is missing required field `{field}`")]
    MissingField {
        path: PathBuf,
        index: usize,
        field: &'static str,
    },

    /// The similarity signal could not be computed for a title.
    #[error("similarity oracle unavailable for title {title:?}: {detail}")]
    OracleUnavailable { title: String, detail: String },
}

impl PipelineError {
    pub fn malformed(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::MalformedInput {
            path: path.into(),
            detail: detail.into(),
        }
    }
}
