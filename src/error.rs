use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the corpus layer. Distance computation itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read corpus file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{hypothesis} lines in the hypothesis, but {reference} lines in the reference")]
    LineCountMismatch { hypothesis: usize, reference: usize },

    #[error("no sentences to score")]
    EmptyCorpus,

    #[error("report serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
