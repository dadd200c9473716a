use std::path::PathBuf;
use thiserror::Error;

/// Document-level failures. Field-level parsing never produces one of these.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no page source for {0} (expected .txt, .html, .xhtml or .pdf)")]
    UnsupportedSource(PathBuf),

    #[error("pdf extraction failed: {0}")]
    Pdf(String),

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ExtractionError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExtractionError::Io {
            path: path.into(),
            source,
        }
    }
}
