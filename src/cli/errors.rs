use std::path::PathBuf;

use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Could not load preset {}: {source}", path.display())]
    Preset {
        path: PathBuf,
        source: crate::Error,
    },

    #[error("Could not write report {}: {source}", path.display())]
    Report {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Generator(#[from] crate::Error),
}
