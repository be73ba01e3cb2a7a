//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Configuration problems (bad `io` argument, unknown format, unusable directories)
//! and API contract violations are fatal; per-file compile and write failures are
//! absorbed by the batch driver and never surface through these variants.
use std::path::PathBuf;

use thiserror::Error;

use crate::compiler::CompileError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("Source map error: {0}")]
    SourceMap(String),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Unrecognized format `{value}`. Accepted values are: {accepted}.")]
    UnsupportedFormat { value: String, accepted: String },

    #[error("`{}` is not a directory", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Output directory `{}` is not writable", path.display())]
    DirectoryNotWritable { path: PathBuf },

    #[error("File {} not found in input directory", path.display())]
    UnknownFile { path: PathBuf },

    #[error("CSS file not found for source file {}", path.display())]
    NotCompiled { path: PathBuf },
}

impl Error {
    pub fn source_map<E: std::fmt::Display>(e: E) -> Self {
        Error::SourceMap(e.to_string())
    }
}
