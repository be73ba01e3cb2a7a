//! Stylesheet compilation behind the `StyleCompiler` seam.
//!
//! The batch driver only needs "SCSS text in, CSS text out" with a handful of
//! settings; `GrassCompiler` provides that on top of the `grass` crate, adding
//! line annotations, precision control and the compact/nested formatters.
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::params::BatchConfig;
use crate::types::OutputStyle;

pub mod annotate;
pub mod backend;
pub mod format;

pub use backend::GrassCompiler;

/// Failure reported by a compiler for one source file
#[derive(Debug, Clone, Error)]
#[error("Failed to compile {}: {message}", path.display())]
pub struct CompileError {
    pub path: PathBuf,
    pub message: String,
}

impl CompileError {
    pub fn new<E: std::fmt::Display>(path: &Path, e: E) -> Self {
        Self {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Emit `/* line N, path */` annotations
    pub line_numbers: bool,
    pub precision: u32,
    pub style: OutputStyle,
    /// Directories searched when resolving `@import` and `@use`
    pub import_paths: Vec<PathBuf>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            line_numbers: false,
            precision: 5,
            style: OutputStyle::Compact,
            import_paths: Vec::new(),
        }
    }
}

impl From<&BatchConfig> for CompilerOptions {
    fn from(config: &BatchConfig) -> Self {
        Self {
            line_numbers: config.line_numbers,
            precision: config.precision,
            style: config.format,
            import_paths: vec![config.input_dir.clone()],
        }
    }
}

/// Turns stylesheet source text into CSS
pub trait StyleCompiler {
    /// Compile `source`, read from `path`, into CSS text.
    fn compile(&self, source: &str, path: &Path) -> Result<String, CompileError>;
}
