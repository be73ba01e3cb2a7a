//! Source map production from annotated CSS.
//!
//! `scan` turns `/* line N, path */` annotations back into positions and
//! `MapBuilder` hands them to the `sourcemap` crate for encoding.
use serde::{Deserialize, Serialize};
use sourcemap::SourceMapBuilder;

use crate::error::{Error, Result};

pub mod scan;

pub use scan::{Rebaser, Stripped, scan_annotations, strip_annotations};

/// One generated position mapped back to its source. Lines are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub generated_line: u32,
    pub generated_column: u32,
    pub original_line: u32,
    pub original_column: u32,
    pub original_file: String,
}

/// Accumulates mappings for one compiled file
pub struct MapBuilder {
    inner: SourceMapBuilder,
    len: usize,
}

impl MapBuilder {
    /// Start an empty map for the compiled file named `file`.
    pub fn new(file: &str) -> Self {
        Self {
            inner: SourceMapBuilder::new(Some(file)),
            len: 0,
        }
    }

    pub fn add_mapping(&mut self, mapping: &Mapping) {
        // The encoder counts lines from zero
        self.inner.add(
            mapping.generated_line.saturating_sub(1),
            mapping.generated_column,
            mapping.original_line.saturating_sub(1),
            mapping.original_column,
            Some(mapping.original_file.as_str()),
            None,
            false,
        );
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Serialize the accumulated mappings as a source map v3 JSON document.
    pub fn contents(self) -> Result<String> {
        let map = self.inner.into_sourcemap();
        let mut buf = Vec::new();
        map.to_writer(&mut buf).map_err(Error::source_map)?;
        String::from_utf8(buf).map_err(Error::source_map)
    }
}
