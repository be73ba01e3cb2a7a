//! Shared types used across the generator.
//! Includes the closed `OutputStyle` set and the `PathRebase` rule applied to
//! source paths recorded in source maps.
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Output formatter applied to compiled CSS.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    Compact,
    Compressed,
    Crunched,
    Expanded,
    Nested,
}

impl OutputStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputStyle::Compact => "compact",
            OutputStyle::Compressed => "compressed",
            OutputStyle::Crunched => "crunched",
            OutputStyle::Expanded => "expanded",
            OutputStyle::Nested => "nested",
        }
    }

    /// Comma separated list of every accepted format name.
    pub fn accepted() -> String {
        OutputStyle::value_variants()
            .iter()
            .map(|style| style.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputStyle::value_variants()
            .iter()
            .copied()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| Error::UnsupportedFormat {
                value: s.to_string(),
                accepted: OutputStyle::accepted(),
            })
    }
}

/// Rewrites source paths found in line annotations before they are written to
/// a source map. Everything up to and including `marker` (itself preceded by an
/// optional directory prefix) is replaced with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRebase {
    /// Path segment marking the public web root; empty disables rebasing
    pub marker: String,
    pub replacement: String,
}

impl Default for PathRebase {
    fn default() -> Self {
        Self {
            marker: "web/".to_string(),
            replacement: "/".to_string(),
        }
    }
}
