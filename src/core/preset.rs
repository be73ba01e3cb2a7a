//! Reusable option presets.
//!
//! A preset file starts with a `//` comment header followed by a JSON object.
//! Directory paths are deliberately left out so a preset can be shared between
//! projects.
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::params::RawOptions;
use crate::error::{Error, Result};
use crate::types::PathRebase;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    pub format: String,
    pub precision: u32,
    pub line_numbers: bool,
    pub source_maps: bool,
    pub rebase: PathRebase,
}

impl Default for Preset {
    fn default() -> Self {
        Preset::from(&RawOptions::default())
    }
}

impl From<&RawOptions> for Preset {
    fn from(raw: &RawOptions) -> Self {
        Self {
            format: raw.format.clone(),
            precision: raw.precision,
            line_numbers: raw.line_numbers,
            source_maps: raw.source_maps,
            rebase: raw.rebase.clone(),
        }
    }
}

impl Preset {
    /// Raw options carrying this preset's values and the given `io` pair.
    pub fn to_raw_options(&self, io: &str) -> RawOptions {
        RawOptions {
            source_maps: self.source_maps,
            line_numbers: self.line_numbers,
            precision: self.precision,
            format: self.format.clone(),
            io: io.to_string(),
            rebase: self.rebase.clone(),
        }
    }
}

/// Parse preset text; the JSON part starts at the first `{`.
pub fn parse_preset(content: &str) -> Result<Preset> {
    let json_start = content.find('{').ok_or_else(|| Error::InvalidArgument {
        arg: "preset",
        value: "no JSON content found".to_string(),
    })?;
    Ok(serde_json::from_str(&content[json_start..])?)
}

pub fn load_preset(path: &Path) -> Result<Preset> {
    let content = fs::read_to_string(path)?;
    let preset = parse_preset(&content)?;
    info!("Preset loaded from: {:?}", path);
    Ok(preset)
}

pub fn render_preset(preset: &Preset) -> Result<String> {
    let mut content = String::new();
    content.push_str("// ==========================================\n");
    content.push_str("// sass-generator options preset\n");
    content.push_str(&format!("// Version: {}\n", env!("CARGO_PKG_VERSION")));
    content.push_str(&format!("// Generated: {}\n", chrono::Utc::now().to_rfc3339()));
    content.push_str("// Note: input/output directories are not included in presets\n");
    content.push_str("// ==========================================\n\n");
    content.push_str(&serde_json::to_string_pretty(preset)?);
    content.push('\n');
    Ok(content)
}

pub fn save_preset(path: &Path, preset: &Preset) -> Result<()> {
    fs::write(path, render_preset(preset)?)?;
    info!("Preset saved to: {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_preset_parses_back() {
        let preset = Preset {
            format: "expanded".to_string(),
            precision: 3,
            line_numbers: true,
            source_maps: false,
            rebase: PathRebase {
                marker: "public/".to_string(),
                replacement: "/assets/".to_string(),
            },
        };
        let text = render_preset(&preset).unwrap();
        assert!(text.starts_with("// ===="));
        assert_eq!(parse_preset(&text).unwrap(), preset);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let preset = parse_preset("// header\n{ \"format\": \"nested\" }").unwrap();
        assert_eq!(preset.format, "nested");
        assert_eq!(preset.precision, 5);
        assert_eq!(preset.rebase, PathRebase::default());
    }

    #[test]
    fn text_without_json_is_rejected() {
        assert!(parse_preset("// just a comment\n").is_err());
    }
}
