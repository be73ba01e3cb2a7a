use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::dirs::parse_io;
use crate::error::Result;
use crate::types::{OutputStyle, PathRebase};

/// Options as supplied by the user (CLI flags or a preset), before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOptions {
    pub source_maps: bool,
    pub line_numbers: bool,
    pub precision: u32,
    /// Formatter name; only validated when source maps are disabled
    pub format: String,
    /// `<input_dir>:<output_dir>`
    pub io: String,
    pub rebase: PathRebase,
}

impl Default for RawOptions {
    fn default() -> Self {
        Self {
            source_maps: false,
            line_numbers: false,
            precision: 5,
            format: OutputStyle::Compact.as_str().to_string(),
            io: "web/scss:web/css".to_string(),
            rebase: PathRebase::default(),
        }
    }
}

/// Validated configuration for one batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    pub generate_maps: bool,
    pub line_numbers: bool,
    /// Fractional digits kept in numeric output; 0 keeps the compiler default
    pub precision: u32,
    pub format: OutputStyle,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Strip line annotations once the source map has been built
    pub clean_css: bool,
    /// Extension (without the dot) of files picked up from `input_dir`
    pub source_extension: String,
    pub rebase: PathRebase,
}

/// Derive the effective batch configuration from raw user options.
///
/// Enabling source maps forces line annotations on and the compact formatter,
/// whatever format was requested. The format is only validated when maps are
/// off. Clean mode is decided from the options as the user gave them: the
/// annotations are incidental when they were not asked for and the requested
/// format was already compact.
///
/// This performs no filesystem access; see [`crate::core::dirs::prepare_dirs`].
pub fn effective_config(raw: &RawOptions) -> Result<BatchConfig> {
    let clean_css = !raw.line_numbers && raw.format == OutputStyle::Compact.as_str();

    let (format, line_numbers) = if raw.source_maps {
        (OutputStyle::Compact, true)
    } else {
        (raw.format.parse::<OutputStyle>()?, raw.line_numbers)
    };

    let (input_dir, output_dir) = parse_io(&raw.io)?;

    Ok(BatchConfig {
        generate_maps: raw.source_maps,
        line_numbers,
        precision: raw.precision,
        format,
        input_dir,
        output_dir,
        clean_css,
        source_extension: "scss".to_string(),
        rebase: raw.rebase.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn raw(format: &str, line_numbers: bool, source_maps: bool) -> RawOptions {
        RawOptions {
            format: format.to_string(),
            line_numbers,
            source_maps,
            io: "in:out".to_string(),
            ..RawOptions::default()
        }
    }

    #[test]
    fn source_maps_force_compact_and_line_numbers() {
        let config = effective_config(&raw("expanded", false, true)).unwrap();
        assert_eq!(config.format, OutputStyle::Compact);
        assert!(config.line_numbers);
        assert!(config.generate_maps);
    }

    #[test]
    fn source_maps_skip_format_validation() {
        let config = effective_config(&raw("fancy", false, true)).unwrap();
        assert_eq!(config.format, OutputStyle::Compact);
    }

    #[test]
    fn unknown_format_is_rejected_without_maps() {
        let err = effective_config(&raw("fancy", false, false)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn user_choices_kept_without_maps() {
        let config = effective_config(&raw("nested", true, false)).unwrap();
        assert_eq!(config.format, OutputStyle::Nested);
        assert!(config.line_numbers);
        assert!(!config.generate_maps);
    }

    #[test]
    fn clean_mode_follows_user_supplied_values() {
        assert!(effective_config(&raw("compact", false, true)).unwrap().clean_css);
        assert!(!effective_config(&raw("compact", true, true)).unwrap().clean_css);
        assert!(!effective_config(&raw("expanded", false, true)).unwrap().clean_css);
    }

    #[test]
    fn io_is_split_into_directories() {
        let config = effective_config(&raw("compact", false, false)).unwrap();
        assert_eq!(config.input_dir, PathBuf::from("in/"));
        assert_eq!(config.output_dir, PathBuf::from("out/"));
    }

    #[test]
    fn raw_options_default_matches_cli_defaults() {
        let raw = RawOptions::default();
        assert_eq!(raw.precision, 5);
        assert_eq!(raw.format, "compact");
        assert_eq!(raw.io, "web/scss:web/css");
    }
}
