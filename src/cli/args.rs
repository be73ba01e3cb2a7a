use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sass-generator",
    version,
    about = "Generate css in output directory from sass files in input directory"
)]
pub struct CliArgs {
    /// Input and output directories as input_dir:output_dir
    #[arg(default_value = "web/scss:web/css")]
    pub io: String,

    /// Format of generated files (compact, compressed, crunched, expanded, nested).
    /// Ignored when source maps are enabled [default: compact]
    #[arg(short = 'f', long)]
    pub format: Option<String>,

    /// Emit line number annotations in the generated CSS
    #[arg(long, default_value_t = false)]
    pub line_numbers: bool,

    /// Generate source maps (forces line numbers and the compact format)
    #[arg(long, default_value_t = false)]
    pub source_maps: bool,

    /// Number of fractional digits kept in numbers [default: 5]
    #[arg(long)]
    pub precision: Option<u32>,

    /// Path segment after which source map paths are rebased [default: web/]
    #[arg(long)]
    pub map_root: Option<String>,

    /// Replacement for everything up to the map root [default: /]
    #[arg(long)]
    pub map_root_replacement: Option<String>,

    /// Load options from a preset file; explicit flags take precedence
    #[arg(long)]
    pub preset: Option<PathBuf>,

    /// Save the effective options as a preset file
    #[arg(long)]
    pub save_preset: Option<PathBuf>,

    /// Write a JSON summary of the run
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
