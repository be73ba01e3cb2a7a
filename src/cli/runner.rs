use std::fs;

use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::{BatchEvent, BatchReport, SassGenerator};
use crate::core::params::{RawOptions, effective_config};
use crate::core::preset::{Preset, load_preset, save_preset};

use super::args::CliArgs;
use super::errors::AppError;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Merge preset values (if any) with explicitly given flags.
pub fn raw_options(args: &CliArgs) -> Result<RawOptions, AppError> {
    let preset = match &args.preset {
        Some(path) => load_preset(path).map_err(|source| AppError::Preset {
            path: path.clone(),
            source,
        })?,
        None => Preset::default(),
    };

    let mut raw = preset.to_raw_options(&args.io);
    if let Some(format) = &args.format {
        raw.format = format.clone();
    }
    if let Some(precision) = args.precision {
        raw.precision = precision;
    }
    raw.line_numbers |= args.line_numbers;
    raw.source_maps |= args.source_maps;
    if let Some(marker) = &args.map_root {
        raw.rebase.marker = marker.clone();
    }
    if let Some(replacement) = &args.map_root_replacement {
        raw.rebase.replacement = replacement.clone();
    }
    Ok(raw)
}

fn print_block(line: &str) {
    println!("\n{line}\n");
}

fn print_event(event: &BatchEvent) {
    match event {
        BatchEvent::Started { source, with_map } => print_block(&format!(
            "Generating CSS {}from {}...",
            if *with_map { "and Sourcemap " } else { "" },
            source.display()
        )),
        BatchEvent::Compiled { source, css } => print_block(&format!(
            "File {} successfully generated from {}",
            css.display(),
            source.display()
        )),
        BatchEvent::CompileFailed { source, reason } => {
            print_block(&format!(
                "Error generating compiled CSS from {}",
                source.display()
            ));
            if !reason.is_empty() {
                println!("  {reason}");
            }
        }
        BatchEvent::MapGenerated { css, map } => print_block(&format!(
            "Sourcemap {} successfully generated from {}",
            map.display(),
            css.display()
        )),
        BatchEvent::MapFailed { css, reason } => {
            print_block(&format!(
                "Error generating CSS sourcemap file from {}",
                css.display()
            ));
            if !reason.is_empty() {
                println!("  {reason}");
            }
        }
    }
}

#[derive(Serialize)]
struct ReportFile<'a> {
    generated: String,
    input_dir: String,
    output_dir: String,
    #[serde(flatten)]
    report: BatchReport,
    warnings: &'a [String],
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        init_logging();
    }

    let raw = raw_options(&args)?;
    if let Some(path) = &args.save_preset {
        save_preset(path, &Preset::from(&raw)).map_err(AppError::from)?;
    }

    let config = effective_config(&raw)?;
    info!("Effective configuration: {:?}", config);

    let mut generator = SassGenerator::new(config)?;
    generator.compile_all_with(print_event);

    let warnings = generator.warnings();
    if !warnings.is_empty() {
        print_block("Following warnings encountered while generating CSS:");
        for warning in &warnings {
            println!("{warning}");
        }
    }

    if let Some(path) = &args.report {
        let file = ReportFile {
            generated: chrono::Utc::now().to_rfc3339(),
            input_dir: generator.config().input_dir.display().to_string(),
            output_dir: generator.config().output_dir.display().to_string(),
            report: generator.report(),
            warnings: &warnings,
        };
        let json = serde_json::to_string_pretty(&file).map_err(AppError::from)?;
        fs::write(path, json).map_err(|source| AppError::Report {
            path: path.clone(),
            source,
        })?;
        info!("Report written to: {:?}", path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::core::preset::render_preset;
    use crate::types::PathRebase;

    fn parse(argv: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_without_flags() {
        let raw = raw_options(&parse(&["sass-generator"])).unwrap();
        assert_eq!(raw, RawOptions::default());
    }

    #[test]
    fn flags_are_applied() {
        let args = parse(&[
            "sass-generator",
            "assets/scss:public/css",
            "-f",
            "expanded",
            "--line-numbers",
            "--source-maps",
            "--precision",
            "3",
            "--map-root",
            "public/",
        ]);
        let raw = raw_options(&args).unwrap();
        assert_eq!(raw.io, "assets/scss:public/css");
        assert_eq!(raw.format, "expanded");
        assert_eq!(raw.precision, 3);
        assert!(raw.line_numbers && raw.source_maps);
        assert_eq!(raw.rebase.marker, "public/");
        assert_eq!(raw.rebase.replacement, "/");
    }

    #[test]
    fn explicit_flags_override_preset() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("site.preset");
        let preset = Preset {
            format: "nested".to_string(),
            precision: 8,
            line_numbers: true,
            source_maps: false,
            rebase: PathRebase::default(),
        };
        fs::write(&path, render_preset(&preset).unwrap()).unwrap();

        let args = parse(&[
            "sass-generator",
            "--preset",
            path.to_str().unwrap(),
            "--format",
            "compressed",
        ]);
        let raw = raw_options(&args).unwrap();
        assert_eq!(raw.format, "compressed");
        assert_eq!(raw.precision, 8);
        assert!(raw.line_numbers);
    }

    #[test]
    fn unreadable_preset_is_reported() {
        let args = parse(&["sass-generator", "--preset", "/nonexistent/site.preset"]);
        let err = raw_options(&args).unwrap_err();
        assert!(matches!(err, AppError::Preset { .. }));
    }
}
