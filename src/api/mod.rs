//! Batch driver: compile every source file of the input directory and, when
//! enabled, derive a source map for each compiled file. Prefer these entry
//! points over the lower level `compiler` and `maps` modules.
//!
//! One file failing never stops the batch. Failures are reported through
//! [`BatchEvent`]s while running and as warnings afterwards.
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::compiler::format::collapse_blank_lines;
use crate::compiler::{CompilerOptions, GrassCompiler, StyleCompiler};
use crate::core::dirs::prepare_dirs;
use crate::core::params::BatchConfig;
use crate::core::sources::{css_file_name, list_sources};
use crate::error::{Error, Result};
use crate::maps::{MapBuilder, Rebaser, scan_annotations, strip_annotations};

/// Per-source state for one batch run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceFileRecord {
    pub source: PathBuf,
    pub compiled: Option<PathBuf>,
    pub sourcemap: Option<PathBuf>,
    /// Reported to the user at the end of the run
    pub warnings: Vec<String>,
    /// Underlying causes of failed steps
    pub errors: Vec<String>,
}

impl SourceFileRecord {
    fn new(source: PathBuf) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }
}

/// Progress notifications emitted by [`SassGenerator::compile_all_with`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Started { source: PathBuf, with_map: bool },
    Compiled { source: PathBuf, css: PathBuf },
    CompileFailed { source: PathBuf, reason: String },
    MapGenerated { css: PathBuf, map: PathBuf },
    MapFailed { css: PathBuf, reason: String },
}

/// Batch summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub sources: usize,
    pub compiled: usize,
    pub sourcemaps: usize,
    pub failed: usize,
    pub warnings: usize,
}

pub struct SassGenerator<C: StyleCompiler = GrassCompiler> {
    config: BatchConfig,
    compiler: C,
    records: Vec<SourceFileRecord>,
}

impl SassGenerator<GrassCompiler> {
    /// Prepare a batch compiled with grass using the settings in `config`.
    pub fn new(config: BatchConfig) -> Result<Self> {
        let compiler = GrassCompiler::new(CompilerOptions::from(&config));
        Self::with_compiler(config, compiler)
    }
}

impl<C: StyleCompiler> SassGenerator<C> {
    /// Prepare a batch using a custom compiler.
    ///
    /// Creates the output directory when missing, checks both directories and
    /// enumerates the source files.
    pub fn with_compiler(config: BatchConfig, compiler: C) -> Result<Self> {
        prepare_dirs(&config.input_dir, &config.output_dir)?;

        let records: Vec<SourceFileRecord> =
            list_sources(&config.input_dir, &config.source_extension)?
                .into_iter()
                .map(SourceFileRecord::new)
                .collect();
        info!(
            "Found {} source file(s) in {:?}",
            records.len(),
            config.input_dir
        );

        Ok(Self {
            config,
            compiler,
            records,
        })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Paths of every enumerated source file, in processing order
    pub fn source_files(&self) -> Vec<PathBuf> {
        self.records.iter().map(|r| r.source.clone()).collect()
    }

    pub fn record(&self, source: &Path) -> Option<&SourceFileRecord> {
        self.records.iter().find(|r| r.source == source)
    }

    pub fn records(&self) -> &[SourceFileRecord] {
        &self.records
    }

    fn index_of(&self, source: &Path) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.source == source)
            .ok_or_else(|| Error::UnknownFile {
                path: source.to_path_buf(),
            })
    }

    /// Compile one source file into the output directory.
    ///
    /// Returns the compiled file path, or `None` when compiling or writing
    /// failed; the cause is kept in the file's record. Fails only for a path
    /// that was not enumerated.
    pub fn compile(&mut self, source: &Path) -> Result<Option<PathBuf>> {
        let idx = self.index_of(source)?;
        let css_name = css_file_name(source);
        let css_path = self.config.output_dir.join(&css_name);

        let outcome = self.compile_to(source, &css_path, &css_name);
        let record = &mut self.records[idx];
        match outcome {
            Ok(()) => {
                info!("Compiled {:?} -> {:?}", source, css_path);
                record.compiled = Some(css_path.clone());
                Ok(Some(css_path))
            }
            Err(e) => {
                warn!("Error compiling {:?}: {}", source, e);
                record.compiled = None;
                record.errors.push(e.to_string());
                Ok(None)
            }
        }
    }

    fn compile_to(&self, source: &Path, css_path: &Path, css_name: &str) -> Result<()> {
        let text = fs::read_to_string(source)?;
        let css = self.compiler.compile(&text, source)?;
        // The reference is written even when no map gets generated
        let css = format!(
            "{}\n/*# sourceMappingURL={}.map */\n",
            css.trim_end(),
            css_name
        );
        fs::write(css_path, collapse_blank_lines(&css))?;
        Ok(())
    }

    /// Build the source map of an already compiled file from its line annotations.
    ///
    /// In clean mode the annotations are stripped from the compiled file
    /// afterwards. Returns the map path, or `None` when reading the CSS or
    /// writing the map failed. Fails for a path that was not enumerated or
    /// has not been compiled.
    pub fn generate_map(&mut self, source: &Path) -> Result<Option<PathBuf>> {
        let idx = self.index_of(source)?;
        let css_path = self.records[idx]
            .compiled
            .clone()
            .ok_or_else(|| Error::NotCompiled {
                path: source.to_path_buf(),
            })?;
        let rebaser = Rebaser::new(&self.config.rebase)?;

        let outcome = self.write_map(idx, &css_path, &rebaser);
        let record = &mut self.records[idx];
        match outcome {
            Ok(map_path) => {
                info!("Sourcemap {:?} generated from {:?}", map_path, css_path);
                record.sourcemap = Some(map_path.clone());
                Ok(Some(map_path))
            }
            Err(e) => {
                warn!("Error generating sourcemap for {:?}: {}", css_path, e);
                record.sourcemap = None;
                record.errors.push(e.to_string());
                Ok(None)
            }
        }
    }

    fn write_map(&mut self, idx: usize, css_path: &Path, rebaser: &Rebaser) -> Result<PathBuf> {
        let compiled = fs::read_to_string(css_path)?;

        let file_name = css_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut mappings = scan_annotations(&compiled, rebaser);

        if self.config.clean_css {
            let stripped = strip_annotations(&compiled);
            match fs::write(css_path, &stripped.css) {
                // Mappings now have to point into the cleaned file
                Ok(()) => {
                    mappings = mappings
                        .into_iter()
                        .filter_map(|m| stripped.relocate(m))
                        .collect();
                }
                Err(e) => {
                    warn!("Error removing comments from {:?}: {}", css_path, e);
                    self.records[idx]
                        .warnings
                        .push(format!("Error removing comments from file {}", css_path.display()));
                }
            }
        }

        let mut builder = MapBuilder::new(&file_name);
        for mapping in &mappings {
            builder.add_mapping(mapping);
        }
        debug!("{} mapping(s) recovered from {:?}", builder.len(), css_path);

        let mut map_name = css_path.as_os_str().to_owned();
        map_name.push(".map");
        let map_path = PathBuf::from(map_name);
        fs::write(&map_path, builder.contents()?)?;
        Ok(map_path)
    }

    /// Compile every source file and generate maps when enabled.
    pub fn compile_all(&mut self) {
        self.compile_all_with(|_| {});
    }

    /// Like [`compile_all`](Self::compile_all), reporting progress to `observer`.
    ///
    /// A file that fails to compile gets one warning and no map attempt; the
    /// remaining files are processed regardless.
    pub fn compile_all_with<F: FnMut(&BatchEvent)>(&mut self, mut observer: F) {
        for source in self.source_files() {
            let with_map = self.config.generate_maps;
            observer(&BatchEvent::Started {
                source: source.clone(),
                with_map,
            });

            let Some(css) = self.process_compile(&source, &mut observer) else {
                continue;
            };

            if with_map {
                self.process_map(&source, &css, &mut observer);
            }
        }

        let report = self.report();
        info!(
            "Batch complete: {} compiled, {} sourcemap(s), {} failed",
            report.compiled, report.sourcemaps, report.failed
        );
    }

    fn process_compile<F: FnMut(&BatchEvent)>(
        &mut self,
        source: &Path,
        observer: &mut F,
    ) -> Option<PathBuf> {
        match self.compile(source) {
            Ok(Some(css)) => {
                observer(&BatchEvent::Compiled {
                    source: source.to_path_buf(),
                    css: css.clone(),
                });
                Some(css)
            }
            outcome => {
                let reason = match outcome {
                    Err(e) => e.to_string(),
                    _ => self.last_error(source),
                };
                self.push_warning(
                    source,
                    format!("Error encountered while compiling {}", source.display()),
                );
                observer(&BatchEvent::CompileFailed {
                    source: source.to_path_buf(),
                    reason,
                });
                None
            }
        }
    }

    fn process_map<F: FnMut(&BatchEvent)>(&mut self, source: &Path, css: &Path, observer: &mut F) {
        match self.generate_map(source) {
            Ok(Some(map)) => observer(&BatchEvent::MapGenerated {
                css: css.to_path_buf(),
                map,
            }),
            outcome => {
                let reason = match outcome {
                    Err(e) => e.to_string(),
                    _ => self.last_error(source),
                };
                self.push_warning(
                    source,
                    format!(
                        "Error encountered while generating sourcemap for {}",
                        source.display()
                    ),
                );
                observer(&BatchEvent::MapFailed {
                    css: css.to_path_buf(),
                    reason,
                });
            }
        }
    }

    fn last_error(&self, source: &Path) -> String {
        self.record(source)
            .and_then(|r| r.errors.last().cloned())
            .unwrap_or_default()
    }

    fn push_warning(&mut self, source: &Path, warning: String) {
        if let Ok(idx) = self.index_of(source) {
            self.records[idx].warnings.push(warning);
        }
    }

    /// Every warning of the run, by file in processing order, then in insertion order.
    pub fn warnings(&self) -> Vec<String> {
        self.records
            .iter()
            .flat_map(|r| r.warnings.iter().cloned())
            .collect()
    }

    pub fn report(&self) -> BatchReport {
        BatchReport {
            sources: self.records.len(),
            compiled: self.records.iter().filter(|r| r.compiled.is_some()).count(),
            sourcemaps: self.records.iter().filter(|r| r.sourcemap.is_some()).count(),
            failed: self
                .records
                .iter()
                .filter(|r| !r.errors.is_empty())
                .count(),
            warnings: self.records.iter().map(|r| r.warnings.len()).sum(),
        }
    }
}
