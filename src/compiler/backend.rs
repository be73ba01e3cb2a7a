use std::io;
use std::path::Path;

use tracing::debug;

use super::annotate::annotate_source;
use super::format::{reformat, round_numbers};
use super::{CompileError, CompilerOptions, StyleCompiler};
use crate::types::OutputStyle;

/// Filesystem view handed to grass: imported `.scss` files are annotated the
/// same way as the entry file when line numbers are on.
#[derive(Debug)]
struct AnnotatingFs {
    line_numbers: bool,
}

impl grass::Fs for AnnotatingFs {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let bytes = std::fs::read(path)?;
        let is_scss = path.extension().and_then(|e| e.to_str()) == Some("scss");
        if !self.line_numbers || !is_scss {
            return Ok(bytes);
        }

        debug!("Annotating imported source {:?}", path);
        let source =
            String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(annotate_source(&source, &path.to_string_lossy()).into_bytes())
    }
}

/// `StyleCompiler` backed by the grass Sass compiler
#[derive(Debug, Clone, Default)]
pub struct GrassCompiler {
    options: CompilerOptions,
}

impl GrassCompiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compressed output drops loud comments, line annotations included.
    fn grass_style(&self) -> grass::OutputStyle {
        match self.options.style {
            OutputStyle::Compressed | OutputStyle::Crunched => grass::OutputStyle::Compressed,
            OutputStyle::Compact | OutputStyle::Expanded | OutputStyle::Nested => {
                grass::OutputStyle::Expanded
            }
        }
    }
}

impl StyleCompiler for GrassCompiler {
    fn compile(&self, source: &str, path: &Path) -> Result<String, CompileError> {
        let fs = AnnotatingFs {
            line_numbers: self.options.line_numbers,
        };
        let style = self.grass_style();
        if self.options.line_numbers && matches!(style, grass::OutputStyle::Compressed) {
            debug!("Line numbers are dropped from {} output", self.options.style);
        }

        let mut options = grass::Options::default()
            .style(style)
            .input_syntax(grass::InputSyntax::Scss)
            .fs(&fs);
        for dir in &self.options.import_paths {
            options = options.load_path(dir);
        }

        let input = if self.options.line_numbers {
            annotate_source(source, &path.to_string_lossy())
        } else {
            source.to_string()
        };

        let css = grass::from_string(input, &options).map_err(|e| CompileError::new(path, e))?;
        let css = round_numbers(&css, self.options.precision);
        Ok(reformat(&css, self.options.style))
    }
}
