use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// List the source files directly inside `input_dir` whose extension is `extension`.
///
/// Hidden files and subdirectories are skipped. The result is sorted by file
/// name so batch runs and their warning reports are reproducible.
pub fn list_sources(input_dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    for entry in fs::read_dir(input_dir).map_err(Error::from)? {
        let entry = entry.map_err(Error::from)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        let matches = path.extension().and_then(|e| e.to_str()) == Some(extension);
        if matches && !hidden {
            sources.push(path);
        }
    }
    sources.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(sources)
}

/// Output file name for `source`: the base name with its extension swapped for `.css`.
pub fn css_file_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{stem}.css")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_matching_files_sorted_without_recursion() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        fs::write(dir.join("b.scss"), "").unwrap();
        fs::write(dir.join("_partial.scss"), "").unwrap();
        fs::write(dir.join("a.scss"), "").unwrap();
        fs::write(dir.join("notes.txt"), "").unwrap();
        fs::write(dir.join(".hidden.scss"), "").unwrap();
        fs::create_dir(dir.join("nested.scss")).unwrap();
        fs::create_dir(dir.join("sub")).unwrap();
        fs::write(dir.join("sub/c.scss"), "").unwrap();

        let names: Vec<String> = list_sources(dir, "scss")
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["_partial.scss", "a.scss", "b.scss"]);
    }

    #[test]
    fn css_name_replaces_extension() {
        assert_eq!(css_file_name(Path::new("web/scss/app.scss")), "app.css");
        assert_eq!(css_file_name(Path::new("theme.dark.scss")), "theme.dark.css");
    }
}
