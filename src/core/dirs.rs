//! Resolution of the `<input>:<output>` directory pair.
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{Error, Result};

static IO_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^:]+):([^:]+)").expect("io pattern is valid"));

static REPEATED_SLASHES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/+").expect("slash pattern is valid"));

/// Split `io` into input and output directories.
///
/// The split happens at the first colon; the output part ends at the next colon
/// if there is one. Both parts get a trailing slash and runs of `/` collapsed.
pub fn parse_io(io: &str) -> Result<(PathBuf, PathBuf)> {
    let caps = IO_PATTERN
        .captures(io)
        .ok_or_else(|| Error::InvalidArgument {
            arg: "io",
            value: io.to_string(),
        })?;

    Ok((normalize_dir(&caps[1]), normalize_dir(&caps[2])))
}

fn normalize_dir(dir: &str) -> PathBuf {
    let with_slash = format!("{dir}/");
    PathBuf::from(REPEATED_SLASHES.replace_all(&with_slash, "/").into_owned())
}

/// Create `output` if missing, then check `input` exists and `output` accepts new files.
pub fn prepare_dirs(input: &Path, output: &Path) -> Result<()> {
    if !output.is_dir() {
        debug!("Creating output directory {:?}", output);
        if let Err(e) = fs::create_dir_all(output) {
            warn!("Could not create output directory {:?}: {}", output, e);
        }
    }

    if !input.is_dir() {
        return Err(Error::DirectoryNotFound {
            path: input.to_path_buf(),
        });
    }
    if !output.is_dir() {
        return Err(Error::DirectoryNotFound {
            path: output.to_path_buf(),
        });
    }

    // Probe with a real file: permission bits alone miss ACLs and read-only mounts
    tempfile::Builder::new()
        .prefix(".sass-generator-probe")
        .tempfile_in(output)
        .map_err(|_| Error::DirectoryNotWritable {
            path: output.to_path_buf(),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_first_colon() {
        let (input, output) = parse_io("web/scss:web/css").unwrap();
        assert_eq!(input, PathBuf::from("web/scss/"));
        assert_eq!(output, PathBuf::from("web/css/"));
    }

    #[test]
    fn collapses_duplicate_slashes_on_both_sides() {
        let (input, output) = parse_io("a//b///:c//d").unwrap();
        assert_eq!(input, PathBuf::from("a/b/"));
        assert_eq!(output, PathBuf::from("c/d/"));
    }

    #[test]
    fn output_stops_at_next_colon() {
        let (input, output) = parse_io("a:b:c").unwrap();
        assert_eq!(input, PathBuf::from("a/"));
        assert_eq!(output, PathBuf::from("b/"));
    }

    #[test]
    fn rejects_strings_without_two_parts() {
        for io in ["", "only-input", "input:", ":"] {
            let err = parse_io(io).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument { arg: "io", .. }), "{io}");
        }
    }

    #[test]
    fn creates_missing_output_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("scss");
        let output = tmp.path().join("public/css");
        fs::create_dir(&input).unwrap();

        prepare_dirs(&input, &output).unwrap();
        assert!(output.is_dir());
        // The writability probe leaves nothing behind
        assert_eq!(fs::read_dir(&output).unwrap().count(), 0);
    }

    #[test]
    fn missing_input_directory_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("nope");
        let output = tmp.path().join("css");

        let err = prepare_dirs(&input, &output).unwrap_err();
        assert!(matches!(err, Error::DirectoryNotFound { path } if path == input));
    }

    #[cfg(unix)]
    #[test]
    fn read_only_output_directory_is_fatal() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("scss");
        let output = tmp.path().join("css");
        fs::create_dir(&input).unwrap();
        fs::create_dir(&output).unwrap();
        fs::set_permissions(&output, fs::Permissions::from_mode(0o555)).unwrap();

        // Privileged users write through the mode bits
        let privileged = fs::File::create(output.join("check")).is_ok();
        let outcome = prepare_dirs(&input, &output);
        fs::set_permissions(&output, fs::Permissions::from_mode(0o755)).unwrap();
        if privileged {
            return;
        }

        let err = outcome.unwrap_err();
        assert!(matches!(err, Error::DirectoryNotWritable { path } if path == output));
    }
}
