//! Recovery of source positions from line annotations left in compiled CSS.
use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use tracing::debug;

use super::Mapping;
use crate::error::{Error, Result};
use crate::types::PathRebase;

static ANNOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*/\* line ([0-9]+), (\S+) \*/").expect("annotation pattern is valid")
});

static ANNOTATION_INLINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[ \t]*/\* line [0-9]+, \S+ \*/").expect("annotation pattern is valid")
});

static EMPTY_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[^{};]+\{\s*\}\s*$").expect("empty rule pattern is valid"));

/// Compiled form of a [`PathRebase`] rule
#[derive(Debug, Clone)]
pub struct Rebaser {
    pattern: Option<Regex>,
    replacement: String,
}

impl Rebaser {
    pub fn new(rule: &PathRebase) -> Result<Self> {
        let pattern = if rule.marker.is_empty() {
            None
        } else {
            let pattern = format!("(.*/)?{}", regex::escape(&rule.marker));
            Some(Regex::new(&pattern).map_err(|_| Error::InvalidArgument {
                arg: "map-root",
                value: rule.marker.clone(),
            })?)
        };
        Ok(Self {
            pattern,
            replacement: rule.replacement.clone(),
        })
    }

    pub fn apply<'a>(&self, path: &'a str) -> Cow<'a, str> {
        match &self.pattern {
            Some(pattern) => pattern.replace_all(path, NoExpand(&self.replacement)),
            None => Cow::Borrowed(path),
        }
    }
}

/// Collect one mapping per annotation, scanning `compiled` line by line.
///
/// Generated lines are 1-based. Several annotations on one line yield several
/// mappings in left-to-right order.
pub fn scan_annotations(compiled: &str, rebaser: &Rebaser) -> Vec<Mapping> {
    let mut mappings = Vec::new();
    for (index, line) in compiled.lines().enumerate() {
        for caps in ANNOTATION.captures_iter(line) {
            let Ok(original_line) = caps[1].parse::<u32>() else {
                debug!("Skipping annotation with out of range line {}", &caps[1]);
                continue;
            };
            let mapping = Mapping {
                generated_line: index as u32 + 1,
                generated_column: 0,
                original_line,
                original_column: 0,
                original_file: rebaser.apply(&caps[2]).into_owned(),
            };
            debug!("Mapping {:?}", mapping);
            mappings.push(mapping);
        }
    }
    mappings
}

/// Compiled CSS with its line annotations removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stripped {
    pub css: String,
    /// 1-based output line of every input line, `None` for dropped lines
    lines: Vec<Option<u32>>,
}

impl Stripped {
    /// Move `mapping` onto the stripped text. Mappings of dropped lines are lost.
    pub fn relocate(&self, mapping: Mapping) -> Option<Mapping> {
        let index = mapping.generated_line.checked_sub(1)? as usize;
        let generated_line = (*self.lines.get(index)?)?;
        Some(Mapping {
            generated_line,
            ..mapping
        })
    }
}

/// Remove every line annotation from `css`.
///
/// A line that only existed to carry annotations (left blank, or holding a
/// rule with nothing inside) is dropped, so the result matches a compile
/// without annotations. Other lines keep their line breaks.
pub fn strip_annotations(css: &str) -> Stripped {
    let mut out = String::with_capacity(css.len());
    let mut lines = Vec::new();
    let mut kept = 0u32;
    for line in css.split_inclusive('\n') {
        if ANNOTATION_INLINE.is_match(line) {
            let cleaned = ANNOTATION_INLINE.replace_all(line, "");
            if cleaned.trim().is_empty() || EMPTY_RULE.is_match(&cleaned) {
                lines.push(None);
                continue;
            }
            out.push_str(&cleaned);
        } else {
            out.push_str(line);
        }
        kept += 1;
        lines.push(Some(kept));
    }
    Stripped { css: out, lines }
}
