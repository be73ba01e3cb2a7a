//! Line annotations for SCSS sources.
//!
//! grass has no option to emit `/* line N, path */` comments, so the source is
//! instrumented before compilation instead: a loud comment naming the source
//! line is placed as the first child of every block. Sass keeps loud comments
//! in place, so each annotation lands inside the compiled rule it came from.
use std::fmt::Write;

use once_cell::sync::Lazy;
use regex::Regex;

static NESTED_PROPERTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_-][\w-]*\s*:(\s|$)").expect("property pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Annotated,
    Plain,
    Function,
    Interpolation,
}

/// Insert a `/* line N, path */` comment after the opening brace of each block in `source`.
///
/// Function bodies, nested property blocks and interpolations are left alone,
/// as are braces inside strings and comments.
pub fn annotate_source(source: &str, path: &str) -> String {
    let mut out = String::with_capacity(source.len() + source.len() / 4);
    let mut frames: Vec<Frame> = Vec::new();
    let mut line = 1usize;
    // Byte offset and line of the first significant character of the current statement
    let mut header: Option<(usize, usize)> = None;
    let mut chars = source.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '\n' => {
                line += 1;
                out.push(c);
            }
            '"' | '\'' => {
                header.get_or_insert((i, line));
                out.push(c);
                while let Some((_, s)) = chars.next() {
                    out.push(s);
                    match s {
                        '\\' => {
                            if let Some((_, escaped)) = chars.next() {
                                if escaped == '\n' {
                                    line += 1;
                                }
                                out.push(escaped);
                            }
                        }
                        '\n' => line += 1,
                        _ if s == c => break,
                        _ => {}
                    }
                }
            }
            '/' if matches!(chars.peek(), Some((_, '/'))) => {
                out.push(c);
                while let Some(&(_, s)) = chars.peek() {
                    if s == '\n' {
                        break;
                    }
                    out.push(s);
                    chars.next();
                }
            }
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                out.push(c);
                let mut prev = '\0';
                // Skip the opening star so `/*/` is not taken as a close
                if let Some((_, star)) = chars.next() {
                    out.push(star);
                }
                for (_, s) in chars.by_ref() {
                    out.push(s);
                    if s == '\n' {
                        line += 1;
                    }
                    if prev == '*' && s == '/' {
                        break;
                    }
                    prev = s;
                }
            }
            '#' if matches!(chars.peek(), Some((_, '{'))) => {
                header.get_or_insert((i, line));
                out.push(c);
                if let Some((_, brace)) = chars.next() {
                    out.push(brace);
                }
                frames.push(Frame::Interpolation);
            }
            '{' => {
                let frame = classify(source, i, header, &frames);
                out.push(c);
                if let (Frame::Annotated, Some((_, header_line))) = (frame, header) {
                    let _ = write!(out, " /* line {header_line}, {path} */");
                }
                frames.push(frame);
                header = None;
            }
            '}' => {
                out.push(c);
                if frames.pop() != Some(Frame::Interpolation) {
                    header = None;
                }
            }
            ';' => {
                out.push(c);
                header = None;
            }
            c if c.is_whitespace() => out.push(c),
            _ => {
                header.get_or_insert((i, line));
                out.push(c);
            }
        }
    }

    out
}

fn classify(source: &str, brace: usize, header: Option<(usize, usize)>, frames: &[Frame]) -> Frame {
    if frames
        .iter()
        .any(|f| matches!(f, Frame::Function | Frame::Interpolation))
    {
        return Frame::Plain;
    }
    let Some((start, _)) = header else {
        return Frame::Plain;
    };

    let text = source[start..brace].trim();
    if text.starts_with("@function") {
        Frame::Function
    } else if NESTED_PROPERTY.is_match(text) {
        Frame::Plain
    } else {
        Frame::Annotated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "web/scss/app.scss";

    #[test]
    fn annotates_rules_with_their_source_line() {
        let source = ".a {\n  color: red;\n  .b { margin: 0; }\n}\n";
        let annotated = annotate_source(source, PATH);
        assert_eq!(
            annotated,
            ".a { /* line 1, web/scss/app.scss */\n  color: red;\n  .b { /* line 3, web/scss/app.scss */ margin: 0; }\n}\n"
        );
    }

    #[test]
    fn selector_spanning_lines_uses_first_line() {
        let source = ".a,\n.b {\n  color: red;\n}\n";
        let annotated = annotate_source(source, PATH);
        assert!(annotated.contains(".b { /* line 1, web/scss/app.scss */"));
    }

    #[test]
    fn function_bodies_are_untouched() {
        let source = "@function double($x) {\n  @if $x > 1 { @return $x * 2; }\n  @return $x;\n}\n.a { width: double(2px); }\n";
        let annotated = annotate_source(source, PATH);
        assert!(annotated.starts_with("@function double($x) {\n  @if $x > 1 { @return"));
        assert!(annotated.contains(".a { /* line 5, web/scss/app.scss */ width"));
        assert_eq!(annotated.matches("/* line").count(), 1);
    }

    #[test]
    fn interpolation_strings_and_comments_are_skipped() {
        let source = "// a { b }\n/* c { d } */\n.x-#{$name} {\n  content: \"{\";\n}\n";
        let annotated = annotate_source(source, PATH);
        assert!(annotated.contains(".x-#{$name} { /* line 3, web/scss/app.scss */"));
        assert_eq!(annotated.matches("/* line").count(), 1);
    }

    #[test]
    fn nested_properties_are_not_annotated() {
        let source = ".a {\n  font: {\n    family: serif;\n  }\n  &:hover { color: red; }\n}\n";
        let annotated = annotate_source(source, PATH);
        assert!(annotated.contains("font: {\n"));
        assert!(annotated.contains("&:hover { /* line 5, web/scss/app.scss */"));
    }

    #[test]
    fn at_rules_are_annotated() {
        let source = "@media print {\n  .a { color: black; }\n}\n";
        let annotated = annotate_source(source, PATH);
        assert!(annotated.starts_with("@media print { /* line 1, web/scss/app.scss */"));
        assert!(annotated.contains(".a { /* line 2, web/scss/app.scss */"));
    }
}
