//! Post-processing of compiled CSS: output formatters grass lacks and numeric
//! precision control.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::OutputStyle;

static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("blank line pattern is valid"));

/// Drop blank lines so consecutive line breaks collapse into one.
pub fn collapse_blank_lines(css: &str) -> String {
    BLANK_LINES.replace_all(css, "\n").into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Line(String),
    Block { header: String, children: Vec<Node> },
}

/// Parse expanded CSS (one statement per line) into a block tree.
fn parse_blocks(css: &str) -> Vec<Node> {
    let mut stack: Vec<(String, Vec<Node>)> = vec![(String::new(), Vec::new())];

    for raw in css.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line.ends_with('{') && !line.starts_with("/*") {
            let header = line.trim_end_matches('{').trim_end().to_string();
            stack.push((header, Vec::new()));
        } else if line == "}" && stack.len() > 1 {
            close_block(&mut stack);
        } else if let Some((_, children)) = stack.last_mut() {
            children.push(Node::Line(line.to_string()));
        }
    }

    while stack.len() > 1 {
        close_block(&mut stack);
    }
    stack.pop().map(|(_, nodes)| nodes).unwrap_or_default()
}

fn close_block(stack: &mut Vec<(String, Vec<Node>)>) {
    if let Some((header, children)) = stack.pop() {
        if let Some((_, parent)) = stack.last_mut() {
            parent.push(Node::Block { header, children });
        }
    }
}

fn is_leaf(children: &[Node]) -> bool {
    children.iter().all(|c| matches!(c, Node::Line(_)))
}

fn render_compact(nodes: &[Node], depth: usize, out: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for node in nodes {
        match node {
            Node::Line(line) => out.push(format!("{indent}{line}")),
            Node::Block { header, children } if is_leaf(children) => {
                let mut rendered = format!("{indent}{header} {{");
                for child in children {
                    if let Node::Line(line) = child {
                        rendered.push(' ');
                        rendered.push_str(line);
                    }
                }
                rendered.push_str(" }");
                out.push(rendered);
            }
            Node::Block { header, children } => {
                // Leading comments stay on the header line so line annotations keep their line
                let lead = children
                    .iter()
                    .take_while(|c| matches!(c, Node::Line(_)))
                    .count();
                let mut opening = format!("{indent}{header} {{");
                for child in &children[..lead] {
                    if let Node::Line(line) = child {
                        opening.push(' ');
                        opening.push_str(line);
                    }
                }
                out.push(opening);
                render_compact(&children[lead..], depth + 1, out);
                out.push(format!("{indent}}}"));
            }
        }
    }
}

fn render_nested(nodes: &[Node], depth: usize, out: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for node in nodes {
        match node {
            Node::Line(line) => out.push(format!("{indent}{line}")),
            Node::Block { header, children } => {
                out.push(format!("{indent}{header} {{"));
                render_nested(children, depth + 1, out);
                if let Some(last) = out.last_mut() {
                    last.push_str(" }");
                }
            }
        }
    }
}

/// Reformat expanded CSS into `style`.
///
/// `compressed` and `crunched` are produced by the compiler itself and pass
/// through unchanged, as does `expanded`.
pub fn reformat(css: &str, style: OutputStyle) -> String {
    let render: fn(&[Node], usize, &mut Vec<String>) = match style {
        OutputStyle::Compact => render_compact,
        OutputStyle::Nested => render_nested,
        OutputStyle::Expanded | OutputStyle::Compressed | OutputStyle::Crunched => {
            return css.to_string();
        }
    };

    let mut lines = Vec::new();
    render(&parse_blocks(css), 0, &mut lines);
    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Round numeric literals to at most `precision` fractional digits.
///
/// Rounding is half-up and done on the decimal digits, never through floats.
/// Quoted strings, comments and digits embedded in identifiers or hex colors
/// are left as they are. A precision of 0 keeps the compiler's own precision.
pub fn round_numbers(css: &str, precision: u32) -> String {
    if precision == 0 {
        return css.to_string();
    }

    let bytes = css.as_bytes();
    let mut out = String::with_capacity(css.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    i += if bytes[i] == b'\\' { 2 } else { 1 };
                }
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i += 2;
            }
            b'0'..=b'9' | b'.' if starts_number(bytes, i) => {
                let end = number_end(bytes, i);
                if let Some(rounded) = round_literal(&css[i..end], precision as usize) {
                    out.push_str(&css[copied..i]);
                    out.push_str(&rounded);
                    copied = end;
                }
                i = end;
            }
            _ => i += 1,
        }
    }

    if copied < css.len() {
        out.push_str(&css[copied..]);
    }
    out
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn starts_number(bytes: &[u8], i: usize) -> bool {
    if bytes[i] == b'.' && !bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
        return false;
    }
    match i.checked_sub(1).map(|p| bytes[p]) {
        None => true,
        Some(b'-') => !i
            .checked_sub(2)
            .map(|p| bytes[p])
            .is_some_and(|b| is_word_byte(b) || b == b'-'),
        Some(prev) => !(is_word_byte(prev) || matches!(prev, b'.' | b'#' | b'\\' | b'%')),
    }
}

fn number_end(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' && bytes.get(end + 1).is_some_and(u8::is_ascii_digit)
    {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    end
}

fn round_literal(literal: &str, precision: usize) -> Option<String> {
    let (int_part, frac) = literal.split_once('.')?;
    if frac.len() <= precision {
        return None;
    }

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac[..precision].bytes())
        .collect();
    if frac.as_bytes()[precision] >= b'5' {
        let mut idx = digits.len();
        loop {
            if idx == 0 {
                digits.insert(0, b'1');
                break;
            }
            idx -= 1;
            if digits[idx] == b'9' {
                digits[idx] = b'0';
            } else {
                digits[idx] += 1;
                break;
            }
        }
    }

    let (int_digits, frac_digits) = digits.split_at(digits.len() - precision);
    let frac_len = frac_digits
        .iter()
        .rposition(|&d| d != b'0')
        .map_or(0, |p| p + 1);

    let mut rounded: String = int_digits.iter().map(|&d| d as char).collect();
    if frac_len > 0 {
        rounded.push('.');
        rounded.extend(frac_digits[..frac_len].iter().map(|&d| d as char));
    } else if rounded.is_empty() {
        rounded.push('0');
    }
    Some(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPANDED: &str = ".a {\n  color: red;\n  margin: 0;\n}\n\n@media print {\n  .b {\n    color: blue;\n  }\n}\n";

    #[test]
    fn blank_lines_collapse() {
        assert_eq!(collapse_blank_lines("a\n\n\n  \nb\n"), "a\nb\n");
        assert_eq!(collapse_blank_lines(".a {\n\n  color: red;\n}"), ".a {\n  color: red;\n}");
    }

    #[test]
    fn compact_puts_each_rule_on_one_line() {
        assert_eq!(
            reformat(EXPANDED, OutputStyle::Compact),
            ".a { color: red; margin: 0; }\n@media print {\n  .b { color: blue; }\n}\n"
        );
    }

    #[test]
    fn compact_keeps_leading_comments_on_header_line() {
        let css = "@media print {\n  /* line 4, app.scss */\n  .b {\n    /* line 5, app.scss */\n    color: blue;\n  }\n}\n";
        assert_eq!(
            reformat(css, OutputStyle::Compact),
            "@media print { /* line 4, app.scss */\n  .b { /* line 5, app.scss */ color: blue; }\n}\n"
        );
    }

    #[test]
    fn nested_closes_braces_on_last_line() {
        assert_eq!(
            reformat(EXPANDED, OutputStyle::Nested),
            ".a {\n  color: red;\n  margin: 0; }\n@media print {\n  .b {\n    color: blue; } }\n"
        );
    }

    #[test]
    fn expanded_and_compressed_pass_through() {
        assert_eq!(reformat(EXPANDED, OutputStyle::Expanded), EXPANDED);
        assert_eq!(reformat(".a{color:red}", OutputStyle::Crunched), ".a{color:red}");
    }

    #[test]
    fn rounds_long_fractions_half_up() {
        assert_eq!(round_numbers("width: 33.3333333333%;", 5), "width: 33.33333%;");
        assert_eq!(round_numbers("width: 66.6666666667%;", 5), "width: 66.66667%;");
        assert_eq!(round_numbers("margin: 1.999999px", 3), "margin: 2px");
        assert_eq!(round_numbers("opacity:.999999", 2), "opacity:1");
        assert_eq!(round_numbers("top: -0.1234567em", 4), "top: -0.1235em");
        assert_eq!(round_numbers("a: 0.0000001", 5), "a: 0");
    }

    #[test]
    fn short_numbers_strings_and_identifiers_untouched() {
        let css = "a { width: 1.5px; content: \"1.23456789\"; color: #123456; grid-area: c1.2345678; }";
        assert_eq!(round_numbers(css, 3), css);
        let annotated = "/* line 12, web/v1.1234567/app.scss */";
        assert_eq!(round_numbers(annotated, 2), annotated);
    }

    #[test]
    fn zero_precision_keeps_output() {
        assert_eq!(round_numbers("a: 1.123456789", 0), "a: 1.123456789");
    }
}
