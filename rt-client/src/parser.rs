//! Parser for REST 1.0 responses, which arrive as RFC5322-like text:
//! an `RT/<version> <status>` header line, `#` comment lines, `Key: value`
//! fields with indented continuations, and `--` separators between sections.

use regex::Regex;
use std::sync::OnceLock;

fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^RT/(?P<v>.+)\s+(?P<s>(?P<i>\d+).+)").unwrap())
}

fn comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#\s+.+$").unwrap())
}

fn section_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^--").unwrap())
}

/// A decoded section: `Key: value` pairs in response order.
pub type Fields = Vec<(String, String)>;

/// Parses a response body into its sections.
pub fn parse(body: &str) -> Vec<Fields> {
    build(body).iter().map(|lines| decode(lines)).collect()
}

/// Numeric status from the `RT/<version> <status>` header line, when present.
pub fn parse_status_code(body: &str) -> Option<u32> {
    let header = body.lines().next()?;
    header.split(' ').nth(1)?.parse().ok()
}

/// Builds logical lines: header and empty lines dropped, indented lines
/// folded into the previous logical line.
fn build(body: &str) -> Vec<Vec<String>> {
    section_re()
        .split(body)
        .map(|section| {
            let mut logic_lines: Vec<String> = Vec::new();
            for line in section.lines() {
                if line.is_empty() || header_re().is_match(line) {
                    continue;
                }
                if line.starts_with(char::is_whitespace) {
                    if let Some(last) = logic_lines.last_mut() {
                        last.push('\n');
                        last.push_str(line.trim_matches(' '));
                        continue;
                    }
                }
                logic_lines.push(line.to_string());
            }
            logic_lines
        })
        .collect()
}

/// Decodes logical lines into `Key: value` pairs, skipping comments.
/// A line with no colon extends the value of the previous key.
fn decode(lines: &[String]) -> Fields {
    let mut fields = Fields::new();
    for line in lines {
        if comment_re().is_match(line) {
            continue;
        }
        match line.split_once(':') {
            Some((key, value)) => {
                fields.push((key.to_string(), value.trim_matches(' ').to_string()));
            }
            None => {
                if let Some((_, value)) = fields.last_mut() {
                    value.push_str(line.trim_matches(' '));
                }
            }
        }
    }
    fields
}
