//! Command line parser
//!
//! Splits `[NAME]value`, `$NAME=value` and `$NAME` into key and value.

use crate::status::Status;

/// Parsed command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    /// Normalized key, case preserved
    pub key: &'a str,
    /// `None` for a bare query, `Some("")` for an explicit empty value
    pub value: Option<&'a str>,
}

impl<'a> ParsedLine<'a> {
    /// Value is absent or empty
    pub fn is_query(&self) -> bool {
        self.value.map_or(true, str::is_empty)
    }
}

/// Parse one line. A bracket form without `]` is rejected outright.
pub fn parse_line(line: &str) -> Result<ParsedLine<'_>, Status> {
    if let Some(rest) = line.strip_prefix('[') {
        let close = rest.find(']').ok_or(Status::InvalidStatement)?;
        return Ok(ParsedLine {
            key: normalize_key(&rest[..close]),
            value: Some(&rest[close + 1..]),
        });
    }

    let body = line.strip_prefix('$').unwrap_or(line);
    Ok(match body.split_once('=') {
        Some((key, value)) => ParsedLine { key: normalize_key(key), value: Some(value) },
        None => ParsedLine { key: normalize_key(body), value: None },
    })
}

/// Drop leading whitespace and cut at the first whitespace after the name
pub fn normalize_key(raw: &str) -> &str {
    let s = raw.trim_start();
    match s.find(char::is_whitespace) {
        Some(end) => &s[..end],
        None => s,
    }
}
