//! Line-list parsers for the three vector resources.
//!
//! All three share one lexical rule: lines are trimmed, and blank lines and
//! lines starting with `#` carry nothing.

use std::collections::HashMap;

/// Comment marker for every vector resource.
pub const COMMENT_PREFIX: char = '#';

/// Yield `(line_number, content)` for every line that carries data.
///
/// Line numbers are 1-based, for error messages.
pub fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with(COMMENT_PREFIX))
}

/// Parse every data line as an unsigned integer.
///
/// # Errors
///
/// Returns a description of the first line that is not an integer.
pub fn parse_int_list(text: &str) -> Result<Vec<u8>, String> {
    data_lines(text)
        .map(|(n, line)| {
            line.parse::<u8>()
                .map_err(|e| format!("line {n}: {line:?} is not a pixel value ({e})"))
        })
        .collect()
}

/// Parse the expected label: the first data line wins.
///
/// Later lines are never read, even when they disagree with the first.
///
/// # Errors
///
/// Returns a description if there is no data line or the first one is not
/// an integer.
pub fn parse_first_int(text: &str) -> Result<u8, String> {
    let (n, line) = data_lines(text)
        .next()
        .ok_or_else(|| "no expected-label line".to_string())?;
    line.parse::<u8>()
        .map_err(|e| format!("line {n}: {line:?} is not a label ({e})"))
}

/// Parse `key: value` lines, split on the first colon, both sides trimmed.
///
/// Lines without a colon are ignored; a repeated key keeps its last value.
pub fn parse_metadata(text: &str) -> HashMap<String, String> {
    data_lines(text)
        .filter_map(|(_, line)| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}
