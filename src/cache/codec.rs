//! Flat-file encoding for the variables cache
//!
//! The cache file holds every variable in a single line of text. Records are
//! `name=<SEP>value` and are joined with `<SEP><SEP>`, where `<SEP>` is a
//! zero-width space (U+200B). There is no escaping: names and values are
//! assumed never to contain the separator, which is invisible and practically
//! never typed on a command line. The store rejects input that does.

use std::collections::HashMap;

use thiserror::Error;

/// Reserved separator character (zero-width space)
pub const SEPARATOR: char = '\u{200B}';

/// Delimiter placed between two records
const PAIR_SEP: &str = "\u{200B}\u{200B}";

/// Delimiter placed between a name and its value
const NAME_VALUE_SEP: &str = "=\u{200B}";

/// Errors that can occur while decoding cache file content
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A record did not follow the `name=<SEP>value` layout
    #[error("Corrupted variables cache (record {record}): {reason}")]
    CorruptFormat {
        /// Zero-based index of the offending record
        record: usize,
        /// What was wrong with it
        reason: &'static str,
    },
}

/// Returns true if `s` contains the reserved separator and therefore cannot
/// be stored without corrupting the file.
pub fn contains_reserved(s: &str) -> bool {
    s.contains(SEPARATOR)
}

/// Encodes a variable mapping into its cache file representation.
///
/// Record order follows the map's iteration order and is not stable.
/// An empty mapping encodes to an empty string.
pub fn encode(vars: &HashMap<String, String>) -> String {
    vars.iter()
        .map(|(name, value)| format!("{}{}{}", name, NAME_VALUE_SEP, value))
        .collect::<Vec<_>>()
        .join(PAIR_SEP)
}

/// Decodes cache file content back into a variable mapping.
///
/// Records are read left to right. A name runs up to the first `=<SEP>`, and
/// since values never contain the separator a value runs up to the next
/// `<SEP>`, which must either end the text or be followed by exactly one more
/// `<SEP>` and another record. Reading it this way (rather than splitting on
/// `<SEP><SEP>`) keeps empty values intact.
///
/// # Returns
/// * `Ok(HashMap)` with one entry per record (later duplicates win)
/// * `Err(CodecError::CorruptFormat)` if any record is malformed
pub fn decode(content: &str) -> Result<HashMap<String, String>, CodecError> {
    let mut vars = HashMap::new();
    if content.is_empty() {
        return Ok(vars);
    }

    let mut rest = content;
    let mut record = 0;

    loop {
        let corrupt = |reason: &'static str| CodecError::CorruptFormat { record, reason };

        let (name, after_name) = rest
            .split_once(NAME_VALUE_SEP)
            .ok_or_else(|| corrupt("missing name/value delimiter"))?;
        if contains_reserved(name) {
            return Err(corrupt("separator inside variable name"));
        }

        let (value, after_value) = match after_name.split_once(SEPARATOR) {
            Some((value, tail)) => (value, Some(tail)),
            None => (after_name, None),
        };
        if value.ends_with('=') && after_value.is_some_and(|tail| !tail.starts_with(SEPARATOR)) {
            return Err(corrupt("name/value delimiter inside value"));
        }

        vars.insert(name.to_string(), value.to_string());

        match after_value {
            None => break,
            Some(tail) => {
                rest = tail
                    .strip_prefix(SEPARATOR)
                    .ok_or_else(|| corrupt("stray separator after value"))?;
                if rest.is_empty() {
                    return Err(corrupt("trailing record delimiter"));
                }
            }
        }

        record += 1;
    }

    Ok(vars)
}
