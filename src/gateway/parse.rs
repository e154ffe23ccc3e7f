//! Delimiter-scan extraction of JSON from free-text completion responses.
//!
//! The model wraps its JSON in prose more often than not. We take the first
//! `{` to the last `}` (or `[`…`]`) as the candidate payload and force every
//! caller to handle the unparseable branch explicitly.

use serde::de::DeserializeOwned;

/// Outcome of parsing a completion response.
///
/// `Unparseable` carries the raw response text so callers can log it.
#[derive(Debug)]
pub enum ParseOutcome<T> {
    Parsed(T),
    Unparseable(String),
}

impl<T> ParseOutcome<T> {
    #[cfg(test)]
    pub fn parsed(self) -> Option<T> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::Unparseable(_) => None,
        }
    }
}

/// Extract and decode the first `{` … last `}` substring.
pub fn extract_object<T: DeserializeOwned>(raw: &str) -> ParseOutcome<T> {
    match delimited(raw, '{', '}').and_then(|s| serde_json::from_str(s).ok()) {
        Some(value) => ParseOutcome::Parsed(value),
        None => ParseOutcome::Unparseable(raw.to_string()),
    }
}

/// Extract and decode the first `[` … last `]` substring as a JSON array.
pub fn extract_array(raw: &str) -> ParseOutcome<Vec<serde_json::Value>> {
    match delimited(raw, '[', ']').and_then(|s| serde_json::from_str(s).ok()) {
        Some(values) => ParseOutcome::Parsed(values),
        None => ParseOutcome::Unparseable(raw.to_string()),
    }
}

fn delimited(raw: &str, open: char, close: char) -> Option<&str> {
    let start = raw.find(open)?;
    let end = raw.rfind(close)?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}
