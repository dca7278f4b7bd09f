//! Extraction of JSON objects from free-form text
//!
//! Text generators wrap their JSON in prose or markdown fences. The first
//! balanced `{...}` span is located by tracking brace depth outside of
//! string literals, then parsed as strict JSON with a JSON5 fallback
//! (comments, trailing commas, unquoted keys).

use serde_json::Value;
use thiserror::Error;

/// Error type for extraction failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    /// No `{` was found, or the first object never closes
    #[error("no JSON object found in text")]
    NotFound,
    /// The span was found but neither JSON nor JSON5 accepted it
    #[error("invalid JSON object at byte {offset}: {message}")]
    Invalid { offset: usize, message: String },
}

/// Locate the first balanced `{...}` span in `text`.
///
/// Returns the byte range of the span, braces included.
pub fn find_object_span(text: &str) -> Option<(usize, usize)> {
    let start = text.find('{')?;

    let mut depth = 0usize;
    // Quote that opened the current string; JSON5 allows `'` as well as `"`
    let mut quote: Option<char> = None;
    let mut escape_next = false;

    for (offset, ch) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match (quote, ch) {
            (Some(_), '\\') => escape_next = true,
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '{') => depth += 1,
            (None, '}') => {
                depth -= 1;
                if depth == 0 {
                    return Some((start, start + offset + 1));
                }
            }
            _ => {}
        }
    }

    None
}

/// Extract and parse the first JSON object in `text`.
pub fn extract_json(text: &str) -> Result<Value, ExtractError> {
    let (start, end) = find_object_span(text).ok_or(ExtractError::NotFound)?;
    let span = &text[start..end];

    match serde_json::from_str::<Value>(span) {
        Ok(value) => Ok(value),
        Err(strict_err) => json5::from_str::<Value>(span).map_err(|_| ExtractError::Invalid {
            offset: start,
            message: strict_err.to_string(),
        }),
    }
}

/// Like [`extract_json`], but malformed or absent JSON becomes `None`.
pub fn extract_json_lenient(text: &str) -> Option<Value> {
    match extract_json(text) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "no scene JSON in generated text");
            None
        }
    }
}
