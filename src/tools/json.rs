//! JSON validation and pretty-printing.

use serde::Serialize;

/// Result of validating a JSON document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JsonValidation {
    Valid { valid: bool, formatted: String },
    Invalid { valid: bool, error: String },
}

/// Parses `text` and returns it pretty-printed, or the parse error with its
/// position.
pub fn validate_json(text: &str) -> JsonValidation {
    let parsed = serde_json::from_str::<serde_json::Value>(text)
        .and_then(|value| serde_json::to_string_pretty(&value));
    match parsed {
        Ok(formatted) => JsonValidation::Valid {
            valid: true,
            formatted,
        },
        Err(e) => JsonValidation::Invalid {
            valid: false,
            error: e.to_string(),
        },
    }
}
