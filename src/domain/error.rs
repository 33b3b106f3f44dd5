//! Codec errors
//!
//! Every failure of a `try_parse_*` call ends up as a [`ParseError`]. Its
//! `Display` rendering is the human-readable reason string handed to callers,
//! so each variant names the offending field path together with the expected
//! and the found shape.

use thiserror::Error;

/// Expected-versus-found description produced by a failed value conversion.
///
/// Converters don't know which field they are working on; the field extractor
/// attaches the field path when it turns a `Mismatch` into a [`ParseError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub expected: String,
    pub found: String,
}

impl Mismatch {
    pub fn new(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Errors raised while decoding a wire document into a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A mandatory field is absent.
    #[error("Missing mandatory field '{field}' (expected {expected})")]
    MissingField { field: String, expected: String },

    /// A field is present but its value can't be converted.
    #[error("Malformed field '{field}': expected {expected}, found {found}")]
    MalformedField {
        field: String,
        expected: String,
        found: String,
    },

    /// The document root is not the element/object this message expects.
    #[error("Unexpected document: expected {expected}, found {found}")]
    UnexpectedElement { expected: String, found: String },

    /// The raw text could not be read as a JSON or XML document at all.
    #[error("Invalid {format} document: {reason}")]
    InvalidDocument { format: &'static str, reason: String },

    /// A custom parser hook rejected the decoded message.
    #[error("Custom {action} parser failed: {reason}")]
    Mapping { action: &'static str, reason: String },
}

impl ParseError {
    pub(crate) fn missing(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            expected: expected.into(),
        }
    }

    pub(crate) fn malformed(field: impl Into<String>, mismatch: Mismatch) -> Self {
        Self::MalformedField {
            field: field.into(),
            expected: mismatch.expected,
            found: mismatch.found,
        }
    }

    /// Path of the field the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field, .. } | Self::MalformedField { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Result type for decoding operations
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_reason_names_field_and_shapes() {
        let err = ParseError::malformed("type", Mismatch::new("one of Hard, Soft", "\"Medium\""));
        let reason = err.to_string();
        assert!(reason.contains("'type'"));
        assert!(reason.contains("Hard, Soft"));
        assert!(reason.contains("Medium"));
        assert_eq!(err.field(), Some("type"));
    }

    #[test]
    fn mapping_error_has_no_field() {
        let err = ParseError::Mapping {
            action: "Reset",
            reason: "vendor extension rejected".into(),
        };
        assert_eq!(err.field(), None);
        assert_eq!(
            err.to_string(),
            "Custom Reset parser failed: vendor extension rejected"
        );
    }
}
