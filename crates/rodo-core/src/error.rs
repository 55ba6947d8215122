//! # Error Types
//!
//! Errors raised by the assessment model. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! Lookup failures name the kind of node and its id so that callers can
//! surface them without further context.

use thiserror::Error;

/// Top-level error type for the assessment model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RodoError {
    /// A chapter, area or requirement id does not exist in the tree.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Node kind ("chapter", "area", "requirement").
        kind: &'static str,
        /// The id that was looked up.
        id: u32,
    },

    /// A field failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// A string could not be parsed into a domain value.
    #[error("invalid {field} value: {value:?}")]
    InvalidValue {
        /// The field being parsed.
        field: &'static str,
        /// The rejected input.
        value: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl RodoError {
    pub(crate) fn not_found(kind: &'static str, id: u32) -> Self {
        Self::NotFound { kind, id }
    }
}

impl From<serde_json::Error> for RodoError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_kind_and_id() {
        let err = RodoError::not_found("area", 12);
        assert_eq!(err.to_string(), "area 12 not found");
    }

    #[test]
    fn invalid_value_quotes_input() {
        let err = RodoError::InvalidValue {
            field: "answer",
            value: "MAYBE".to_string(),
        };
        assert_eq!(err.to_string(), "invalid answer value: \"MAYBE\"");
    }

    #[test]
    fn serde_error_converts() {
        let err: RodoError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, RodoError::Serialization(_)));
    }
}
