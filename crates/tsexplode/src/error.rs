//! Error types for tsexplode operations.
//!
//! This module provides the main error type [`ExplodeError`] which wraps the
//! conditions that abort a run. Duplicate interface names are advisory and
//! never surface here.

use std::io;

use thiserror::Error;

use tsexplode_parser::error::ParseError;

/// The main error type for tsexplode operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries structured diagnostics with source spans,
/// together with the source text and path of the unit they point into, so
/// front ends can render rich reports.
#[derive(Debug, Error)]
pub enum ExplodeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{path}: {err}")]
    Parse {
        err: ParseError,
        src: String,
        path: String,
    },

    #[error("Can't find interface: \"{0}\"")]
    UnresolvedInterface(String),

    #[error("Can't find interface \"{ancestor}\" extended by \"{interface}\"")]
    UnresolvedAncestor { interface: String, ancestor: String },

    #[error("Expected \"{0}\" to be an enum member")]
    NotAnEnumMember(String),

    #[error("Cyclic type reference: {}", path.join(" -> "))]
    CyclicTypeReference { path: Vec<String> },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::emit::Error> for ExplodeError {
    fn from(error: crate::emit::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl ExplodeError {
    /// Create a new `Parse` error with the source it was produced from.
    pub fn new_parse_error(
        err: ParseError,
        src: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::Parse {
            err,
            src: src.into(),
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tsexplode_parser::error::Diagnostic;

    use super::*;

    #[test]
    fn test_cycle_message_lists_path() {
        let err = ExplodeError::CyclicTypeReference {
            path: vec!["Node".into(), "Edge".into(), "Node".into()],
        };
        assert_eq!(err.to_string(), "Cyclic type reference: Node -> Edge -> Node");
    }

    #[test]
    fn test_parse_error_names_unit() {
        let err = ExplodeError::new_parse_error(
            Diagnostic::error("unexpected character").into(),
            "interface ~",
            "broken.ts",
        );
        assert_eq!(err.to_string(), "broken.ts: error: unexpected character");
    }
}
