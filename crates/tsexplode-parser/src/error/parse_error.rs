//! Error types wrapping front-end diagnostics.

use std::fmt;

use thiserror::Error;

use crate::error::Diagnostic;

/// One or more diagnostics produced while lexing, parsing or elaborating a
/// single source unit.
#[derive(Debug)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.diagnostics.first() {
            write!(f, "{first}")?;
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

/// A [`ParseError`] attributed to the source unit it came from.
///
/// Elaboration works on all units at once, so its diagnostics carry the
/// index of the unit whose source the spans point into.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct UnitError {
    unit: usize,
    #[source]
    error: ParseError,
}

impl UnitError {
    pub fn new(unit: usize, error: ParseError) -> Self {
        Self { unit, error }
    }

    /// Returns the index of the offending unit, in the order units were given.
    pub fn unit(&self) -> usize {
        self.unit
    }

    pub fn error(&self) -> &ParseError {
        &self.error
    }

    pub fn into_error(self) -> ParseError {
        self.error
    }
}
