//! Error and diagnostic system for the tsexplode front end.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans for rich error context
//! - Severity levels
//! - Diagnostic collector for accumulating multiple errors
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, multiple source
//! locations, and help text. Multiple diagnostics are wrapped in [`ParseError`]
//! when lexing, parsing or elaborating a source unit fails.
//!
//! # Example
//!
//! ```
//! # use tsexplode_parser::error::{Diagnostic, ErrorCode};
//! # use tsexplode_parser::Span;
//!
//! let span = Span::new(100..120);
//! let target_span = Span::new(50..70);
//!
//! let diag = Diagnostic::error("type alias `A` circularly references itself")
//!     .with_code(ErrorCode::E300)
//!     .with_label(span, "alias declared here")
//!     .with_secondary_label(target_span, "cycle continues here")
//!     .with_help("break the cycle with an object type or an interface");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::{ParseError, UnitError};
pub use severity::Severity;
