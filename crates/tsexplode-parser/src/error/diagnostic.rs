//! The core diagnostic type for front-end errors.
//!
//! A [`Diagnostic`] represents a single error or warning with optional
//! error code, multiple labeled source spans, and help text. The problems
//! elaboration reports about declarations have dedicated constructors so
//! their wording stays the same wherever they are raised.

use std::fmt;

use crate::{
    error::{ErrorCode, Label, Severity},
    span::Span,
};

/// A rich diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// error[E301]: enum member must have initializer
///   --> phone.ts:4:5
///    |
///  4 |     HOME,
///    |     ^^^^ needs an initializer
///    |
///  3 |     BUSINESS = "BUSINESS",
///    |     --------------------- previous member has a string value
///    |
///    = help: give `HOME` an explicit value
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use tsexplode_parser::error::{Diagnostic, ErrorCode};
    /// # use tsexplode_parser::Span;
    ///
    /// let diag = Diagnostic::error("unexpected token: expected type")
    ///     .with_code(ErrorCode::E100)
    ///     .with_label(Span::new(12..13), "unexpected token")
    ///     .with_help("check syntax and token positioning");
    /// assert!(diag.severity().is_error());
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

// ============================================================================
// Declaration Diagnostics
// ============================================================================

impl Diagnostic {
    /// A declaration whose name is already taken by an earlier interface,
    /// alias or enum. References keep resolving to the earlier one.
    pub fn duplicate_declaration(name: impl fmt::Display, span: Span) -> Self {
        Self::warning(format!("`{name}` is declared more than once"))
            .with_label(span, "later declaration")
            .with_help("references resolve to the first declaration")
    }

    /// A type alias on a cycle of plain alias references, with every alias
    /// of the cycle listed in the help.
    pub fn circular_alias(name: impl fmt::Display, span: Span, cycle: &[String]) -> Self {
        Self::error(format!("type alias `{name}` circularly references itself"))
            .with_code(ErrorCode::E300)
            .with_label(span, "circular type alias")
            .with_help(format!("aliases in the cycle: {}", cycle.join(", ")))
    }

    /// An enum member without initializer following a string-valued member.
    pub fn missing_enum_initializer(member: impl fmt::Display, span: Span) -> Self {
        Self::error(format!("enum member `{member}` must have initializer"))
            .with_code(ErrorCode::E301)
            .with_label(span, "missing initializer")
            .with_help(format!(
                "`{member}` follows a string-valued member, so its value cannot be inferred"
            ))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // "error[E001]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
