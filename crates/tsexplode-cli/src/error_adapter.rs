//! Error adapter for converting ExplodeError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When a [`tsexplode_parser::error::ParseError`] contains multiple
//! diagnostics, each diagnostic is rendered independently. Warnings that
//! travel alongside errors keep their warning severity.

use std::fmt;

use miette::{
    Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan, Severity, SourceSpan,
};

use tsexplode::ExplodeError;
use tsexplode_parser::error::Diagnostic;

/// Adapter for a single front-end diagnostic.
///
/// This adapter wraps a single [`Diagnostic`] and implements
/// [`MietteDiagnostic`] to enable rich error formatting in the CLI.
pub struct DiagnosticAdapter<'a> {
    /// The wrapped diagnostic
    diag: &'a Diagnostic,
    /// Source code for displaying snippets
    src: &'a str,
    /// Name of the unit the source was read from
    path: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, src: &'a str, path: &'a str) -> Self {
        Self { diag, src, path }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .field("path", &self.path)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<Severity> {
        if self.diag.severity().is_warning() {
            Some(Severity::Warning)
        } else {
            Some(Severity::Error)
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for non-diagnostic [`ExplodeError`] variants.
///
/// This adapter handles errors that don't carry source spans, such as I/O
/// errors, resolution failures, cycles and export errors.
pub struct ErrorAdapter<'a>(pub &'a ExplodeError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            ExplodeError::Io(_) => "tsexplode::io",
            ExplodeError::Parse { .. } => return None,
            ExplodeError::UnresolvedInterface(_) => "tsexplode::unresolved_interface",
            ExplodeError::UnresolvedAncestor { .. } => "tsexplode::unresolved_ancestor",
            ExplodeError::NotAnEnumMember(_) => "tsexplode::not_an_enum_member",
            ExplodeError::CyclicTypeReference { .. } => "tsexplode::cyclic_type_reference",
            ExplodeError::Config(_) => "tsexplode::config",
            ExplodeError::Export(_) => "tsexplode::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            ExplodeError::UnresolvedInterface(_) | ExplodeError::UnresolvedAncestor { .. } => {
                "add the file declaring it to the inputs or import it with a relative path"
            }
            ExplodeError::NotAnEnumMember(_) => {
                "reference a single member such as `Enum.Member`, or give every member a literal value"
            }
            ExplodeError::CyclicTypeReference { .. } => {
                "a flattened type must be finite; mark a type on the cycle as an entry of its own instead"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a single diagnostic or a non-diagnostic error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A rich diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<Severity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a front-end [`Span`](tsexplode_parser::Span) to a miette [`SourceSpan`].
fn span_to_miette(span: tsexplode_parser::Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert an [`ExplodeError`] into a list of reportable errors.
///
/// For [`ExplodeError::Parse`], this returns one [`Reportable`] for each
/// diagnostic in the error. For other error variants, this returns a single
/// [`Reportable`].
pub fn to_reportables(err: &ExplodeError) -> Vec<Reportable<'_>> {
    match err {
        ExplodeError::Parse {
            err: parse_err,
            src,
            path,
        } => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src, path)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

/// Render every reportable of `err` with `handler`, one report per entry.
///
/// A report the handler fails to render falls back to its one-line message.
pub fn render_reports(err: &ExplodeError, handler: &GraphicalReportHandler) -> Vec<String> {
    to_reportables(err)
        .iter()
        .map(|reportable| {
            let mut report = String::new();
            match handler.render_report(&mut report, reportable) {
                Ok(()) => report,
                Err(_) => reportable.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use miette::GraphicalTheme;
    use tsexplode_parser::{
        Span,
        error::{ErrorCode, ParseError},
    };

    use super::*;

    #[test]
    fn test_single_diagnostic() {
        let diag = Diagnostic::error("unterminated string literal")
            .with_code(ErrorCode::E001)
            .with_label(Span::new(9..14), "here")
            .with_help("close the string on the same line");
        let err = ExplodeError::new_parse_error(ParseError::from(diag), "type A = 'open", "a.ts");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.to_string(), "a.ts: unterminated string literal");
                assert_eq!(d.code().map(|c| c.to_string()), Some("E001".to_string()));
                assert!(d.help().is_some());
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_multiple_diagnostics() {
        let diags = vec![
            Diagnostic::error("first error")
                .with_code(ErrorCode::E300)
                .with_label(Span::new(0..5), "first"),
            Diagnostic::error("second error")
                .with_code(ErrorCode::E301)
                .with_label(Span::new(10..15), "second")
                .with_help("help for second"),
            Diagnostic::error("third error").with_label(Span::new(20..25), "third"),
        ];
        let err = ExplodeError::new_parse_error(
            ParseError::from(diags),
            "source code here...........",
            "types.ts",
        );

        let reportables = to_reportables(&err);

        // Each diagnostic is separate
        assert_eq!(reportables.len(), 3);
        assert_eq!(reportables[0].to_string(), "types.ts: first error");
        assert_eq!(reportables[1].to_string(), "types.ts: second error");
        assert_eq!(reportables[2].to_string(), "types.ts: third error");
    }

    #[test]
    fn test_non_parse_error() {
        let err = ExplodeError::CyclicTypeReference {
            path: vec!["Node".into(), "Node".into()],
        };

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Cyclic type reference: Node -> Node");
                assert_eq!(
                    e.code().map(|c| c.to_string()),
                    Some("tsexplode::cyclic_type_reference".to_string())
                );
                assert!(e.help().is_some());
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_warnings_keep_their_severity() {
        let diags = vec![
            Diagnostic::error("enum member `HOME` must have initializer")
                .with_code(ErrorCode::E301)
                .with_label(Span::new(0..4), "missing initializer"),
            Diagnostic::warning("`Phone` is declared more than once")
                .with_label(Span::new(5..10), "later declaration"),
        ];
        let err = ExplodeError::new_parse_error(ParseError::from(diags), "HOME Phone", "phone.ts");

        let severities: Vec<Option<Severity>> =
            to_reportables(&err).iter().map(|r| r.severity()).collect();
        assert_eq!(
            severities,
            vec![Some(Severity::Error), Some(Severity::Warning)]
        );
    }

    #[test]
    fn test_render_reports_one_per_diagnostic() {
        let diags = vec![
            Diagnostic::error("type alias `A` circularly references itself")
                .with_code(ErrorCode::E300)
                .with_label(Span::new(5..6), "circular type alias"),
            Diagnostic::error("type alias `B` circularly references itself")
                .with_code(ErrorCode::E300)
                .with_label(Span::new(17..18), "circular type alias"),
        ];
        let err = ExplodeError::new_parse_error(
            ParseError::from(diags),
            "type A = B;\ntype B = A;",
            "loop.ts",
        );
        let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());

        let reports = render_reports(&err, &handler);
        assert_eq!(reports.len(), 2);
        assert!(reports[0].contains("loop.ts: type alias `A` circularly references itself"));
        assert!(reports[0].contains("E300"));
        assert!(reports[1].contains("type alias `B`"));
    }

    #[test]
    fn test_config_error_has_no_help() {
        let err = ExplodeError::Config("Validation error: marker_tag must not be empty".into());
        let adapter = ErrorAdapter(&err);

        assert!(adapter.help().is_none());
        assert!(adapter.labels().is_none());
    }

    #[test]
    fn test_primary_flag_on_labels() {
        let diag = Diagnostic::error("type alias `A` circularly references itself")
            .with_label(Span::new(0..5), "primary")
            .with_secondary_label(Span::new(10..15), "secondary");

        let adapter = DiagnosticAdapter::new(&diag, "some source code", "a.ts");

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label(), Some("primary"));
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
    }
}
