//! Labeled source spans for diagnostic messages.

use crate::span::Span;

/// A labeled span in source code.
///
/// A primary label marks where the problem is; secondary labels point at
/// related locations, such as the other aliases in a cycle.
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let primary = Label::primary(Span::new(10..20), "needs an initializer");
        assert_eq!(primary.span().start(), 10);
        assert_eq!(primary.message(), "needs an initializer");
        assert!(primary.is_primary());

        let secondary = Label::secondary(Span::new(5..15), "previous member");
        assert_eq!(secondary.span().end(), 15);
        assert!(secondary.is_secondary());
    }
}
