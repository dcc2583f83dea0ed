use std::fmt;

use winnow::stream::Location;

use crate::span::Span;

/// Token types for the TypeScript declaration subset
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    // Keywords
    Interface,
    Type,
    Enum,
    Export,
    Declare,
    Const,
    Extends,
    Import,
    From,

    // Literals
    StringLiteral(String),
    NumberLiteral(&'src str),
    TemplateLiteral(&'src str),
    Identifier(&'src str),

    // Operators
    Arrow,     // =>
    Equals,    // =
    Colon,     // :
    Question,  // ?
    Pipe,      // |
    Ampersand, // &
    Dot,       // .
    Ellipsis,  // ...
    Minus,     // -
    Star,      // *
    Operator(char),

    // Punctuation
    LeftBrace,    // {
    RightBrace,   // }
    LeftBracket,  // [
    RightBracket, // ]
    LeftParen,    // (
    RightParen,   // )
    LessThan,     // <
    GreaterThan,  // >
    Semicolon,    // ;
    Comma,        // ,

    // Comments
    LineComment(&'src str),  // // comment
    BlockComment(&'src str), // /* comment */
    DocComment(&'src str),   // /** comment */, kept with its delimiters

    // Whitespace
    Whitespace,
    Newline,
}

impl Token<'_> {
    /// Returns `true` for tokens the parser skips between significant tokens.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace
                | Token::Newline
                | Token::LineComment(_)
                | Token::BlockComment(_)
                | Token::DocComment(_)
        )
    }

    /// Returns the source spelling of a keyword, if this token is one.
    pub fn keyword_text(&self) -> Option<&'static str> {
        match self {
            Token::Interface => Some("interface"),
            Token::Type => Some("type"),
            Token::Enum => Some("enum"),
            Token::Export => Some("export"),
            Token::Declare => Some("declare"),
            Token::Const => Some("const"),
            Token::Extends => Some("extends"),
            Token::Import => Some("import"),
            Token::From => Some("from"),
            _ => None,
        }
    }
}

/// A token with position information for winnow integration
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl Location for PositionedToken<'_> {
    fn previous_token_end(&self) -> usize {
        self.span.start()
    }

    fn current_token_start(&self) -> usize {
        self.span.start()
    }
}

/// Writes a string as a double-quoted TypeScript string literal.
pub(crate) fn write_quoted(f: &mut impl fmt::Write, value: &str) -> fmt::Result {
    f.write_char('"')?;
    for ch in value.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            ch => f.write_char(ch)?,
        }
    }
    f.write_char('"')
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Interface
            | Token::Type
            | Token::Enum
            | Token::Export
            | Token::Declare
            | Token::Const
            | Token::Extends
            | Token::Import
            | Token::From => f.write_str(self.keyword_text().unwrap_or_default()),

            Token::StringLiteral(s) => write_quoted(f, s),
            Token::NumberLiteral(n) => write!(f, "{n}"),
            Token::TemplateLiteral(t) => write!(f, "`{t}`"),
            Token::Identifier(name) => write!(f, "{name}"),

            Token::Arrow => write!(f, "=>"),
            Token::Equals => write!(f, "="),
            Token::Colon => write!(f, ":"),
            Token::Question => write!(f, "?"),
            Token::Pipe => write!(f, "|"),
            Token::Ampersand => write!(f, "&"),
            Token::Dot => write!(f, "."),
            Token::Ellipsis => write!(f, "..."),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Operator(op) => write!(f, "{op}"),

            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LessThan => write!(f, "<"),
            Token::GreaterThan => write!(f, ">"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),

            Token::LineComment(comment) => write!(f, "//{comment}"),
            Token::BlockComment(comment) => write!(f, "/*{comment}*/"),
            Token::DocComment(comment) => write!(f, "{comment}"),
            Token::Whitespace => write!(f, " "),
            Token::Newline => write!(f, "\\n"),
        }
    }
}
