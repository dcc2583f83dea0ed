//! Lexical analyzer for TypeScript declaration files.
//!
//! The lexer converts source text into a stream of [`Token`]s for parsing.
//! Whitespace, newlines and comments are kept as tokens: the parser needs
//! JSDoc comments to attach documentation, and normalized type text is
//! rebuilt from the token stream.
//!
//! The public entry point is [`tokenize`], which performs error-recovering
//! lexical analysis and collects all diagnostics in a single pass.

use std::ops::RangeInclusive;

use winnow::{
    Parser,
    ascii::digit1,
    combinator::{alt, cut_err, delimited, not, opt, peek, preceded, repeat, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{any, literal, none_of, one_of, take_until, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Rich diagnostic information for lexer errors.
///
/// Attached to winnow errors via `.context()`; the span of the resulting
/// diagnostic runs from `start` to the position where lexing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type LexError = ErrMode<ContextError<LexerDiagnostic>>;
type IResult<O> = ModalResult<O, ContextError<LexerDiagnostic>>;

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Parse a run of hex digits and convert it to a character.
fn hex_char<'a>(
    digits: RangeInclusive<usize>,
    strict: bool,
) -> impl Parser<Input<'a>, char, LexError> {
    take_while(digits, |c: char| c.is_ascii_hexdigit()).verify_map(move |hex: &str| {
        let value = u32::from_str_radix(hex, 16).ok()?;
        match char::from_u32(value) {
            Some(ch) => Some(ch),
            // Lone surrogates are legal in `\uXXXX` escapes but not in a Rust string
            None if !strict => Some(char::REPLACEMENT_CHARACTER),
            None => None,
        }
    })
}

/// Parse an escape sequence inside a string literal.
///
/// Returns `None` for a line continuation, which contributes nothing to the
/// string value. Unknown single-character escapes stand for the character
/// itself, as in JavaScript.
fn string_escape(input: &mut Input<'_>) -> IResult<Option<char>> {
    let escape_start = input.current_token_start();
    let invalid = LexerDiagnostic {
        code: ErrorCode::E003,
        message: "invalid escape sequence",
        help: Some("use `\\xHH`, `\\uHHHH` or `\\u{H...}` with hexadecimal digits"),
        start: escape_start,
    };

    preceded(
        '\\',
        alt((
            alt(("\r\n", "\n", "\r")).value(None),
            preceded('x', cut_err(hex_char(2..=2, true)).context(invalid.clone())).map(Some),
            preceded(
                'u',
                cut_err(alt((
                    delimited('{', hex_char(1..=6, true), '}'),
                    hex_char(4..=4, false),
                )))
                .context(invalid),
            )
            .map(Some),
            any.map(|escaped: char| {
                Some(match escaped {
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'b' => '\u{08}',
                    'f' => '\u{0C}',
                    'v' => '\u{0B}',
                    '0' => '\0',
                    other => other,
                })
            }),
        )),
    )
    .parse_next(input)
}

/// Parse a single- or double-quoted string literal.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();
    let quote = one_of(['"', '\'']).parse_next(input)?;

    let plain =
        none_of(move |c: char| c == quote || c == '\\' || c == '\n' || c == '\r').map(Some);
    let content = repeat(0.., alt((string_escape, plain))).fold(String::new, |mut acc, ch| {
        if let Some(ch) = ch {
            acc.push(ch);
        }
        acc
    });

    cut_err(terminated(content, quote))
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("close the string with a matching quote on the same line"),
            start,
        })
        .map(Token::StringLiteral)
        .parse_next(input)
}

/// Parse a template literal, kept as raw text between the backticks.
fn template_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();
    '`'.parse_next(input)?;

    let body = repeat::<_, _, (), _, _>(
        0..,
        alt((preceded('\\', any).void(), none_of(['`', '\\']).void())),
    )
    .take();

    cut_err(terminated(body, '`'))
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated template literal",
            help: Some("add closing '`'"),
            start,
        })
        .map(Token::TemplateLiteral)
        .parse_next(input)
}

/// Parse a numeric literal: decimal with optional fraction and exponent,
/// prefixed binary/octal/hex, numeric separators and the BigInt suffix.
fn number_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let digits = |c: char| c.is_ascii_digit() || c == '_';
    let prefixed = (
        '0',
        one_of(['x', 'X', 'o', 'O', 'b', 'B']),
        take_while(1.., |c: char| c.is_ascii_hexdigit() || c == '_'),
    )
        .void();
    let decimal = (
        digit1,
        take_while(0.., digits),
        opt(('.', take_while(0.., digits))),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .void();

    terminated(
        (alt((prefixed, decimal)), opt('n')).take(),
        // `1px` is not a number followed by an identifier
        peek(not(one_of(is_identifier_continue))),
    )
    .map(Token::NumberLiteral)
    .parse_next(input)
}

/// Parse an identifier, mapping reserved words to keyword tokens.
///
/// Keywords are still accepted wherever the parser expects a name.
fn identifier_or_keyword<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    (one_of(is_identifier_start), take_while(0.., is_identifier_continue))
        .take()
        .map(|word| match word {
            "interface" => Token::Interface,
            "type" => Token::Type,
            "enum" => Token::Enum,
            "export" => Token::Export,
            "declare" => Token::Declare,
            "const" => Token::Const,
            "extends" => Token::Extends,
            "import" => Token::Import,
            "from" => Token::From,
            word => Token::Identifier(word),
        })
        .parse_next(input)
}

/// Parse `//` comments.
fn line_comment<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    preceded("//", take_while(0.., |c| c != '\n'))
        .map(Token::LineComment)
        .parse_next(input)
}

/// Parse `/** ... */` and `/* ... */` comments.
///
/// `/**/` is an empty block comment, not a doc comment.
fn block_comment<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();
    let unterminated = LexerDiagnostic {
        code: ErrorCode::E004,
        message: "unterminated block comment",
        help: Some("add closing `*/`"),
        start,
    };

    let doc = (
        "/**",
        peek(not('/')),
        cut_err((take_until(0.., "*/"), "*/")).context(unterminated.clone()),
    )
        .take()
        .map(Token::DocComment);
    let block = preceded(
        "/*",
        cut_err(terminated(take_until(0.., "*/"), "*/")).context(unterminated),
    )
    .map(Token::BlockComment);

    alt((doc, block)).parse_next(input)
}

/// Parse multi-character operators (longest first)
fn multi_char_operator<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        literal("=>").value(Token::Arrow),
        literal("...").value(Token::Ellipsis),
    ))
    .parse_next(input)
}

/// Parse single character tokens
fn single_char_token<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        alt((
            '{'.value(Token::LeftBrace),
            '}'.value(Token::RightBrace),
            '['.value(Token::LeftBracket),
            ']'.value(Token::RightBracket),
            '('.value(Token::LeftParen),
            ')'.value(Token::RightParen),
            '<'.value(Token::LessThan),
            '>'.value(Token::GreaterThan),
            ';'.value(Token::Semicolon),
            ','.value(Token::Comma),
        )),
        alt((
            ':'.value(Token::Colon),
            '?'.value(Token::Question),
            '|'.value(Token::Pipe),
            '&'.value(Token::Ampersand),
            '='.value(Token::Equals),
            '.'.value(Token::Dot),
            '-'.value(Token::Minus),
            '*'.value(Token::Star),
        )),
        one_of(['+', '!', '%', '^', '~', '@', '#', '/']).map(Token::Operator),
    ))
    .parse_next(input)
}

/// Parse whitespace other than newlines. A byte order mark counts as whitespace.
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., |c: char| {
        (c.is_whitespace() && c != '\n') || c == '\u{FEFF}'
    })
    .value(Token::Whitespace)
    .parse_next(input)
}

fn newline<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    '\n'.value(Token::Newline).parse_next(input)
}

/// Parse a single token with position tracking
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        block_comment,         // Must come before line comment and '/'
        line_comment,          // Must come before '/'
        string_literal,
        template_literal,
        multi_char_operator,   // Must come before '=' and '.'
        number_literal,        // Must come before identifier
        identifier_or_keyword,
        single_char_token,
        newline,               // Must come before whitespace
        whitespace,
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();
    Ok(PositionedToken::new(token, Span::new(start_pos..end_pos)))
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Tokenize the input, collecting tokens and errors.
    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            let checkpoint = input.checkpoint();
            let token_start = input.current_token_start();

            match positioned_token(&mut input) {
                Ok(token) => self.tokens.push(token),
                Err(err) => {
                    let error_pos = input.current_token_start();
                    match Self::convert_err_mode(err, error_pos) {
                        Some(diagnostic) => {
                            let code = diagnostic.code();
                            self.diagnostics.emit(diagnostic);
                            Self::recover(&mut input, code);
                        }
                        None => {
                            input.reset(&checkpoint);
                            let width = input.next_token().map_or(1, char::len_utf8);
                            let span = Span::new(token_start..token_start + width);
                            self.diagnostics.emit(
                                Diagnostic::error("unexpected character")
                                    .with_code(ErrorCode::E002)
                                    .with_label(span, ErrorCode::E002.description()),
                            );
                        }
                    }
                }
            }
        }
    }

    /// Skip input after a committed error so one mistake yields one diagnostic.
    ///
    /// String errors resume on the next line; an unterminated block comment
    /// swallows the rest of the input.
    fn recover(input: &mut Input<'a>, code: Option<ErrorCode>) {
        match code {
            Some(ErrorCode::E001 | ErrorCode::E003) => {
                while let Some(ch) = input.next_token() {
                    if ch == '\n' {
                        break;
                    }
                }
            }
            Some(ErrorCode::E004) => {
                let remaining = input.eof_offset();
                input.next_slice(remaining);
            }
            _ => {
                input.next_token();
            }
        }
    }

    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish().map(|()| self.tokens)
    }

    /// Convert a lexer error carrying diagnostic context into a [`Diagnostic`].
    ///
    /// Returns `None` when no alternative committed, meaning the current
    /// character starts no token at all.
    fn convert_err_mode(err: LexError, error_pos: usize) -> Option<Diagnostic> {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => return None,
        };

        let LexerDiagnostic {
            code,
            message,
            help,
            start,
        } = context_error.context().next()?;

        let mut diagnostic = Diagnostic::error(*message)
            .with_code(*code)
            .with_label(Span::new(*start..error_pos), code.description());
        if let Some(help) = help {
            diagnostic = diagnostic.with_help(*help);
        }
        Some(diagnostic)
    }
}

/// Tokenize source text, collecting every lexical error.
///
/// # Returns
///
/// - `Ok(tokens)` - All tokens successfully lexed
/// - `Err(ParseError)` - One or more errors occurred; contains all diagnostics
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let mut lexer = Lexer::new();
    lexer.tokenize(LocatingSlice::new(input));
    lexer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_token(input: &str) -> Token<'_> {
        let mut located = LocatingSlice::new(input);
        let positioned = positioned_token(&mut located)
            .unwrap_or_else(|err| panic!("failed to lex {input:?}: {err:?}"));
        assert!(located.is_empty(), "{input:?} was not lexed as one token");
        positioned.token
    }

    fn significant(input: &str) -> Vec<Token<'_>> {
        tokenize(input)
            .expect("input should tokenize")
            .into_iter()
            .map(|t| t.token)
            .filter(|t| !t.is_trivia())
            .collect()
    }

    fn error_codes(input: &str) -> Vec<ErrorCode> {
        tokenize(input)
            .expect_err("input should fail to tokenize")
            .diagnostics()
            .iter()
            .filter_map(Diagnostic::code)
            .collect()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(single_token("interface"), Token::Interface);
        assert_eq!(single_token("type"), Token::Type);
        assert_eq!(single_token("enum"), Token::Enum);
        assert_eq!(single_token("export"), Token::Export);
        assert_eq!(single_token("declare"), Token::Declare);
        assert_eq!(single_token("const"), Token::Const);
        assert_eq!(single_token("extends"), Token::Extends);
        assert_eq!(single_token("import"), Token::Import);
        assert_eq!(single_token("from"), Token::From);
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(single_token("Contact"), Token::Identifier("Contact"));
        assert_eq!(single_token("_private"), Token::Identifier("_private"));
        assert_eq!(single_token("$ref"), Token::Identifier("$ref"));
        assert_eq!(single_token("interfaces"), Token::Identifier("interfaces"));
        assert_eq!(single_token("typeName"), Token::Identifier("typeName"));
        assert_eq!(single_token("größe"), Token::Identifier("größe"));
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(single_token("\"CELL\""), Token::StringLiteral("CELL".into()));
        assert_eq!(single_token("'CELL'"), Token::StringLiteral("CELL".into()));
        assert_eq!(single_token("\"it's\""), Token::StringLiteral("it's".into()));
        assert_eq!(single_token("'say \"hi\"'"), Token::StringLiteral("say \"hi\"".into()));
        assert_eq!(single_token("''"), Token::StringLiteral(String::new()));
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(single_token(r#""a\nb""#), Token::StringLiteral("a\nb".into()));
        assert_eq!(single_token(r#""\x41""#), Token::StringLiteral("A".into()));
        assert_eq!(single_token(r#""é""#), Token::StringLiteral("é".into()));
        assert_eq!(single_token(r#""\u{1F602}""#), Token::StringLiteral("😂".into()));
        assert_eq!(single_token(r#""\q""#), Token::StringLiteral("q".into()));
        assert_eq!(single_token("\"a\\\nb\""), Token::StringLiteral("ab".into()));
        assert_eq!(
            single_token(r#""\uD83D""#),
            Token::StringLiteral(char::REPLACEMENT_CHARACTER.to_string())
        );
    }

    #[test]
    fn test_template_literal() {
        assert_eq!(
            single_token("`id-${string}`"),
            Token::TemplateLiteral("id-${string}")
        );
        assert_eq!(single_token(r"`a\`b`"), Token::TemplateLiteral(r"a\`b"));
    }

    #[test]
    fn test_number_literals() {
        assert_eq!(single_token("0"), Token::NumberLiteral("0"));
        assert_eq!(single_token("42"), Token::NumberLiteral("42"));
        assert_eq!(single_token("1.5"), Token::NumberLiteral("1.5"));
        assert_eq!(single_token("2.5e-3"), Token::NumberLiteral("2.5e-3"));
        assert_eq!(single_token("0xFF"), Token::NumberLiteral("0xFF"));
        assert_eq!(single_token("1_000"), Token::NumberLiteral("1_000"));
        assert_eq!(single_token("10n"), Token::NumberLiteral("10n"));
    }

    #[test]
    fn test_comments() {
        assert_eq!(single_token("// note"), Token::LineComment(" note"));
        assert_eq!(single_token("/* note */"), Token::BlockComment(" note "));
        assert_eq!(single_token("/**/"), Token::BlockComment(""));
        assert_eq!(
            single_token("/** @document */"),
            Token::DocComment("/** @document */")
        );
        assert_eq!(
            single_token("/**\n * A contact.\n */"),
            Token::DocComment("/**\n * A contact.\n */")
        );
    }

    #[test]
    fn test_operators_and_punctuation() {
        assert_eq!(
            significant("{ } [ ] ( ) < > ; , : ? | & = . - * => ... + !"),
            vec![
                Token::LeftBrace,
                Token::RightBrace,
                Token::LeftBracket,
                Token::RightBracket,
                Token::LeftParen,
                Token::RightParen,
                Token::LessThan,
                Token::GreaterThan,
                Token::Semicolon,
                Token::Comma,
                Token::Colon,
                Token::Question,
                Token::Pipe,
                Token::Ampersand,
                Token::Equals,
                Token::Dot,
                Token::Minus,
                Token::Star,
                Token::Arrow,
                Token::Ellipsis,
                Token::Operator('+'),
                Token::Operator('!'),
            ]
        );
    }

    #[test]
    fn test_interface_declaration_tokens() {
        assert_eq!(
            significant("export interface Tag { name?: string }"),
            vec![
                Token::Export,
                Token::Interface,
                Token::Identifier("Tag"),
                Token::LeftBrace,
                Token::Identifier("name"),
                Token::Question,
                Token::Colon,
                Token::Identifier("string"),
                Token::RightBrace,
            ]
        );
    }

    #[test]
    fn test_span_tracking() {
        let tokens = tokenize("type Id = string;").expect("should tokenize");
        assert_eq!(tokens[0].span, Span::new(0..4));
        assert_eq!(tokens[2].span, Span::new(5..7));
        assert_eq!(tokens[6].span, Span::new(10..16));
    }

    #[test]
    fn test_byte_order_mark_is_whitespace() {
        assert_eq!(significant("\u{FEFF}type"), vec![Token::Type]);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("type A = \"open\ntype B = 1;").expect_err("should fail");
        assert_eq!(err.diagnostics().len(), 1);
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E001));
        assert_eq!(diag.labels()[0].span().start(), 9);
    }

    #[test]
    fn test_invalid_escapes() {
        assert_eq!(error_codes(r#"type A = "\xZZ";"#), vec![ErrorCode::E003]);
        assert_eq!(error_codes(r#"type A = "\u{110000}";"#), vec![ErrorCode::E003]);
        assert_eq!(error_codes(r#"type A = "\u12";"#), vec![ErrorCode::E003]);
    }

    #[test]
    fn test_unterminated_block_comment() {
        assert_eq!(error_codes("type A = 1; /* never closed"), vec![ErrorCode::E004]);
        assert_eq!(error_codes("/** never closed"), vec![ErrorCode::E004]);
    }

    #[test]
    fn test_unexpected_characters_are_all_reported() {
        let err = tokenize("type A = 1; § type B = 2; \\").expect_err("should fail");
        let codes: Vec<_> = err.diagnostics().iter().filter_map(Diagnostic::code).collect();
        assert_eq!(codes, vec![ErrorCode::E002, ErrorCode::E002]);
        assert_eq!(err.diagnostics()[0].labels()[0].span(), Span::new(12..14));
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn identifier_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z_$][a-zA-Z0-9_$]{0,20}"
    }

    proptest! {
        #[test]
        fn identifiers_tokenize(id in identifier_strategy()) {
            let source = format!("interface {id} {{ {id}: {id}; }}");
            let result = tokenize(&source);
            prop_assert!(result.is_ok(), "failed to tokenize `{}`: {:?}", id, result.err());
        }

        #[test]
        fn tokenize_never_panics(source in "\\PC{0,200}") {
            let _ = tokenize(&source);
        }

        #[test]
        fn token_spans_are_contiguous(source in "[a-z0-9 {}:;|\\[\\]\n\"'/*]{0,80}") {
            if let Ok(tokens) = tokenize(&source) {
                let mut expected_start = 0;
                for token in &tokens {
                    prop_assert_eq!(token.span.start(), expected_start);
                    expected_start = token.span.end();
                }
                prop_assert_eq!(expected_start, source.len());
            }
        }
    }
}
