//! Parser for TypeScript declaration tokens.
//!
//! This module turns the token stream from the [`lexer`](super::lexer) into
//! the syntax tree defined in [`parser_types`](super::parser_types). Only
//! interfaces, type aliases, enums and module specifiers are kept; every
//! other statement is skipped with bracket balancing. The public entry point
//! is [`build_module`].

use winnow::{
    Parser as _,
    combinator::{alt, opt, preceded, repeat, separated},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use tsexplode_core::identifier::Id;

use crate::{
    error::{Diagnostic, ErrorCode},
    parser_types as types,
    span::{Span, Spanned},
    tokens::{PositionedToken, Token, write_quoted},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what is currently being parsed
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) at error start position
    StartOffset(usize),
}

type Input<'src> = TsTokenSlice<'src>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;
/// Type alias for winnow TokenSlice with our positioned tokens
type TsTokenSlice<'src> = TokenSlice<'src, PositionedToken<'src>>;
type Checkpoint<'src> = <Input<'src> as Stream>::Checkpoint;

fn cut_err<'src, O, F>(input: &mut Input<'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    let start_remaining = input.eof_offset();

    match f(input) {
        Ok(o) => Ok(o),
        Err(ErrMode::Backtrack(mut e)) | Err(ErrMode::Cut(mut e)) => {
            e.push(Context::StartOffset(start_remaining));
            Err(ErrMode::Cut(e))
        }
        Err(e) => Err(e),
    }
}

/// Helper to create a Backtrack error carrying a label
fn backtrack_error(label: &'static str) -> ErrMode<ContextError<Context>> {
    let mut e = ContextError::new();
    e.push(Context::Label(label));
    ErrMode::Backtrack(e)
}

/// Parse whitespace, comments and newlines
fn trivia<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| token.is_trivia())
        .void()
        .parse_next(input)
}

/// Parse zero or more trivia tokens
fn ws0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(0.., trivia).parse_next(input)
}

/// Skip trivia, collecting the raw text of the doc comments in it.
fn leading_docs<'src>(input: &mut Input<'src>) -> IResult<Vec<String>> {
    repeat(
        0..,
        any.verify_map(|token: &PositionedToken<'_>| match token.token {
            Token::DocComment(text) => Some(Some(text.to_string())),
            ref other if other.is_trivia() => Some(None),
            _ => None,
        }),
    )
    .fold(Vec::new, |mut docs: Vec<String>, doc: Option<String>| {
        docs.extend(doc);
        docs
    })
    .parse_next(input)
}

/// Parse the next significant token, whatever it is.
fn next_significant<'src>(input: &mut Input<'src>) -> IResult<&'src PositionedToken<'src>> {
    preceded(ws0, any).parse_next(input)
}

/// Parse one significant token equal to `expected`, returning its span.
fn punct<'src>(
    expected: Token<'static>,
    label: &'static str,
) -> impl FnMut(&mut Input<'src>) -> IResult<Span> {
    move |input: &mut Input<'src>| {
        preceded(
            ws0,
            any.verify_map(|token: &PositionedToken<'_>| {
                (token.token == expected).then_some(token.span)
            }),
        )
        .context(Context::Label(label))
        .parse_next(input)
    }
}

/// Parse a contextual keyword, which the lexer hands over as an identifier.
fn contextual<'src>(word: &'static str) -> impl FnMut(&mut Input<'src>) -> IResult<Span> {
    move |input: &mut Input<'src>| {
        preceded(
            ws0,
            any.verify_map(|token: &PositionedToken<'_>| {
                matches!(token.token, Token::Identifier(name) if name == word)
                    .then_some(token.span)
            }),
        )
        .context(Context::Label(word))
        .parse_next(input)
    }
}

/// Peek at up to `count` significant tokens without consuming anything.
fn lookahead<'src>(input: &mut Input<'src>, count: usize) -> Vec<&'src Token<'src>> {
    let checkpoint = input.checkpoint();
    let mut found = Vec::with_capacity(count);
    while found.len() < count {
        match input.next_token() {
            Some(token) if token.is_trivia() => continue,
            Some(token) => found.push(&token.token),
            None => break,
        }
    }
    input.reset(&checkpoint);
    found
}

/// Returns `true` if a line break separates the input position from the next
/// significant token.
fn newline_ahead<'src>(input: &mut Input<'src>) -> bool {
    let checkpoint = input.checkpoint();
    let mut found = false;
    while let Some(token) = input.next_token() {
        match &token.token {
            Token::Newline => found = true,
            Token::BlockComment(text) | Token::DocComment(text) if text.contains('\n') => {
                found = true
            }
            other if other.is_trivia() => {}
            _ => break,
        }
    }
    input.reset(&checkpoint);
    found
}

/// Joins the significant tokens of a slice with single spaces where the
/// source had trivia between them.
fn normalized(tokens: &[PositionedToken<'_>]) -> Spanned<String> {
    let mut text = String::new();
    let mut span: Option<Span> = None;
    let mut pending_space = false;
    for token in tokens {
        if token.is_trivia() {
            pending_space = true;
            continue;
        }
        if pending_space && !text.is_empty() {
            text.push(' ');
        }
        pending_space = false;
        text.push_str(&token.to_string());
        span = Some(span.map_or(token.span, |span| span.union(token.span)));
    }
    Spanned::new(text, span.unwrap_or_default())
}

/// Normalized text of everything consumed since `checkpoint`.
fn text_since<'src>(
    input: &mut Input<'src>,
    checkpoint: &Checkpoint<'src>,
    start_remaining: usize,
) -> Spanned<String> {
    let consumed = start_remaining - input.eof_offset();
    input.reset(checkpoint);
    normalized(input.next_slice(consumed))
}

/// Run `parser`, returning the normalized text it consumed.
fn with_text<'src, F>(input: &mut Input<'src>, parser: F) -> IResult<Spanned<String>>
where
    F: FnOnce(&mut Input<'src>) -> IResult<()>,
{
    ws0(input)?;
    let checkpoint = input.checkpoint();
    let start_remaining = input.eof_offset();
    parser(input)?;
    Ok(text_since(input, &checkpoint, start_remaining))
}

fn is_name(token: &Token<'_>) -> bool {
    matches!(token, Token::Identifier(_)) || token.keyword_text().is_some()
}

fn is_property_name(token: &Token<'_>) -> bool {
    is_name(token) || matches!(token, Token::StringLiteral(_) | Token::NumberLiteral(_))
}

fn starts_type(token: &Token<'_>) -> bool {
    is_name(token)
        || matches!(
            token,
            Token::StringLiteral(_)
                | Token::NumberLiteral(_)
                | Token::TemplateLiteral(_)
                | Token::LeftParen
                | Token::LeftBracket
                | Token::LeftBrace
                | Token::LessThan
                | Token::Minus
                | Token::Pipe
                | Token::Ampersand
        )
}

fn starts_declaration(token: &Token<'_>) -> bool {
    matches!(
        token,
        Token::Export | Token::Import | Token::Interface | Token::Enum | Token::Declare | Token::Type
    )
}

/// Parse a raw identifier string with span preservation (low-level)
///
/// Keywords are accepted as identifiers; TypeScript reserves none of the
/// ones this lexer knows in name positions.
fn raw_identifier<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    preceded(
        ws0,
        any.verify_map(|token: &PositionedToken<'src>| match &token.token {
            Token::Identifier(name) => Some(Spanned::new(*name, token.span)),
            other => other
                .keyword_text()
                .map(|keyword| Spanned::new(keyword, token.span)),
        }),
    )
    .context(Context::Label("identifier"))
    .parse_next(input)
}

/// Parse an identifier as an interned [`Id`].
fn identifier<'src>(input: &mut Input<'src>) -> IResult<Spanned<Id>> {
    let raw = raw_identifier.parse_next(input)?;
    Ok(raw.map(|name| Id::new(name)))
}

/// Parse string literal
fn string_literal<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    preceded(
        ws0,
        any.verify_map(|token: &PositionedToken<'_>| match &token.token {
            Token::StringLiteral(s) => Some(Spanned::new(s.clone(), token.span)),
            _ => None,
        }),
    )
    .context(Context::Label("string literal"))
    .parse_next(input)
}

/// Parse a property name as written: identifiers and keywords verbatim,
/// string literals re-quoted, numeric names in their source spelling.
fn property_name<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    preceded(
        ws0,
        any.verify_map(|token: &PositionedToken<'_>| {
            let text = match &token.token {
                Token::Identifier(name) => name.to_string(),
                Token::NumberLiteral(number) => number.to_string(),
                Token::StringLiteral(value) => {
                    let mut text = String::new();
                    write_quoted(&mut text, value).ok()?;
                    text
                }
                other => other.keyword_text()?.to_string(),
            };
            Some(Spanned::new(text, token.span))
        }),
    )
    .context(Context::Label("property name"))
    .parse_next(input)
}

/// Consume a bracketed group, `(...)`, `[...]` or `{...}`, including any
/// nested groups.
fn balanced_group<'src>(input: &mut Input<'src>) -> IResult<()> {
    preceded(
        ws0,
        any.verify(|token: &PositionedToken<'_>| {
            matches!(
                token.token,
                Token::LeftParen | Token::LeftBracket | Token::LeftBrace
            )
        }),
    )
    .context(Context::Label("opening bracket"))
    .parse_next(input)?;

    let mut depth = 1usize;
    while depth > 0 {
        let Some(token) = input.next_token() else {
            return Err(backtrack_error("closing bracket"));
        };
        match token.token {
            Token::LeftParen | Token::LeftBracket | Token::LeftBrace => depth += 1,
            Token::RightParen | Token::RightBracket | Token::RightBrace => depth -= 1,
            _ => {}
        }
    }
    Ok(())
}

/// Consume a type parameter list `<...>` without looking inside it.
fn angle_group<'src>(input: &mut Input<'src>) -> IResult<()> {
    punct(Token::LessThan, "`<`").parse_next(input)?;

    let mut depth = 1usize;
    while depth > 0 {
        let Some(token) = input.next_token() else {
            return Err(backtrack_error("`>`"));
        };
        match token.token {
            Token::LessThan => depth += 1,
            Token::GreaterThan => depth -= 1,
            _ => {}
        }
    }
    Ok(())
}

/// Skip a statement the flattener has no use for.
///
/// The statement ends at a `;` or at a `}` closing its outermost block, or
/// right before a line that starts a new declaration.
fn skip_statement<'src>(input: &mut Input<'src>) -> IResult<()> {
    let mut depth = 0usize;
    let mut consumed = false;
    loop {
        if consumed
            && depth == 0
            && newline_ahead(input)
            && lookahead(input, 1).first().is_some_and(|token| starts_declaration(token))
        {
            break;
        }
        ws0(input)?;
        let Some(token) = input.next_token() else {
            break;
        };
        consumed = true;
        match token.token {
            Token::LeftParen | Token::LeftBracket | Token::LeftBrace => depth += 1,
            Token::RightParen | Token::RightBracket => depth = depth.saturating_sub(1),
            Token::RightBrace => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }
            Token::Semicolon if depth == 0 => break,
            _ => {}
        }
    }
    Ok(())
}

/// Parse `with { ... }` or `assert { ... }` after a module specifier.
fn import_attributes<'src>(input: &mut Input<'src>) -> IResult<()> {
    if matches!(
        lookahead(input, 2).as_slice(),
        [Token::Identifier("with" | "assert"), Token::LeftBrace]
    ) {
        next_significant(input)?;
        balanced_group(input)?;
    }
    Ok(())
}

/// Parse what follows `import` or `export` in a module statement, returning
/// the module specifier if there is one.
///
/// Examples:
/// - `"./side-effect"`
/// - `{ A, B as C } from "./a"`
/// - `type { A } from "./a"`
/// - `* as ns from "./a"`
/// - `Default, { A } from "./a"`
fn module_clause<'src>(input: &mut Input<'src>) -> IResult<Option<Spanned<String>>> {
    loop {
        match lookahead(input, 2).as_slice() {
            [Token::StringLiteral(_), ..] => {
                let specifier = string_literal(input)?;
                import_attributes(input)?;
                return Ok(Some(specifier));
            }
            [Token::From, Token::StringLiteral(_)] => {
                punct(Token::From, "`from`").parse_next(input)?;
                let specifier = string_literal(input)?;
                import_attributes(input)?;
                return Ok(Some(specifier));
            }
            [Token::LeftBrace, ..] => balanced_group(input)?,
            [Token::Equals, ..] => {
                // `import x = require("y")` and `import x = ns.y`
                skip_statement(input)?;
                return Ok(None);
            }
            [
                Token::Star | Token::Comma | Token::Type | Token::From | Token::Identifier(_),
                ..,
            ] => {
                next_significant(input)?;
            }
            _ => return Ok(None),
        }
    }
}

/// Parse an import declaration: `import ... from "x";`
fn import_declaration<'src>(input: &mut Input<'src>) -> IResult<Option<Spanned<String>>> {
    punct(Token::Import, "`import`").parse_next(input)?;
    let specifier = module_clause(input)?;
    opt(punct(Token::Semicolon, "`;`")).parse_next(input)?;
    Ok(specifier)
}

/// Parse a re-export: `export * from "x";` or `export { A } from "x";`
///
/// A local export list without `from` yields no specifier.
fn re_export<'src>(input: &mut Input<'src>) -> IResult<Option<Spanned<String>>> {
    punct(Token::Export, "`export`").parse_next(input)?;
    let specifier = module_clause(input)?;
    opt(punct(Token::Semicolon, "`;`")).parse_next(input)?;
    Ok(specifier)
}

/// Parse type parameters if present: `<T, U extends X = Y>`
fn type_parameters<'src>(input: &mut Input<'src>) -> IResult<Vec<types::TypeParameter>> {
    if !matches!(lookahead(input, 1).as_slice(), [Token::LessThan]) {
        return Ok(Vec::new());
    }

    punct(Token::LessThan, "`<`").parse_next(input)?;
    let parameters: Vec<types::TypeParameter> =
        separated(1.., type_parameter, punct(Token::Comma, "`,`")).parse_next(input)?;
    opt(punct(Token::Comma, "`,`")).parse_next(input)?;
    punct(Token::GreaterThan, "`>`").parse_next(input)?;
    Ok(parameters)
}

fn type_parameter<'src>(input: &mut Input<'src>) -> IResult<types::TypeParameter> {
    // Variance and const modifiers
    loop {
        match lookahead(input, 2).as_slice() {
            [Token::Identifier("in" | "out") | Token::Const, next] if is_name(next) => {
                next_significant(input)?;
            }
            _ => break,
        }
    }

    let name = identifier(input)?;
    let constraint = opt(preceded(punct(Token::Extends, "`extends`"), type_expr)).parse_next(input)?;
    let default = opt(preceded(punct(Token::Equals, "`=`"), type_expr)).parse_next(input)?;
    Ok(types::TypeParameter {
        name,
        constraint,
        default,
    })
}

/// Parse type arguments: `<A, B>`
fn type_arguments<'src>(input: &mut Input<'src>) -> IResult<Vec<types::TypeExpr>> {
    punct(Token::LessThan, "`<`").parse_next(input)?;
    let arguments: Vec<types::TypeExpr> =
        separated(1.., type_expr, punct(Token::Comma, "`,`")).parse_next(input)?;
    opt(punct(Token::Comma, "`,`")).parse_next(input)?;
    punct(Token::GreaterThan, "`>`")
        .context(Context::Label("type arguments"))
        .parse_next(input)?;
    Ok(arguments)
}

/// Parse a possibly qualified type reference: `ns.Name<A>`
fn type_reference<'src>(input: &mut Input<'src>) -> IResult<types::TypeReference> {
    ws0(input)?;
    let checkpoint = input.checkpoint();
    let start_remaining = input.eof_offset();

    let first = identifier(input)?;
    let rest: Vec<Spanned<Id>> =
        repeat(0.., preceded(punct(Token::Dot, "`.`"), identifier)).parse_next(input)?;
    let mut segments = vec![first];
    segments.extend(rest);

    let type_arguments = if matches!(lookahead(input, 1).as_slice(), [Token::LessThan]) {
        type_arguments(input)?
    } else {
        Vec::new()
    };

    let text = text_since(input, &checkpoint, start_remaining);
    Ok(types::TypeReference {
        segments,
        type_arguments,
        span: text.span(),
        text: text.into_inner(),
    })
}

/// Parse a full type, including conditional types.
///
/// `A extends B ? C : D` is kept as text.
fn type_expr<'src>(input: &mut Input<'src>) -> IResult<types::TypeExpr> {
    ws0(input)?;
    let checkpoint = input.checkpoint();
    let start_remaining = input.eof_offset();

    let check = union_type(input)?;
    if !matches!(lookahead(input, 1).as_slice(), [Token::Extends]) {
        return Ok(check);
    }

    punct(Token::Extends, "`extends`").parse_next(input)?;
    union_type(input)?;
    punct(Token::Question, "`?`").parse_next(input)?;
    type_expr(input)?;
    punct(Token::Colon, "`:`").parse_next(input)?;
    type_expr(input)?;
    Ok(types::TypeExpr::Text(text_since(
        input,
        &checkpoint,
        start_remaining,
    )))
}

/// Collapse a single-member union or intersection to that member.
fn collapse(
    mut members: Vec<types::TypeExpr>,
    wrap: fn(Vec<types::TypeExpr>) -> types::TypeExpr,
) -> types::TypeExpr {
    if members.len() == 1 {
        members.swap_remove(0)
    } else {
        wrap(members)
    }
}

/// Parse `A | B | C`, with an optional leading `|`.
fn union_type<'src>(input: &mut Input<'src>) -> IResult<types::TypeExpr> {
    opt(punct(Token::Pipe, "`|`")).parse_next(input)?;
    let members: Vec<types::TypeExpr> =
        separated(1.., intersection_type, punct(Token::Pipe, "`|`")).parse_next(input)?;
    Ok(collapse(members, types::TypeExpr::Union))
}

/// Parse `A & B & C`, with an optional leading `&`.
fn intersection_type<'src>(input: &mut Input<'src>) -> IResult<types::TypeExpr> {
    opt(punct(Token::Ampersand, "`&`")).parse_next(input)?;
    let members: Vec<types::TypeExpr> =
        separated(1.., operator_type, punct(Token::Ampersand, "`&`")).parse_next(input)?;
    Ok(collapse(members, types::TypeExpr::Intersection))
}

/// Parse type operators: `keyof T`, `unique symbol`, `infer U` and
/// `readonly T[]`.
fn operator_type<'src>(input: &mut Input<'src>) -> IResult<types::TypeExpr> {
    match lookahead(input, 2).as_slice() {
        [Token::Identifier("keyof" | "unique" | "infer"), next] if starts_type(next) => {
            let text = with_text(input, |input| {
                next_significant(input)?;
                operator_type(input).map(|_| ())
            })?;
            Ok(types::TypeExpr::Text(text))
        }
        // `readonly` only restricts mutation; the shape is the operand's
        [Token::Identifier("readonly"), next] if starts_type(next) => {
            next_significant(input)?;
            operator_type(input)
        }
        _ => postfix_type(input),
    }
}

/// Parse array suffixes and indexed access: `T[]`, `T["key"]`
///
/// Like TypeScript, a line break ends the type before a `[`.
fn postfix_type<'src>(input: &mut Input<'src>) -> IResult<types::TypeExpr> {
    ws0(input)?;
    let checkpoint = input.checkpoint();
    let start_remaining = input.eof_offset();

    let mut ty = primary_type(input)?;
    loop {
        if newline_ahead(input) {
            break;
        }
        match lookahead(input, 2).as_slice() {
            [Token::LeftBracket, Token::RightBracket] => {
                punct(Token::LeftBracket, "`[`").parse_next(input)?;
                punct(Token::RightBracket, "`]`").parse_next(input)?;
                ty = types::TypeExpr::Array(Box::new(ty));
            }
            [Token::LeftBracket, _] => {
                punct(Token::LeftBracket, "`[`").parse_next(input)?;
                type_expr(input)?;
                punct(Token::RightBracket, "`]`").parse_next(input)?;
                ty = types::TypeExpr::Text(text_since(input, &checkpoint, start_remaining));
            }
            _ => break,
        }
    }
    Ok(ty)
}

/// `{ [K in keyof T]: ... }`, optionally with a `readonly` modifier
fn is_mapped_type(ahead: &[&Token<'_>]) -> bool {
    let rest = match ahead {
        [
            Token::Minus | Token::Operator('+'),
            Token::Identifier("readonly"),
            rest @ ..,
        ] => rest,
        [Token::Identifier("readonly"), rest @ ..] => rest,
        rest => rest,
    };
    matches!(rest, [Token::LeftBracket, name, Token::Identifier("in"), ..] if is_name(name))
}

fn primary_type<'src>(input: &mut Input<'src>) -> IResult<types::TypeExpr> {
    let ahead = lookahead(input, 6);
    match ahead.as_slice() {
        [Token::LeftParen, ..] => alt((function_type, parenthesized_type)).parse_next(input),
        [Token::LessThan, ..]
        | [Token::Identifier("new"), Token::LeftParen | Token::LessThan, ..]
        | [Token::Identifier("abstract"), Token::Identifier("new"), ..] => function_type(input),
        [Token::LeftBrace, rest @ ..] if is_mapped_type(rest) => bracketed_text(input),
        [Token::LeftBrace, ..] => object_members(input).map(types::TypeExpr::Object),
        // Tuples
        [Token::LeftBracket, ..] => bracketed_text(input),
        [Token::StringLiteral(_), ..] => string_literal(input).map(types::TypeExpr::StringLiteral),
        [Token::NumberLiteral(_) | Token::TemplateLiteral(_), ..]
        | [Token::Minus, Token::NumberLiteral(_), ..] => {
            let text = with_text(input, |input| {
                opt(punct(Token::Minus, "`-`")).parse_next(input)?;
                next_significant(input).map(|_| ())
            })?;
            Ok(types::TypeExpr::Text(text))
        }
        [Token::Identifier("typeof"), ..] => type_query(input),
        [Token::Import, Token::LeftParen, ..] => {
            let text = with_text(input, import_type)?;
            Ok(types::TypeExpr::Text(text))
        }
        [name, ..] if is_name(name) => type_reference(input).map(types::TypeExpr::Reference),
        _ => Err(backtrack_error("type")),
    }
}

/// Parse `( T )`
fn parenthesized_type<'src>(input: &mut Input<'src>) -> IResult<types::TypeExpr> {
    punct(Token::LeftParen, "`(`").parse_next(input)?;
    let inner = type_expr(input)?;
    punct(Token::RightParen, "`)`").parse_next(input)?;
    Ok(types::TypeExpr::Parenthesized(Box::new(inner)))
}

/// Parse a function or constructor type, kept as text:
/// `<T>(a: T) => void`, `new () => Foo`
fn function_type<'src>(input: &mut Input<'src>) -> IResult<types::TypeExpr> {
    let text = with_text(input, |input| {
        opt(contextual("abstract")).parse_next(input)?;
        opt(contextual("new")).parse_next(input)?;
        opt(angle_group).parse_next(input)?;
        if !matches!(lookahead(input, 1).as_slice(), [Token::LeftParen]) {
            return Err(backtrack_error("parameter list"));
        }
        balanced_group(input)?;
        punct(Token::Arrow, "`=>`").parse_next(input)?;
        return_type(input).map(|_| ())
    })?;
    Ok(types::TypeExpr::Text(text))
}

/// Parse a tuple or mapped type, kept as text.
fn bracketed_text<'src>(input: &mut Input<'src>) -> IResult<types::TypeExpr> {
    let text = with_text(input, balanced_group)?;
    Ok(types::TypeExpr::Text(text))
}

/// Parse `typeof x.y` or `typeof import("x")`, kept as text.
fn type_query<'src>(input: &mut Input<'src>) -> IResult<types::TypeExpr> {
    let text = with_text(input, |input| {
        contextual("typeof").parse_next(input)?;
        if matches!(lookahead(input, 1).as_slice(), [Token::Import]) {
            return import_type(input);
        }
        raw_identifier(input)?;
        let _: () = repeat(0.., preceded(punct(Token::Dot, "`.`"), raw_identifier).void())
            .parse_next(input)?;
        Ok(())
    })?;
    Ok(types::TypeExpr::Text(text))
}

/// Parse `import("x").Name<T>`
fn import_type<'src>(input: &mut Input<'src>) -> IResult<()> {
    punct(Token::Import, "`import`").parse_next(input)?;
    balanced_group(input)?;
    let _: () = repeat(0.., preceded(punct(Token::Dot, "`.`"), raw_identifier).void())
        .parse_next(input)?;
    if matches!(lookahead(input, 1).as_slice(), [Token::LessThan]) {
        type_arguments(input)?;
    }
    Ok(())
}

/// Parse the return type of a signature, including type predicates
/// (`x is T`, `asserts x`), which are kept as text.
fn return_type<'src>(input: &mut Input<'src>) -> IResult<types::TypeExpr> {
    let is_predicate = match lookahead(input, 3).as_slice() {
        [Token::Identifier("asserts"), next, ..] => is_name(next),
        [name, Token::Identifier("is"), ..] => is_name(name),
        _ => false,
    };
    if !is_predicate {
        return type_expr(input);
    }

    let text = with_text(input, |input| {
        if matches!(
            lookahead(input, 2).as_slice(),
            [Token::Identifier("asserts"), next] if is_name(next)
        ) {
            next_significant(input)?;
        }
        raw_identifier(input)?;
        opt(preceded(contextual("is"), type_expr)).parse_next(input)?;
        Ok(())
    })?;
    Ok(types::TypeExpr::Text(text))
}

/// Parse the tail of a call, construct or method signature:
/// `<T>(params): ReturnType`
fn signature_tail<'src>(input: &mut Input<'src>) -> IResult<()> {
    if matches!(lookahead(input, 1).as_slice(), [Token::LessThan]) {
        angle_group(input)?;
    }
    if !matches!(lookahead(input, 1).as_slice(), [Token::LeftParen]) {
        return Err(backtrack_error("parameter list"));
    }
    balanced_group(input)?;
    if matches!(lookahead(input, 1).as_slice(), [Token::Colon]) {
        punct(Token::Colon, "`:`").parse_next(input)?;
        return_type(input)?;
    }
    Ok(())
}

/// Parse `?`, or `-?` and `+?` in mapped types.
fn optional_marker<'src>(input: &mut Input<'src>) -> IResult<bool> {
    match lookahead(input, 2).as_slice() {
        [Token::Question, ..] => {
            next_significant(input)?;
            Ok(true)
        }
        [Token::Minus | Token::Operator('+'), Token::Question] => {
            next_significant(input)?;
            next_significant(input)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Parse one member of an interface body or object type literal.
///
/// Returns `None` for members that are not property signatures: call and
/// construct signatures, index signatures, methods and accessors.
fn type_member<'src>(
    input: &mut Input<'src>,
    docs: Vec<String>,
) -> IResult<Option<types::PropertySignature>> {
    let readonly = match lookahead(input, 2).as_slice() {
        [Token::Identifier("readonly"), next] => {
            is_property_name(next) || matches!(next, Token::LeftBracket)
        }
        _ => false,
    };
    if readonly {
        next_significant(input)?;
    }

    match lookahead(input, 2).as_slice() {
        [Token::LeftParen | Token::LessThan, ..] => {
            signature_tail(input)?;
            return Ok(None);
        }
        [Token::Identifier("new"), Token::LeftParen | Token::LessThan] => {
            next_significant(input)?;
            signature_tail(input)?;
            return Ok(None);
        }
        [Token::LeftBracket, ..] => {
            balanced_group(input)?;
            optional_marker(input)?;
            match lookahead(input, 1).as_slice() {
                [Token::LeftParen | Token::LessThan] => signature_tail(input)?,
                [Token::Colon] => {
                    punct(Token::Colon, "`:`").parse_next(input)?;
                    type_expr(input)?;
                }
                _ => {}
            }
            return Ok(None);
        }
        [Token::Identifier("get" | "set"), next] if is_property_name(next) => {
            next_significant(input)?;
            property_name(input)?;
            signature_tail(input)?;
            return Ok(None);
        }
        _ => {}
    }

    let name = property_name(input)?;
    let optional = optional_marker(input)?;

    let ty = match lookahead(input, 1).as_slice() {
        [Token::LeftParen | Token::LessThan] => {
            signature_tail(input)?;
            return Ok(None);
        }
        [Token::Colon] => {
            punct(Token::Colon, "`:`").parse_next(input)?;
            type_expr(input)?
        }
        // An unannotated property is implicitly `any`
        _ => types::TypeExpr::Text(Spanned::new("any".to_string(), name.span())),
    };

    Ok(Some(types::PropertySignature {
        name,
        optional,
        readonly,
        ty,
        docs,
    }))
}

/// Parse a member list: `{ a: T; b?: U, c(): void }`
///
/// Members may be separated by `;`, `,` or line breaks.
fn object_members<'src>(input: &mut Input<'src>) -> IResult<Vec<types::PropertySignature>> {
    punct(Token::LeftBrace, "`{`").parse_next(input)?;

    let mut members = Vec::new();
    loop {
        let docs = leading_docs(input)?;
        match lookahead(input, 1).as_slice() {
            [Token::RightBrace] | [] => break,
            [Token::Semicolon | Token::Comma] => {
                next_significant(input)?;
            }
            _ => members.extend(type_member(input, docs)?),
        }
    }

    punct(Token::RightBrace, "`}`").parse_next(input)?;
    Ok(members)
}

/// Parse an interface declaration
///
/// Example: `interface Contact<T> extends Named, Tagged<T> { name: string; }`
fn interface_declaration<'src>(
    input: &mut Input<'src>,
    docs: Vec<String>,
) -> IResult<types::InterfaceDeclaration> {
    punct(Token::Interface, "`interface`").parse_next(input)?;

    cut_err(input, |input| {
        let name = identifier(input)?;
        let type_parameters = type_parameters(input)?;
        let extends: Option<Vec<types::TypeReference>> = opt(preceded(
            punct(Token::Extends, "`extends`"),
            separated(1.., type_reference, punct(Token::Comma, "`,`")),
        ))
        .parse_next(input)?;
        let members = object_members(input)?;

        Ok(types::InterfaceDeclaration {
            name,
            type_parameters,
            extends: extends.unwrap_or_default(),
            members,
            docs,
        })
    })
}

/// Parse a type alias declaration: `type Name<T> = ...;`
fn type_alias_declaration<'src>(
    input: &mut Input<'src>,
    docs: Vec<String>,
) -> IResult<types::TypeAliasDeclaration> {
    punct(Token::Type, "`type`").parse_next(input)?;

    cut_err(input, |input| {
        let name = identifier(input)?;
        let type_parameters = type_parameters(input)?;
        punct(Token::Equals, "`=`").parse_next(input)?;
        let ty = type_expr(input)?;
        opt(punct(Token::Semicolon, "`;`")).parse_next(input)?;

        Ok(types::TypeAliasDeclaration {
            name,
            type_parameters,
            ty,
            docs,
        })
    })
}

/// Interpret a numeric literal, or `None` for bigints and other forms
/// without a plain number value.
fn number_value(text: &str) -> Option<f64> {
    let digits = text.replace('_', "");
    if digits.ends_with('n') {
        return None;
    }
    let radix = match digits.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return digits.parse::<f64>().ok(),
    };
    u64::from_str_radix(&digits[2..], radix)
        .ok()
        .map(|value| value as f64)
}

/// Parse an enum member initializer up to the next `,` or `}`.
fn enum_initializer<'src>(input: &mut Input<'src>) -> IResult<Spanned<types::EnumInitializer>> {
    ws0(input)?;
    let checkpoint = input.checkpoint();
    let start_remaining = input.eof_offset();

    let mut depth = 0usize;
    loop {
        match lookahead(input, 1).as_slice() {
            [] => break,
            [Token::Comma | Token::RightBrace] if depth == 0 => break,
            [Token::LeftParen | Token::LeftBracket | Token::LeftBrace] => depth += 1,
            [Token::RightParen | Token::RightBracket | Token::RightBrace] => {
                depth = depth.saturating_sub(1)
            }
            _ => {}
        }
        next_significant(input)?;
    }

    let consumed = start_remaining - input.eof_offset();
    input.reset(&checkpoint);
    let tokens = input.next_slice(consumed);
    let significant: Vec<&Token<'_>> = tokens
        .iter()
        .filter(|token| !token.is_trivia())
        .map(|token| &token.token)
        .collect();
    let text = normalized(tokens);

    let value = match significant.as_slice() {
        [] => return Err(backtrack_error("enum initializer")),
        [Token::StringLiteral(value)] => types::EnumInitializer::String(value.clone()),
        [Token::TemplateLiteral(body)] if !body.contains("${") => {
            types::EnumInitializer::String(body.to_string())
        }
        [Token::NumberLiteral(number)] | [Token::Operator('+'), Token::NumberLiteral(number)] => {
            number_value(number)
                .map(types::EnumInitializer::Number)
                .unwrap_or_else(|| types::EnumInitializer::Expression(text.inner().clone()))
        }
        [Token::Minus, Token::NumberLiteral(number)] => number_value(number)
            .map(|value| types::EnumInitializer::Number(-value))
            .unwrap_or_else(|| types::EnumInitializer::Expression(text.inner().clone())),
        _ => types::EnumInitializer::Expression(text.inner().clone()),
    };
    Ok(Spanned::new(value, text.span()))
}

/// Parse an enum member name: an identifier or a string literal.
fn enum_member_name<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    preceded(
        ws0,
        any.verify_map(|token: &PositionedToken<'_>| {
            let name = match &token.token {
                Token::Identifier(name) => name.to_string(),
                Token::StringLiteral(value) => value.clone(),
                other => other.keyword_text()?.to_string(),
            };
            Some(Spanned::new(name, token.span))
        }),
    )
    .context(Context::Label("enum member"))
    .parse_next(input)
}

fn enum_member<'src>(input: &mut Input<'src>) -> IResult<types::EnumMemberDeclaration> {
    let name = enum_member_name(input)?;
    let initializer = if matches!(lookahead(input, 1).as_slice(), [Token::Equals]) {
        punct(Token::Equals, "`=`").parse_next(input)?;
        Some(enum_initializer(input)?)
    } else {
        None
    };
    Ok(types::EnumMemberDeclaration { name, initializer })
}

/// Parse an enum declaration
///
/// Example: `const enum Color { Red = "RED", Green = "GREEN" }`
fn enum_declaration<'src>(
    input: &mut Input<'src>,
    docs: Vec<String>,
) -> IResult<types::EnumDeclaration> {
    let is_const = opt(punct(Token::Const, "`const`"))
        .parse_next(input)?
        .is_some();
    punct(Token::Enum, "`enum`").parse_next(input)?;

    cut_err(input, |input| {
        let name = identifier(input)?;
        punct(Token::LeftBrace, "`{`").parse_next(input)?;

        let mut members = Vec::new();
        loop {
            match lookahead(input, 1).as_slice() {
                [Token::RightBrace] => break,
                [Token::Comma] => {
                    next_significant(input)?;
                }
                _ => members.push(enum_member(input)?),
            }
        }
        punct(Token::RightBrace, "`}`").parse_next(input)?;

        Ok(types::EnumDeclaration {
            name,
            is_const,
            members,
            docs,
        })
    })
}

/// Parse one top-level statement, adding what it declares to `module`.
fn statement<'src>(
    input: &mut Input<'src>,
    docs: Vec<String>,
    module: &mut types::Module,
) -> IResult<()> {
    let ahead = lookahead(input, 3);
    match ahead.as_slice() {
        [Token::Semicolon, ..] => {
            next_significant(input)?;
        }
        // Dynamic `import("x")` and `import.meta` are expressions
        [Token::Import, Token::LeftParen | Token::Dot, ..] => skip_statement(input)?,
        [Token::Import, ..] => module.imports.extend(import_declaration(input)?),
        [Token::Export, Token::Star | Token::LeftBrace, ..]
        | [Token::Export, Token::Type, Token::Star | Token::LeftBrace] => {
            module.imports.extend(re_export(input)?)
        }
        [Token::Export, Token::Identifier("default"), Token::Interface] => {
            next_significant(input)?;
            next_significant(input)?;
            let interface = interface_declaration(input, docs)?;
            module
                .declarations
                .push(types::Declaration::Interface(interface));
        }
        [Token::Export, Token::Identifier("default") | Token::Equals, ..]
        | [Token::Export, Token::Identifier("as"), ..] => skip_statement(input)?,
        [Token::Export | Token::Declare, ..] => {
            next_significant(input)?;
            statement(input, docs, module)?;
        }
        [Token::Interface, ..] => {
            let interface = interface_declaration(input, docs)?;
            module
                .declarations
                .push(types::Declaration::Interface(interface));
        }
        [Token::Type, next, ..] if is_name(next) => {
            let alias = type_alias_declaration(input, docs)?;
            module
                .declarations
                .push(types::Declaration::TypeAlias(alias));
        }
        [Token::Const, Token::Enum, ..] | [Token::Enum, ..] => {
            let declaration = enum_declaration(input, docs)?;
            module
                .declarations
                .push(types::Declaration::Enum(declaration));
        }
        _ => skip_statement(input)?,
    }
    Ok(())
}

fn module<'src>(input: &mut Input<'src>) -> IResult<types::Module> {
    let mut module = types::Module::default();
    loop {
        let docs = leading_docs(input)?;
        if input.eof_offset() == 0 {
            break;
        }
        statement(input, docs, &mut module)?;
    }
    Ok(module)
}

fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken],
    current_remaining: usize,
) -> Diagnostic {
    let end_offset = tokens.len() - current_remaining;
    let last_significant = tokens
        .iter()
        .rev()
        .find(|t| !t.is_trivia())
        .map(|t| t.span)
        .unwrap_or_default();
    // The first significant token at or after the failure point
    let offending = tokens[end_offset.min(tokens.len())..]
        .iter()
        .find(|t| !t.is_trivia());

    let e = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    let Some(offending) = offending else {
        // Ran out of tokens mid-declaration
        return Diagnostic::error("incomplete input, more tokens expected")
            .with_code(ErrorCode::E101)
            .with_label(last_significant, "input ends here")
            .with_help("ensure input is complete");
    };

    let contexts: Vec<String> = e
        .context()
        .filter_map(|ctx| match ctx {
            Context::Label(label) => Some(format!("expected {label}")),
            Context::StartOffset(_) => None,
        })
        .collect();

    let message = if contexts.is_empty() {
        "unexpected token or end of input".to_string()
    } else {
        contexts.join(" → ")
    };

    let mut diagnostic = Diagnostic::error(format!("unexpected token: {message}"))
        .with_code(ErrorCode::E100)
        .with_label(offending.span, "unexpected token")
        .with_help("check syntax and token positioning");

    // Point at where the enclosing declaration started
    let start_remaining = e.context().find_map(|ctx| match ctx {
        Context::StartOffset(n) => Some(*n),
        Context::Label(_) => None,
    });
    if let Some(start) = start_remaining
        .map(|remaining| tokens.len() - remaining)
        .and_then(|offset| tokens[offset..].iter().find(|t| !t.is_trivia()))
        .filter(|start| start.span != offending.span)
    {
        diagnostic = diagnostic.with_secondary_label(start.span, "in this declaration");
    }
    diagnostic
}

/// Build a module from tokens
pub fn build_module<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<types::Module, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);

    match module.parse_next(&mut token_slice) {
        Ok(module) => Ok(module),
        Err(e) => {
            let current_remaining = token_slice.eof_offset();
            Err(convert_error(e, tokens, current_remaining))
        }
    }
}
