//! Parser for state-diagram source text.
//!
//! The grammar is line oriented: a document is the `stateDiagram` header
//! followed by transitions, state descriptions, and `state X { ... }`
//! blocks. Blocks are parsed recursively, so the produced AST mirrors the
//! nesting structure and brace balance is checked here, not later.

use winnow::{
    Parser,
    ascii::{line_ending, space0, space1, till_line_ending},
    combinator::{alt, cut_err, eof, opt, peek, preceded, repeat},
    error::{ContextError, ErrMode, StrContext},
    stream::{LocatingSlice, Stream},
    token::take_while,
};

use machina_core::identifier::DELIMITER;

use crate::{
    ast::Statement,
    error::{Diagnostic, ErrorCode, ParseError},
    span::{Span, Spanned},
};

type Input<'src> = LocatingSlice<&'src str>;
type IResult<O> = Result<O, ErrMode<ContextError>>;

const HEADER_CONTEXT: &str = "stateDiagram header";
const CLOSE_CONTEXT: &str = "closing brace";

/// Parses a complete document into spanned statements.
pub(crate) fn parse_document(source: &str) -> Result<Vec<Spanned<Statement>>, ParseError> {
    let mut input = LocatingSlice::new(source);

    let result =
        diagram(&mut input).and_then(|statements| eof.void().parse_next(&mut input).map(|()| statements));

    match result {
        Ok(statements) => Ok(statements),
        Err(err) => {
            // On failure the stream sits at the offending position.
            let offset = source.len() - input.eof_offset();
            Err(diagnose(source, offset, &err).into())
        }
    }
}

fn diagram(input: &mut Input<'_>) -> IResult<Vec<Spanned<Statement>>> {
    header(input)?;
    let statements = document(input)?;
    junk(input)?;
    Ok(statements)
}

fn header(input: &mut Input<'_>) -> IResult<()> {
    preceded(junk, ("stateDiagram", eol))
        .void()
        .context(StrContext::Label(HEADER_CONTEXT))
        .parse_next(input)
}

fn document(input: &mut Input<'_>) -> IResult<Vec<Spanned<Statement>>> {
    repeat(0.., preceded(junk, spanned_statement)).parse_next(input)
}

fn spanned_statement(input: &mut Input<'_>) -> IResult<Spanned<Statement>> {
    alt((block, transition, description))
        .with_span()
        .map(|(statement, range)| Spanned::new(statement, Span::new(range)))
        .parse_next(input)
}

/// `state Name { ... }`
fn block(input: &mut Input<'_>) -> IResult<Statement> {
    let (_, _, name, _, _) = ("state", space1, identifier, space0, '{').parse_next(input)?;
    // Committed once the brace is seen; the body must close.
    let body = cut_err(document).parse_next(input)?;
    cut_err(preceded(junk, '}'))
        .context(StrContext::Label(CLOSE_CONTEXT))
        .parse_next(input)?;
    Ok(Statement::Block {
        name: name.to_string(),
        body,
    })
}

/// `A --> B` or `A --> B : label`
fn transition(input: &mut Input<'_>) -> IResult<Statement> {
    let (from, _, _) = (identifier, space0, "-->").parse_next(input)?;
    let to = cut_err(preceded(space0, identifier)).parse_next(input)?;
    let label = opt(preceded((space0, ':'), label_text)).parse_next(input)?;
    cut_err(eol).parse_next(input)?;
    Ok(Statement::Transition {
        from: from.to_string(),
        to: to.to_string(),
        label,
    })
}

/// `A: free text`
fn description(input: &mut Input<'_>) -> IResult<Statement> {
    let (name, _, _) = (identifier, space0, ':').parse_next(input)?;
    let text = cut_err(label_text).parse_next(input)?;
    cut_err(eol).parse_next(input)?;
    Ok(Statement::Description {
        name: name.to_string(),
        text,
    })
}

/// An identifier. The delimiter is accepted here so that names containing
/// it reach the store, which rejects them with a labeled E200 instead of a
/// bare syntax error.
fn identifier<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    take_while(1.., |c: char| {
        c.is_alphanumeric() || c == '_' || c == DELIMITER
    })
    .parse_next(input)
}

/// Free text up to the end of the line, trimmed.
fn label_text(input: &mut Input<'_>) -> IResult<String> {
    till_line_ending
        .map(|text: &str| text.trim().to_string())
        .parse_next(input)
}

/// Horizontal whitespace followed by a newline, the end of input, or a
/// closing brace (left for the enclosing block to consume).
fn eol(input: &mut Input<'_>) -> IResult<()> {
    preceded(
        space0,
        alt((line_ending.void(), eof.void(), peek('}').void())),
    )
    .parse_next(input)
}

/// Skips spaces, blank lines, and `%%` line comments.
fn junk(input: &mut Input<'_>) -> IResult<()> {
    repeat(
        0..,
        alt((
            take_while(1.., (' ', '\t')).void(),
            ("%%", till_line_ending).void(),
            line_ending.void(),
        )),
    )
    .parse_next(input)
}

/// Maps a winnow error into a labeled diagnostic.
fn diagnose(source: &str, offset: usize, err: &ErrMode<ContextError>) -> Diagnostic {
    let offset = offset.min(source.len());
    let end = source[offset..]
        .chars()
        .next()
        .map_or(offset, |c| offset + c.len_utf8());
    let span = Span::new(offset..end);

    let labels: Vec<&str> = match err {
        ErrMode::Backtrack(inner) | ErrMode::Cut(inner) => inner
            .context()
            .filter_map(|context| match context {
                StrContext::Label(label) => Some(*label),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    if labels.contains(&HEADER_CONTEXT) {
        return Diagnostic::error("missing `stateDiagram` header")
            .with_code(ErrorCode::E101)
            .with_label(span, "expected the header here")
            .with_help("a state diagram must start with a `stateDiagram` line");
    }
    if labels.contains(&CLOSE_CONTEXT) {
        if offset >= source.len() {
            return Diagnostic::error("composite state block is never closed")
                .with_code(ErrorCode::E102)
                .with_label(span, "expected `}`");
        }
        return Diagnostic::error("unexpected token inside a composite state block")
            .with_code(ErrorCode::E100)
            .with_label(span, "expected a statement or `}`");
    }
    if source[offset..].starts_with('}') {
        return Diagnostic::error("unmatched `}`")
            .with_code(ErrorCode::E102)
            .with_label(span, "no composite state block is open here");
    }
    if offset >= source.len() {
        return Diagnostic::error("unexpected end of input")
            .with_code(ErrorCode::E101)
            .with_label(span, "input ends here");
    }
    Diagnostic::error("unexpected token")
        .with_code(ErrorCode::E100)
        .with_label(
            span,
            "expected a transition, a state description, or a `state` block",
        )
}
