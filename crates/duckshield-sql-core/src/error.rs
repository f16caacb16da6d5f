//! The core's single error type. Every fallible entry point returns
//! `Result<T, CoreError>`; nothing in this crate panics on well-formed input.

use thiserror::Error;

use crate::lexer::TokenKind;
use crate::parser::ParseError;

/// Everything that can go wrong lexing, parsing, formatting, or rewriting a
/// statement.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("input is empty")]
    EmptyInput,

    #[error("lexical error: {0}")]
    LexicalError(String),

    #[error(transparent)]
    Parse(ParseError),

    #[error("more than one statement: {0}")]
    MultiStatement(String),

    #[error("trailing input after expression: {0}")]
    TrailingInput(String),

    #[error("unsupported literal for RLS rule value: {0}")]
    UnsupportedLiteral(String),

    #[error("unsupported operator code for RLS rule: {0}")]
    UnsupportedOperator(String),

    #[error("failed to parse mask expression for column {column}: {source}")]
    MaskExpressionParse { column: String, source: ParseError },

    #[error("cannot apply column masks to SELECT * without column metadata for table {table}")]
    StarExpansionRequiresColumns { table: String },

    #[error("prohibited function: {0}")]
    ProhibitedFunction(String),
}

/// A parse error whose offending token is `Illegal` (an unrecognised byte
/// or unterminated literal the lexer couldn't make sense of) is really a
/// lexical error that only got caught when the parser inspected the
/// token; report it as [`CoreError::LexicalError`] rather than the generic
/// [`CoreError::Parse`].
impl From<ParseError> for CoreError {
    fn from(err: ParseError) -> Self {
        match &err.found {
            Some(TokenKind::Illegal(message)) => Self::LexicalError(message.clone()),
            _ => Self::Parse(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(CoreError::EmptyInput.to_string(), "input is empty");
        assert_eq!(
            CoreError::ProhibitedFunction("read_csv".to_string()).to_string(),
            "prohibited function: read_csv"
        );
    }

    #[test]
    fn illegal_token_parse_error_becomes_lexical_error() {
        let parse_err = ParseError::unexpected(
            "an expression",
            TokenKind::Illegal("unexpected character: !".to_string()),
            crate::lexer::Span::new(0, 1),
        );
        let err: CoreError = parse_err.into();
        assert_eq!(
            err,
            CoreError::LexicalError("unexpected character: !".to_string())
        );
    }

    #[test]
    fn ordinary_parse_error_stays_parse_error() {
        let parse_err = ParseError::unexpected_eof("an expression", crate::lexer::Span::new(0, 0));
        let err: CoreError = parse_err.clone().into();
        assert_eq!(err, CoreError::Parse(parse_err));
    }
}
