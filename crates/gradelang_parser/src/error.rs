use thiserror::Error;

/// The syntactic violation a [`ParseError`] reports
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum SyntaxError {
    #[error("expected a category name or end of input")]
    ExpectedCategoryOrEof,
    #[error("expected ':' after category name")]
    ExpectedColonAfterCategoryName,
    #[error("expected an expression")]
    ExpectedExpression,
    #[error("expected closing ')'")]
    ExpectedCloseParen,
    #[error("expected closing '}}'")]
    ExpectedCloseBrace,
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected ':' here")]
    UnexpectedColon,
    #[error("unrecognized character")]
    UnknownToken,
    #[error("integer literal too large to fit in 64 bits")]
    IntegerOverflow,
}

/// A parse-time error, carrying the byte offset of the offending token
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("{kind} (at byte {offset})")]
pub struct ParseError {
    /// What went wrong
    pub kind: SyntaxError,
    /// The byte offset of the token that triggered the error
    pub offset: usize,
}

impl ParseError {
    /// Builds a new error for the token starting at `offset`
    pub fn new(kind: SyntaxError, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// The result type used throughout the parser
pub type Result<T> = std::result::Result<T, ParseError>;
