use thiserror::Error;

/// The error types that can result from [`Gradebook`](crate::Gradebook) operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The source text could not be parsed into a program
    #[error(transparent)]
    Parse(#[from] gradelang_parser::ParseError),
    /// Evaluating a category's expression failed
    #[error(transparent)]
    Eval(#[from] gradelang_eval::EvalError),
}

/// The `Result` type returned by [`Gradebook`](crate::Gradebook) operations
pub type Result<T> = std::result::Result<T, Error>;
