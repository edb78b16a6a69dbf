use thiserror::Error;

/// An error raised while evaluating an [`Expression`](gradelang_parser::Expression)
///
/// Per the dispatch design, a type mismatch or an arity mismatch against a *known*
/// operation name both collapse into [`EvalError::OperationNotFound`] — the dispatcher
/// never distinguishes "wrong arity" from "wrong type" from "no such name", since none
/// of the registered signatures matched.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum EvalError {
    #[error("operation not found: {0}")]
    OperationNotFound(String),
    #[error("circular dependency detected while resolving '{0}'")]
    CycleDetected(String),
}

/// The result type used throughout the evaluator
pub type Result<T> = std::result::Result<T, EvalError>;
