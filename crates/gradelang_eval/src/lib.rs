//! The evaluation engine for GradeLang: a [`Context`] holding the memoization cache and
//! pluggable providers, and the `Expression` tree-walker that resolves categories and
//! dispatches operations through it.

#![warn(missing_docs)]

mod context;
mod dispatch;
mod error;
mod eval;
mod program_provider;
mod traits;

pub use crate::{
    context::Context,
    dispatch::{ArgKind, BasicOperationProvider, ResultKind},
    error::{EvalError, Result},
    eval::eval_expr,
    traits::{DataProvider, OperationProvider},
};
