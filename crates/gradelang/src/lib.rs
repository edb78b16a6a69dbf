//! # GradeLang
//!
//! A small declarative language for expressing grade computations. A program declares
//! named *categories*, each bound to an expression built from numeric literals,
//! references to other categories, list constructors with optional weights, and calls to
//! operations such as dropping the lowest scores or clamping a range. A host requests the
//! value of a category; [`Gradebook`] evaluates the expression graph, caching each
//! category's result for the lifetime of the query, and returns a typed [`Value`].
//!
//! ```
//! use gradelang::Gradebook;
//!
//! let book = Gradebook::parse(
//!     "hw: {80% 90% 70%}
//!      final: clamp(0% 100% {110%})
//!      avg: {hw:2 final:1}",
//! )
//! .unwrap();
//!
//! match book.get("avg").unwrap() {
//!     gradelang::Value::Grade(g) => assert!((g - 0.8667).abs() < 1e-3),
//!     other => panic!("expected a grade, got {other:?}"),
//! }
//! ```
//!
//! This crate is a thin facade over four layered crates, each usable on its own by a host
//! that wants finer control:
//!
//! - [`gradelang_lexer`] — the tokenizer.
//! - [`gradelang_parser`] — the value model, expression tree and recursive-descent parser.
//! - [`gradelang_eval`] — the [`Context`](gradelang_eval::Context), provider traits, and
//!   expression evaluator.
//! - [`gradelang_ops`] — the reference operation dialect (`drop`, `top`, `clamp`,
//!   `require`, ...).

#![warn(missing_docs)]

mod error;
mod gradebook;
pub mod prelude;

pub use gradelang_parser::{Value, ValueKind};

pub use crate::{
    error::{Error, Result},
    gradebook::{Gradebook, GradebookSettings},
};
