//! The value model, expression tree and recursive-descent parser for GradeLang

#![warn(missing_docs)]

mod error;
mod expr;
mod parser;
mod program;
mod value;

pub use crate::{
    error::{ParseError, Result, SyntaxError},
    expr::{Expression, ListItem},
    parser::Parser,
    program::Program,
    value::{cast_value, can_cast, ListEntry, ListValue, Value, ValueKind, FAIL, PASS},
};
