//! Contains the tokenizer used by GradeLang

#![warn(missing_docs)]

mod lexer;

pub use crate::lexer::{GradeLexer as Lexer, LexedToken, Token};
