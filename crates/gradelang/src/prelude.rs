//! A collection of commonly used types, suitable for glob importing

pub use crate::{Error, Gradebook, GradebookSettings, Result, Value, ValueKind};
pub use gradelang_eval::{Context, DataProvider, EvalError, OperationProvider};
pub use gradelang_parser::{ListValue, Program};
