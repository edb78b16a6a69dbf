use gradelang_parser::Value;

use crate::{context::Context, error::Result};

/// An object that can resolve a category name to a [`Value`] against a [`Context`]
///
/// A [`Context`] holds an ordered list of data providers and searches them first-hit-wins:
/// the first provider to return `Ok(Some(_))` wins, and the result is cached under `name`.
/// Returning `Ok(None)` means "not mine, try the next provider" — it is not an error.
/// `Err` propagates immediately: a provider that owns `name` but fails while evaluating
/// it (an unknown operation inside the category's expression, a dependency cycle) aborts
/// resolution rather than falling through to the next provider.
pub trait DataProvider {
    /// Attempts to resolve `name`, evaluating against `ctx` if resolution requires it
    fn get_category_value(&self, name: &str, ctx: &Context<'_>) -> Result<Option<Value>>;
}

/// An object that answers whether it can handle a named operation, and executes it
///
/// A [`Context`] holds an ordered list of operation providers and searches them
/// first-hit-wins on [`has_operation`](OperationProvider::has_operation): the first
/// provider that claims the name is the only one consulted, even if it then fails to
/// find a matching overload for the actual argument types.
pub trait OperationProvider {
    /// True if this provider has at least one registered overload for `name`
    fn has_operation(&self, name: &str) -> bool;

    /// Executes the named operation against already-evaluated arguments
    fn execute(&self, name: &str, args: Vec<Value>) -> Result<Value>;
}
