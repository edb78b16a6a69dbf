use std::cell::RefCell;

use gradelang_parser::{Value, FAIL, PASS};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    error::{EvalError, Result},
    traits::{DataProvider, OperationProvider},
};

/// Per-evaluation state shared by every expression evaluated during one pass
///
/// A `Context` is the single logical thread of control described by the scheduling model:
/// it is not reentrant, and a single instance must not be shared across concurrent
/// `get_category_value` calls. That single-threaded assumption is exactly what lets the
/// cache use a [`RefCell`] instead of a lock.
pub struct Context<'a> {
    cache: RefCell<FxHashMap<String, Value>>,
    in_progress: RefCell<FxHashSet<String>>,
    data_providers: Vec<&'a dyn DataProvider>,
    operation_providers: Vec<&'a dyn OperationProvider>,
}

impl<'a> Context<'a> {
    /// Builds a context with the given ordered providers, seeding the cache with the
    /// `pass`, `fail` and `undef` singletons that no data provider may override.
    pub fn new(
        data_providers: Vec<&'a dyn DataProvider>,
        operation_providers: Vec<&'a dyn OperationProvider>,
    ) -> Self {
        let mut cache = FxHashMap::default();
        cache.insert("pass".to_string(), Value::Grade(PASS));
        cache.insert("fail".to_string(), Value::Grade(FAIL));
        cache.insert("undef".to_string(), Value::undefined());
        Self {
            cache: RefCell::new(cache),
            in_progress: RefCell::new(FxHashSet::default()),
            data_providers,
            operation_providers,
        }
    }

    /// Resolves a category name to a value.
    ///
    /// 1. A cache hit returns immediately (this is also how `pass`/`fail`/`undef` are
    ///    protected from being overridden: they're seeded before any provider runs).
    /// 2. Otherwise every data provider is tried in order; the first to return `Some`
    ///    wins, and the value is memoized under `name`.
    /// 3. If no provider resolves the name, the *undefined* grade is returned uncached.
    ///
    /// A name that is already being resolved higher up the call stack is reported as
    /// [`EvalError::CycleDetected`] rather than recursing until the host's stack is
    /// exhausted.
    pub fn get_category_value(&self, name: &str) -> Result<Value> {
        if let Some(value) = self.cache.borrow().get(name) {
            tracing::trace!(category = name, "cache hit");
            return Ok(value.clone());
        }

        if !self.in_progress.borrow_mut().insert(name.to_string()) {
            tracing::debug!(category = name, "cycle detected while resolving category");
            return Err(EvalError::CycleDetected(name.to_string()));
        }
        let resolved = self.resolve_via_providers(name);
        self.in_progress.borrow_mut().remove(name);
        let value = resolved?;

        if let Some(value) = value {
            tracing::trace!(category = name, "resolved and cached");
            self.cache.borrow_mut().insert(name.to_string(), value.clone());
            Ok(value)
        } else {
            tracing::trace!(category = name, "no provider claimed category; defaulting to undefined");
            Ok(Value::undefined())
        }
    }

    fn resolve_via_providers(&self, name: &str) -> Result<Option<Value>> {
        for provider in &self.data_providers {
            if let Some(value) = provider.get_category_value(name, self)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Dispatches an operation call: the first provider for which `has_operation(name)`
    /// is true is the only one consulted, even if its `execute` then fails to match an
    /// overload for the actual argument types.
    pub fn execute_operation(&self, name: &str, args: Vec<Value>) -> Result<Value> {
        for provider in &self.operation_providers {
            if provider.has_operation(name) {
                return provider.execute(name, args);
            }
        }
        Err(EvalError::OperationNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Empty;
    impl DataProvider for Empty {
        fn get_category_value(&self, _name: &str, _ctx: &Context<'_>) -> Result<Option<Value>> {
            Ok(None)
        }
    }
    impl OperationProvider for Empty {
        fn has_operation(&self, _name: &str) -> bool {
            false
        }
        fn execute(&self, name: &str, _args: Vec<Value>) -> Result<Value> {
            Err(EvalError::OperationNotFound(name.to_string()))
        }
    }

    #[test]
    fn seeded_singletons_are_returned_from_the_cache() {
        let empty = Empty;
        let ctx = Context::new(vec![&empty], vec![&empty]);
        assert_eq!(ctx.get_category_value("pass").unwrap(), Value::Grade(1.0));
        assert_eq!(ctx.get_category_value("fail").unwrap(), Value::Grade(0.0));
        assert!(ctx.get_category_value("undef").unwrap().is_undefined());
    }

    #[test]
    fn unresolved_category_is_the_undefined_grade_and_is_not_cached() {
        let empty = Empty;
        let ctx = Context::new(vec![&empty], vec![&empty]);
        assert!(ctx.get_category_value("mystery").unwrap().is_undefined());
        assert!(ctx.cache.borrow().get("mystery").is_none());
    }

    struct Constant(&'static str, f64);
    impl DataProvider for Constant {
        fn get_category_value(&self, name: &str, _ctx: &Context<'_>) -> Result<Option<Value>> {
            Ok((name == self.0).then_some(Value::Grade(self.1)))
        }
    }

    #[test]
    fn providers_cannot_override_seeded_singletons() {
        let overriding = Constant("pass", 0.0);
        let ctx = Context::new(vec![&overriding], vec![]);
        assert_eq!(ctx.get_category_value("pass").unwrap(), Value::Grade(1.0));
    }

    #[test]
    fn memoization_returns_the_same_value_on_repeated_lookups() {
        let provider = Constant("avg", 0.75);
        let ctx = Context::new(vec![&provider], vec![]);
        let first = ctx.get_category_value("avg").unwrap();
        let second = ctx.get_category_value("avg").unwrap();
        assert_eq!(first, second);
    }

    struct SelfReferential;
    impl DataProvider for SelfReferential {
        fn get_category_value(&self, name: &str, ctx: &Context<'_>) -> Result<Option<Value>> {
            match name {
                "a" => ctx.get_category_value("b").map(Some),
                "b" => ctx.get_category_value("a").map(Some),
                _ => Ok(None),
            }
        }
    }

    #[test]
    fn mutual_cycle_is_reported_as_a_resolution_error() {
        let provider = SelfReferential;
        let ctx = Context::new(vec![&provider], vec![]);
        assert_eq!(
            ctx.get_category_value("a"),
            Err(EvalError::CycleDetected("a".to_string()))
        );
    }
}
