use gradelang_parser::{cast_value, ListValue, Value, ValueKind};

use crate::{
    error::{EvalError, Result},
    traits::OperationProvider,
};

/// A concrete argument or return type an operation handler can be registered with
///
/// Implemented for the primitive forms `f64`, `u64` and [`ListValue`] so that handlers can
/// be written against plain Rust types instead of matching on [`Value`] by hand; the
/// dispatcher performs the wrapping and unwrapping.
pub trait ArgKind: Sized {
    /// The [`ValueKind`] this Rust type corresponds to
    const KIND: ValueKind;

    /// Extracts this type from a [`Value`] already coerced to `KIND` by the dispatcher
    fn from_value(value: Value) -> Self;
}

impl ArgKind for f64 {
    const KIND: ValueKind = ValueKind::Grade;
    fn from_value(value: Value) -> Self {
        match value {
            Value::Grade(g) => g,
            _ => unreachable!("dispatcher coerces arguments to the matched signature"),
        }
    }
}

impl ArgKind for u64 {
    const KIND: ValueKind = ValueKind::Integer;
    fn from_value(value: Value) -> Self {
        match value {
            Value::Integer(n) => n,
            _ => unreachable!("dispatcher coerces arguments to the matched signature"),
        }
    }
}

impl ArgKind for ListValue {
    const KIND: ValueKind = ValueKind::List;
    fn from_value(value: Value) -> Self {
        match value {
            Value::List(list) => list,
            _ => unreachable!("dispatcher coerces arguments to the matched signature"),
        }
    }
}

/// A Rust type an operation handler can return, re-wrapped into a [`Value`]
pub trait ResultKind {
    /// Wraps this type back into a [`Value`]
    fn into_value(self) -> Value;
}

impl ResultKind for f64 {
    fn into_value(self) -> Value {
        Value::Grade(self)
    }
}

impl ResultKind for u64 {
    fn into_value(self) -> Value {
        Value::Integer(self)
    }
}

impl ResultKind for ListValue {
    fn into_value(self) -> Value {
        Value::List(self)
    }
}

type OpHandler = Box<dyn Fn(Vec<Value>) -> Result<Value>>;

/// `(name, expected-argument-types)`, matched against a call's actual name and argument
/// kinds before a handler is coerced and invoked
struct OperationSignature {
    name: String,
    argument_kinds: Vec<ValueKind>,
}

impl OperationSignature {
    fn matches(&self, name: &str, actual: &[ValueKind]) -> bool {
        self.name == name
            && self.argument_kinds.len() == actual.len()
            && self
                .argument_kinds
                .iter()
                .zip(actual)
                .all(|(expected, actual)| gradelang_parser::can_cast(*actual, *expected))
    }
}

/// An [`OperationProvider`] backed by an ordered table of `(signature, handler)` pairs
///
/// Registrations are tried in the order they were added; the first signature whose name,
/// arity and per-argument castability all match wins. Overloading a name by arity or by
/// argument type is just multiple registrations — since earlier registrations win on
/// ambiguity, the more specific forms must be registered first.
#[derive(Default)]
pub struct BasicOperationProvider {
    operations: Vec<(OperationSignature, OpHandler)>,
}

impl BasicOperationProvider {
    /// Creates an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a raw handler and signature. The typed `register_opN` helpers build on
    /// top of this; reach for it directly only when a handler's arity varies at runtime.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        argument_kinds: Vec<ValueKind>,
        handler: impl Fn(Vec<Value>) -> Result<Value> + 'static,
    ) {
        self.operations.push((
            OperationSignature {
                name: name.into(),
                argument_kinds,
            },
            Box::new(handler),
        ));
    }
}

macro_rules! impl_register_arity {
    ($method:ident, $(($arg:ident : $ty:ident)),+) => {
        impl BasicOperationProvider {
            /// Registers a handler whose arity and argument types are fixed by `F`'s
            /// signature; see the module-level docs on [`ArgKind`]/[`ResultKind`] for the
            /// primitive <-> Value mapping.
            pub fn $method<$($ty,)+ R, F>(&mut self, name: &str, f: F)
            where
                $($ty: ArgKind,)+
                R: ResultKind,
                F: Fn($($ty),+) -> R + 'static,
            {
                let kinds = vec![$($ty::KIND),+];
                let handler = move |args: Vec<Value>| -> Result<Value> {
                    let mut values = args.into_iter();
                    $(let $arg = $ty::from_value(values.next().expect(
                        "dispatcher already checked arity against this signature",
                    ));)+
                    Ok(f($($arg),+).into_value())
                };
                self.register(name, kinds, handler);
            }
        }
    };
}

impl_register_arity!(register_op1, (a: A));
impl_register_arity!(register_op2, (a: A), (b: B));
impl_register_arity!(register_op3, (a: A), (b: B), (c: C));
impl_register_arity!(register_op4, (a: A), (b: B), (c: C), (d: D));
impl_register_arity!(register_op5, (a: A), (b: B), (c: C), (d: D), (e: E));

impl OperationProvider for BasicOperationProvider {
    fn has_operation(&self, name: &str) -> bool {
        self.operations.iter().any(|(sig, _)| sig.name == name)
    }

    fn execute(&self, name: &str, args: Vec<Value>) -> Result<Value> {
        let actual_kinds: Vec<ValueKind> = args.iter().map(Value::kind).collect();
        for (sig, handler) in &self.operations {
            if sig.matches(name, &actual_kinds) {
                let coerced: Vec<Value> = args
                    .into_iter()
                    .zip(&sig.argument_kinds)
                    .map(|(v, kind)| {
                        cast_value(v, *kind).expect("matches() already checked castability")
                    })
                    .collect();
                return handler(coerced);
            }
        }
        tracing::debug!(operation = name, "no registered signature matched this call");
        Err(EvalError::OperationNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_picks_first_matching_signature() {
        let mut provider = BasicOperationProvider::new();
        provider.register_op1::<ListValue, u64, _>("len", |l| l.len() as u64);

        let mut list = ListValue::new();
        list.push(1.0, 1.0);
        list.push(2.0, 1.0);

        let result = provider.execute("len", vec![Value::List(list)]).unwrap();
        assert_eq!(result, Value::Integer(2));
    }

    #[test]
    fn arguments_are_coerced_via_the_cast_lattice() {
        let mut provider = BasicOperationProvider::new();
        provider.register_op1::<f64, f64, _>("identity", |g| g);

        // an Integer argument should widen to Grade to satisfy the signature
        let result = provider.execute("identity", vec![Value::Integer(1)]).unwrap();
        assert_eq!(result, Value::Grade(1.0));
    }

    #[test]
    fn no_matching_overload_is_operation_not_found() {
        let mut provider = BasicOperationProvider::new();
        provider.register_op2::<f64, f64, f64, _>("require2", |v, t| if v < t { 0.0 } else { 1.0 });

        let err = provider
            .execute("require2", vec![Value::Grade(0.5)])
            .unwrap_err();
        assert_eq!(err, EvalError::OperationNotFound("require2".to_string()));
    }

    #[test]
    fn earlier_registration_wins_on_ambiguity() {
        let mut provider = BasicOperationProvider::new();
        provider.register_op1::<f64, f64, _>("f", |_| 1.0);
        provider.register_op1::<f64, f64, _>("f", |_| 2.0);

        let result = provider.execute("f", vec![Value::Grade(0.0)]).unwrap();
        assert_eq!(result, Value::Grade(1.0));
    }

    #[test]
    fn unknown_name_with_a_claimed_sibling_is_still_not_found() {
        let mut provider = BasicOperationProvider::new();
        provider.register_op1::<f64, f64, _>("f", |g| g);
        assert!(!provider.has_operation("g"));
    }
}
