use rustc_hash::FxHashSet;

use crate::value::Value;

/// One item in a [`Expression::ListLiteral`]: a value expression and an optional weight
/// expression. A missing weight defaults to `1.0` at evaluation time.
#[derive(Clone, Debug, PartialEq)]
pub struct ListItem {
    /// The expression producing the entry's value
    pub value: Expression,
    /// The expression producing the entry's weight, if one was written
    pub weight: Option<Expression>,
}

/// A parsed expression tree, the output of [`crate::Parser`]
///
/// Each variant is a pure description of how to compute a [`Value`]; evaluating an
/// `Expression` against a context is the evaluator's job, not this crate's.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    /// A literal value, already fully decoded by the parser
    Constant(Value),
    /// A late-bound reference to another category, resolved at evaluation time
    CategoryRef(String),
    /// A `{ ... }` list constructor
    ListLiteral(Vec<ListItem>),
    /// A call to a named operation with ordered argument expressions
    OpCall(String, Vec<Expression>),
}

impl Expression {
    /// The set of category names reachable from this expression, computable without
    /// evaluating it. Used by hosts for scheduling or validation.
    pub fn dependencies(&self) -> FxHashSet<String> {
        let mut deps = FxHashSet::default();
        self.collect_dependencies(&mut deps);
        deps
    }

    fn collect_dependencies(&self, deps: &mut FxHashSet<String>) {
        match self {
            Self::Constant(_) => {}
            Self::CategoryRef(name) => {
                deps.insert(name.clone());
            }
            Self::ListLiteral(items) => {
                for item in items {
                    item.value.collect_dependencies(deps);
                    if let Some(weight) = &item.weight {
                        weight.collect_dependencies(deps);
                    }
                }
            }
            Self::OpCall(_, args) => {
                for arg in args {
                    arg.collect_dependencies(deps);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_soundness_through_nested_shapes() {
        let expr = Expression::OpCall(
            "clamp".into(),
            vec![
                Expression::Constant(Value::Grade(0.0)),
                Expression::Constant(Value::Grade(1.0)),
                Expression::ListLiteral(vec![
                    ListItem {
                        value: Expression::CategoryRef("hw".into()),
                        weight: Some(Expression::CategoryRef("hw_weight".into())),
                    },
                    ListItem {
                        value: Expression::CategoryRef("final".into()),
                        weight: None,
                    },
                ]),
            ],
        );

        let deps = expr.dependencies();
        assert_eq!(deps.len(), 3);
        assert!(deps.contains("hw"));
        assert!(deps.contains("hw_weight"));
        assert!(deps.contains("final"));
    }

    #[test]
    fn constant_has_no_dependencies() {
        assert!(Expression::Constant(Value::Integer(3)).dependencies().is_empty());
    }
}
