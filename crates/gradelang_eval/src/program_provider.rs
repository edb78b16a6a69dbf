use gradelang_parser::{Program, Value};

use crate::{context::Context, error::Result, eval::eval_expr, traits::DataProvider};

impl DataProvider for Program {
    /// Looks up `name` by its declared expression and evaluates it in `ctx`. Returns
    /// `Ok(None)` (to signal "not mine, try the next provider") when the name wasn't
    /// declared in this program.
    fn get_category_value(&self, name: &str, ctx: &Context<'_>) -> Result<Option<Value>> {
        match self.get(name) {
            Some(expr) => eval_expr(expr, ctx).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use gradelang_parser::Parser;

    use super::*;

    #[test]
    fn program_resolves_its_own_categories() {
        let program = Parser::parse("hw: 80%").unwrap();
        let ctx = Context::new(vec![&program], vec![]);
        assert_eq!(ctx.get_category_value("hw").unwrap(), Value::Grade(0.8));
    }

    #[test]
    fn program_declines_names_it_does_not_own() {
        let program = Parser::parse("hw: 80%").unwrap();
        let ctx = Context::new(vec![&program], vec![]);
        assert!(ctx.get_category_value("other").unwrap().is_undefined());
    }

    #[test]
    fn list_copy_isolation() {
        // after x: {1 2 3} and y: drop(1 x), evaluating x afterward still yields 3 elements
        use crate::traits::OperationProvider;
        use gradelang_parser::{cast_value, ValueKind};

        struct DropOne;
        impl OperationProvider for DropOne {
            fn has_operation(&self, name: &str) -> bool {
                name == "drop_first"
            }
            fn execute(&self, _name: &str, mut args: Vec<Value>) -> Result<Value> {
                let coerced = cast_value(args.remove(0), ValueKind::List).unwrap();
                let Value::List(mut list) = coerced else {
                    unreachable!()
                };
                if !list.is_empty() {
                    list.remove(0);
                }
                Ok(Value::List(list))
            }
        }
        let program = Parser::parse("x: {1 2 3}  y: drop_first(x)").unwrap();
        let ops = DropOne;
        let ctx = Context::new(vec![&program], vec![&ops]);

        let y = ctx.get_category_value("y").unwrap();
        match y {
            Value::List(list) => assert_eq!(list.len(), 2),
            other => panic!("expected a list, got {other:?}"),
        }

        let x = ctx.get_category_value("x").unwrap();
        match x {
            Value::List(list) => assert_eq!(list.len(), 3, "mutating y must not alias x's cached list"),
            other => panic!("expected a list, got {other:?}"),
        }
    }
}
