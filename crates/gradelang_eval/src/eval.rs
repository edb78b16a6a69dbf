use gradelang_parser::{cast_value, Expression, ListValue, Value, ValueKind};

use crate::{context::Context, error::Result};

/// Evaluates `expr` against `ctx`, following the semantics of each expression variant.
///
/// Evaluation is synchronous, recursive and single-threaded; sub-expressions of a list
/// literal or an operation call are evaluated strictly left to right.
pub fn eval_expr(expr: &Expression, ctx: &Context<'_>) -> Result<Value> {
    match expr {
        Expression::Constant(value) => Ok(value.clone()),
        Expression::CategoryRef(name) => ctx.get_category_value(name),
        Expression::ListLiteral(items) => {
            let mut list = ListValue::new();
            for item in items {
                let value = to_grade(eval_expr(&item.value, ctx)?);
                let weight = match &item.weight {
                    Some(weight_expr) => to_grade(eval_expr(weight_expr, ctx)?),
                    None => 1.0,
                };
                list.push(value, weight);
            }
            Ok(Value::List(list))
        }
        Expression::OpCall(name, args) => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval_expr(arg, ctx)?);
            }
            ctx.execute_operation(name, values)
        }
    }
}

// Coerces any Value to a bare Grade for list-item/weight construction, per the cast
// lattice (Integer widens, List reduces). A coerced NaN stays NaN, which is correct: it
// means the element (or weight) is itself undefined.
fn to_grade(value: Value) -> f64 {
    match cast_value(value, ValueKind::Grade) {
        Some(Value::Grade(g)) => g,
        _ => unreachable!("Grade is reachable in the cast lattice from every Value kind"),
    }
}
