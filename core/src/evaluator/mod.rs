//! Tree-walking evaluator.
//!
//! The same walker serves two entry points. Typed evaluation reads
//! identifiers from the VM environment after the analyzer has accepted the
//! tree; untyped evaluation reads from a plain name to value map and applies
//! JavaScript coercions to whatever it finds.
//!
//! ## Example
//!
//! ```ignore
//! //! use typex_core::{evaluator, values::Value};
//!
//! let mut scope = HashMap::new();
//! scope.insert("x".to_string(), Value::Number(2.0));
//! let result = evaluator::eval_untyped("x * 21", &scope, &Value::Undefined).unwrap();
//! assert_eq!(result, Value::Number(42.0));
//! ```

mod eval;
mod operators;


pub use eval::{Evaluator, Scope};

use tracing::debug;

use crate::errors::Error;
use crate::parser::{Expression, ToExpression};
use crate::values::Value;

/// Evaluates an already-checked expression with default limits.
pub fn evaluate<S: Scope + ?Sized>(
    scope: &S,
    this: &Value,
    expr: &Expression,
) -> Result<Value, Error> {
    Evaluator::new(scope, this).eval(expr)
}

/// Evaluates `code` without type checking.
///
/// Unknown identifiers read as `undefined` instead of failing.
pub fn eval_untyped<E, S>(code: &E, environment: &S, this: &Value) -> Result<Value, Error>
where
    E: ToExpression + ?Sized,
    S: Scope + ?Sized,
{
    let expr = code.to_expression()?;
    debug!(kind = expr.kind_name(), "untyped evaluation");
    evaluate(environment, this, &expr)
}
