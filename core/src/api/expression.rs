//! Compiled typex expressions.

use crate::api::Vm;
use crate::errors::Error;
use crate::parser::Expression;
use crate::types::{TypeModel, conforms};
use crate::values::Value;

/// An expression that passed type checking and can be run repeatedly.
///
/// It borrows the [`Vm`] it was checked against, so the environment cannot
/// change underneath it.
///
/// # Example
///
/// ```
/// use typex_core::api::Vm;
/// use typex_core::values::Value;
///
/// let mut vm = Vm::new();
/// vm.set("f", "function(number) string", Value::function("f", |args| {
///     Ok(Value::String(args[0].to_string()))
/// })).unwrap();
///
/// let compiled = vm.compile("string", "f(this)", "number").unwrap();
/// assert_eq!(compiled.run(&Value::from(5)).unwrap(), Value::from("5"));
/// assert_eq!(compiled.run(&Value::from(7)).unwrap(), Value::from("7"));
/// ```
#[derive(Debug)]
pub struct CompiledExpression<'vm> {
    vm: &'vm Vm,
    expr: Expression,
    result: TypeModel,
    inferred: TypeModel,
    this_model: TypeModel,
}

impl<'vm> CompiledExpression<'vm> {
    pub(crate) fn new(
        vm: &'vm Vm,
        expr: Expression,
        result: TypeModel,
        inferred: TypeModel,
        this_model: TypeModel,
    ) -> Self {
        Self {
            vm,
            expr,
            result,
            inferred,
            this_model,
        }
    }

    /// Runs the expression after checking that `this` conforms to the model
    /// it was compiled with.
    pub fn run(&self, this: &Value) -> Result<Value, Error> {
        if !conforms(&self.this_model, this) {
            return Err(Error::type_error("Model validation failed"));
        }
        self.run_unchecked(this)
    }

    /// Runs the expression without validating `this`.
    ///
    /// Evaluation stays memory safe; a non-conforming `this` only produces
    /// results that may not match [`result_type`](Self::result_type).
    pub fn run_unchecked(&self, this: &Value) -> Result<Value, Error> {
        self.vm.evaluate(&self.expr, this)
    }

    /// The declared result type.
    pub fn result_type(&self) -> &TypeModel {
        &self.result
    }

    /// The type inferred for the expression, accepted by the result type.
    pub fn inferred_type(&self) -> &TypeModel {
        &self.inferred
    }

    pub fn this_type(&self) -> &TypeModel {
        &self.this_model
    }

    pub fn expression(&self) -> &Expression {
        &self.expr
    }

    /// Turns the expression into a plain closure over `this`.
    pub fn into_fn(self) -> impl Fn(&Value) -> Result<Value, Error> + 'vm {
        move |this: &Value| self.run(this)
    }
}
