//! The typex virtual machine: an environment plus check-then-run entry points.

use alloc::borrow::Cow;

use tracing::debug;

use crate::analyzer::Analyzer;
use crate::api::{Binding, CompiledExpression, Descriptor, Environment, VmOptions};
use crate::errors::Error;
use crate::evaluator::Evaluator;
use crate::parser::{Expression, ToExpression};
use crate::types::{TypeModel, conforms, require};
use crate::values::Value;

/// Holds the bindings expressions can see and runs expressions against them.
///
/// Every entry point type-checks the whole expression before evaluating any
/// of it, so a rejected expression never reaches a host callable.
///
/// # Example
///
/// ```
/// use typex_core::api::{Vm, lit};
/// use typex_core::values::Value;
///
/// let mut vm = Vm::new();
/// vm.set("obj", r#"object(str: string, num: number)"#,
///     Value::object([("str", Value::from("test")), ("num", Value::from(42))])).unwrap();
///
/// let result = vm.eval("number", "obj.num + 1", &lit(())).unwrap();
/// assert_eq!(result, Value::Number(43.0));
/// ```
#[derive(Debug, Default)]
pub struct Vm {
    environment: Environment,
    options: VmOptions,
}

impl Vm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: VmOptions) -> Self {
        Self {
            environment: Environment::new(),
            options,
        }
    }

    pub fn options(&self) -> &VmOptions {
        &self.options
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Resolves a descriptor with the configured syntax.
    pub fn resolve<D: Descriptor + ?Sized>(&self, descriptor: &D) -> Result<TypeModel, Error> {
        Ok(descriptor
            .resolve(self.options.descriptor_syntax)?
            .into_owned())
    }

    /// Binds `name` to `value` after checking it against `model`.
    ///
    /// Fails with `Model validation failed` when the value does not conform;
    /// the previous binding, if any, is kept in that case.
    pub fn set<D: Descriptor + ?Sized>(
        &mut self,
        name: &str,
        model: &D,
        value: impl Into<Value>,
    ) -> Result<(), Error> {
        let binding = Binding::new(self.resolve(model)?, value)?;
        self.set_binding(name, binding);
        Ok(())
    }

    pub fn set_binding(&mut self, name: &str, binding: Binding) {
        self.environment.insert(name, binding);
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.environment.get(name)
    }

    pub fn delete(&mut self, name: &str) -> Option<Binding> {
        self.environment.remove(name)
    }

    /// Type-checks `code` with `this` typed as `this_model` and requires the
    /// result to be accepted by `result`. Returns the inferred type.
    pub fn check<R, E, T>(&self, result: &R, code: &E, this_model: &T) -> Result<TypeModel, Error>
    where
        R: Descriptor + ?Sized,
        E: ToExpression + ?Sized,
        T: Descriptor + ?Sized,
    {
        let result = self.resolve(result)?;
        let this_model = self.resolve(this_model)?;
        let expr = self.parse(code)?;
        self.check_expression(&result, &expr, &this_model)
    }

    /// Checks `code` once and returns an expression that can run against many
    /// `this` values without being checked again.
    pub fn compile<R, E, T>(
        &self,
        result: &R,
        code: &E,
        this_model: &T,
    ) -> Result<CompiledExpression<'_>, Error>
    where
        R: Descriptor + ?Sized,
        E: ToExpression + ?Sized,
        T: Descriptor + ?Sized,
    {
        let result = self.resolve(result)?;
        let this_model = self.resolve(this_model)?;
        let expr = self.parse(code)?.into_owned();
        let inferred = self.check_expression(&result, &expr, &this_model)?;
        Ok(CompiledExpression::new(
            self, expr, result, inferred, this_model,
        ))
    }

    /// Checks and evaluates `code` with `this` bound to a concrete binding.
    ///
    /// The value produced is checked against `result` once more, since host
    /// callables are trusted to honor their declared result types but not
    /// forced to.
    pub fn eval<R, E>(&self, result: &R, code: &E, this: &Binding) -> Result<Value, Error>
    where
        R: Descriptor + ?Sized,
        E: ToExpression + ?Sized,
    {
        let result = self.resolve(result)?;
        let expr = self.parse(code)?;
        self.check_expression(&result, &expr, this.model())?;
        let value = self.evaluate(&expr, this.value())?;
        if !conforms(&result, &value) {
            debug!(result = %result, value = ?value, "result does not conform");
            return Err(Error::type_error("invalid result type"));
        }
        Ok(value)
    }

    fn parse<'c, E>(&self, code: &'c E) -> Result<Cow<'c, Expression>, Error>
    where
        E: ToExpression + ?Sized,
    {
        code.to_expression_with_max_depth(self.options.execution.max_depth)
    }

    pub(crate) fn check_expression(
        &self,
        result: &TypeModel,
        expr: &Expression,
        this_model: &TypeModel,
    ) -> Result<TypeModel, Error> {
        debug!(kind = expr.kind_name(), result = %result, this = %this_model, "checking");
        let inferred = Analyzer::new(&self.environment, this_model)
            .with_max_depth(self.options.execution.max_depth)
            .analyze(expr)?;
        require(result, &inferred)?;
        debug!(inferred = %inferred, "checked");
        Ok(inferred)
    }

    pub(crate) fn evaluate(&self, expr: &Expression, this: &Value) -> Result<Value, Error> {
        Evaluator::new(&self.environment, this)
            .with_max_depth(self.options.execution.max_depth)
            .eval(expr)
    }
}
