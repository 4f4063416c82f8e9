//! Host callables bound into the environment.

use alloc::boxed::Box;
use core::fmt;

use crate::errors::Error;
use crate::values::Value;

/// A value that can be called from an expression.
///
/// Arguments arrive already evaluated, left to right. Errors returned by
/// `call` propagate unchanged out of the evaluator.
pub trait Function {
    fn name(&self) -> &str {
        "anonymous"
    }

    fn call(&self, args: &[Value]) -> Result<Value, Error>;
}

type NativeFn = dyn Fn(&[Value]) -> Result<Value, Error>;

/// A named Rust closure.
pub struct NativeFunction {
    name: String,
    func: Box<NativeFn>,
}

impl NativeFunction {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, Error> + 'static,
    {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }
}

impl Function for NativeFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, args: &[Value]) -> Result<Value, Error> {
        (self.func)(args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
