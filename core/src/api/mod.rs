//! Public API: the [`Vm`] and what it hands out.
//!
//! # Example
//!
//! ```
//! use typex_core::api::{Vm, lit};
//! use typex_core::values::Value;
//!
//! let mut vm = Vm::new();
//! vm.set_binding("v", lit(42));
//! vm.set("f", "function(number) string", Value::function("f", |args| {
//!     Ok(Value::String(args[0].to_string()))
//! })).unwrap();
//!
//! assert_eq!(vm.eval("string", "f(v)", &lit(())).unwrap(), Value::from("42"));
//!
//! let err = vm.eval("string", "f(true)", &lit(())).unwrap_err();
//! assert!(err.message.contains("require number got boolean"));
//! ```

mod binding;
mod environment;
mod error;
mod expression;
mod options;
mod vm;

#[cfg(test)]
mod vm_test;

pub use binding::{Binding, Descriptor, LiteralValue, lit};
pub use environment::Environment;
pub use error::{Diagnostic, Severity};
pub use expression::CompiledExpression;
pub use options::{DescriptorSyntax, ExecutionOptions, VmOptions};
pub use vm::Vm;
