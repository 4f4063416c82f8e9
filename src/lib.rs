//! Typex - statically checked expressions over host values
//!
//! # Overview
//!
//! Typex evaluates a small JavaScript-like expression language against
//! values supplied by a host application. Every expression is type-checked
//! against structural type descriptors before it runs, so a mismatch is
//! reported before any host function is called. Common use cases include:
//!
//! - Filters and routing rules
//! - Computed fields over records
//! - Conditional configuration
//!
//! # Quick Start
//!
//! ```
//! use typex::{Vm, Value, lit};
//!
//! let mut vm = Vm::new();
//! vm.set(
//!     "order",
//!     "object(total: number, coupon: optional(string))",
//!     Value::object([("total", Value::from(120)), ("coupon", Value::Null)]),
//! )
//! .unwrap();
//!
//! let discounted = vm
//!     .eval("number", "(order.coupon ?? '') == '' ? order.total : order.total * 0.9", &lit(()))
//!     .unwrap();
//! assert_eq!(discounted, Value::from(120));
//! ```
//!
//! # Descriptors
//!
//! Types are written either in the verbose syntax (`optional(number)`,
//! `object(name: string)`, `function(number) string`) or, with
//! [`DescriptorSyntax::Compact`], in the compact one (`n?`, `{name:s}`,
//! `f(n->s)`).
//!
//! # Compiled expressions
//!
//! ```
//! use typex::{Vm, Value};
//!
//! let vm = Vm::new();
//! let double = vm.compile("number", "this * 2", "number").unwrap();
//! assert_eq!(double.run(&Value::from(21)).unwrap(), Value::from(42));
//! ```

mod error_renderer;

// Re-export public API from typex_core
pub use typex_core::api::{
    Binding, CompiledExpression, Descriptor, DescriptorSyntax, Diagnostic, Environment,
    ExecutionOptions, LiteralValue, Severity, Vm, VmOptions, lit,
};

// Re-export commonly used types and values
pub use typex_core::types::{self, TypeModel, accepts, merge, parse_compact, parse_descriptor};
pub use typex_core::values::{self, Function, NativeFunction, Value};

// Untyped evaluation and parsing
pub use typex_core::evaluator::eval_untyped;
pub use typex_core::parser::{self, Expression, parse, parse_with_max_depth};

// Re-export errors
pub use typex_core::{Error, ErrorKind};

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};
