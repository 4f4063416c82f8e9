//! Core of the typex expression evaluator.
//!
//! Expressions are parsed into a fixed tree, type-checked against a
//! structural [`types::TypeModel`] environment, and only then evaluated.

extern crate alloc;

pub mod analyzer;
pub mod api;
pub mod errors;
pub mod evaluator;
pub mod parser;
pub mod types;
pub mod values;

pub use errors::{Error, ErrorKind};
