//! The error type shared by every stage: descriptor parsing, expression
//! parsing, inference, binding validation and evaluation.

use core::fmt;

use crate::parser::Span;

/// Category of a failure.
///
/// The first three mirror the checks performed before evaluation; the last
/// two can only happen while an expression runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed descriptor or expression text, unsupported tree shapes.
    Syntax,
    /// Incompatible types, failed binding validation, bad result values.
    Type,
    /// Unknown identifiers and object keys.
    Reference,
    /// Failures raised by host callables.
    Runtime,
    /// Evaluation exceeded a configured limit.
    ResourceExceeded,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Syntax => write!(f, "SyntaxError"),
            ErrorKind::Type => write!(f, "TypeError"),
            ErrorKind::Reference => write!(f, "ReferenceError"),
            ErrorKind::Runtime => write!(f, "RuntimeError"),
            ErrorKind::ResourceExceeded => write!(f, "ResourceExceeded"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    /// Byte range in the source text the error refers to, when known.
    pub span: Option<Span>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: None,
        }
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Type, message)
    }

    pub fn reference(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Reference, message)
    }

    /// Error raised from inside a host callable.
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Runtime, message)
    }

    pub fn resource_exceeded(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResourceExceeded, message)
    }

    /// Shorthand for the `require <expected> got <actual>` mismatch.
    pub fn mismatch(expected: impl fmt::Display, actual: impl fmt::Display) -> Self {
        Self::type_error(format!("require {} got {}", expected, actual))
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn is_syntax(&self) -> bool {
        self.kind == ErrorKind::Syntax
    }

    pub fn is_type(&self) -> bool {
        self.kind == ErrorKind::Type
    }

    pub fn is_reference(&self) -> bool {
        self.kind == ErrorKind::Reference
    }
}
