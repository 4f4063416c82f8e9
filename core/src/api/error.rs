//! Diagnostics derived from [`Error`] for reporting tools.

use core::fmt;

use crate::errors::{Error, ErrorKind};
use crate::parser::Span;

/// A diagnostic message with an optional source location.
///
/// Maps cleanly to LSP diagnostics for IDE integration.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Source location of the issue. Type and runtime errors carry none and
    /// refer to the whole expression.
    pub span: Option<Span>,

    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,

    /// Error code (e.g., "E001") for documentation lookup.
    pub code: Option<String>,
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "P001",
            ErrorKind::Type => "E001",
            ErrorKind::Reference => "E002",
            ErrorKind::Runtime => "R001",
            ErrorKind::ResourceExceeded => "R002",
        }
    }
}

impl Error {
    pub fn to_diagnostic(&self) -> Diagnostic {
        let help = match self.kind {
            ErrorKind::Reference => Some("bind the name with `Vm::set` before compiling".to_string()),
            ErrorKind::ResourceExceeded => {
                Some("raise `ExecutionOptions::max_depth` or simplify the expression".to_string())
            }
            _ => None,
        };
        Diagnostic {
            severity: Severity::Error,
            message: self.to_string(),
            span: self.span.clone(),
            help,
            code: Some(self.kind.code().to_string()),
        }
    }
}

impl From<&Error> for Diagnostic {
    fn from(err: &Error) -> Self {
        err.to_diagnostic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_type_error_diagnostic() {
        let diagnostic = Error::mismatch("string", "number").to_diagnostic();
        assert_eq!(diagnostic.message, "TypeError: require string got number");
        assert_eq!(diagnostic.code.as_deref(), Some("E001"));
        assert_eq!(diagnostic.span, None);
        assert_eq!(diagnostic.help, None);
    }

    #[test]
    fn test_syntax_error_keeps_span() {
        let err = crate::parser::parse("1 +").unwrap_err();
        let diagnostic = Diagnostic::from(&err);
        assert_eq!(diagnostic.code.as_deref(), Some("P001"));
        assert_eq!(diagnostic.span, Some(Span::new(3, 3)));
    }

    #[test]
    fn test_reference_error_has_help() {
        let diagnostic = Error::reference("\"x\" not found").to_diagnostic();
        assert_eq!(diagnostic.code.as_deref(), Some("E002"));
        assert!(diagnostic.help.is_some());
    }
}
