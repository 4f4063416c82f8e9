use pest::RuleType;

use crate::errors::Error;
use crate::parser::Span;

/// Parser error with context
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub source: String,
    pub span: Span,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Unexpected token
    UnexpectedToken { expected: String, found: String },
    /// Literal that matched the grammar but could not be decoded
    InvalidLiteral { text: String, reason: String },
    /// Object descriptor declaring the same key twice
    DuplicateKey { key: String },
    /// Maximum nesting depth exceeded
    MaxDepthExceeded { max_depth: usize },
    /// Other parse errors (catch-all for Pest errors we don't specifically handle)
    Other { message: String },
}

/// Human-readable names for grammar rules, used in "expected ..." messages.
pub(crate) trait DescribeRule: RuleType {
    fn describe(&self) -> &'static str;
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, source: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            source: source.into(),
            span,
        }
    }

    pub fn message(&self) -> String {
        match &self.kind {
            ParseErrorKind::UnexpectedToken { expected, found } => {
                format!("expected {}, found {}", expected, found)
            }
            ParseErrorKind::InvalidLiteral { text, reason } => {
                format!("invalid literal {}: {}", text, reason)
            }
            ParseErrorKind::DuplicateKey { key } => format!("duplicate key {:?}", key),
            ParseErrorKind::MaxDepthExceeded { max_depth } => format!(
                "expression nesting exceeds maximum depth of {}",
                max_depth
            ),
            ParseErrorKind::Other { message } => message.clone(),
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (line, col) = self.span.line_col(&self.source);
        write!(
            f,
            "failed to parse {}:{}:{}: {}",
            self.source,
            line,
            col,
            self.message()
        )
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        let span = err.span.clone();
        match err.kind {
            ParseErrorKind::MaxDepthExceeded { .. } => {
                Error::resource_exceeded(err.message()).with_span(span)
            }
            _ => Error::syntax(err.to_string()).with_span(span),
        }
    }
}

/// Convert Pest error to human-readable ParseError
pub(crate) fn convert_pest_error<R: DescribeRule>(
    err: pest::error::Error<R>,
    source: &str,
) -> ParseError {
    use pest::error::ErrorVariant;

    let span = match err.location {
        pest::error::InputLocation::Pos(pos) => Span(pos..pos),
        pest::error::InputLocation::Span((start, end)) => Span(start..end),
    };

    let kind = match err.variant {
        ErrorVariant::ParsingError {
            positives,
            negatives: _,
        } => ParseErrorKind::UnexpectedToken {
            expected: format_expected_rules(&positives),
            found: format_found(source, &span),
        },
        ErrorVariant::CustomError { message } => ParseErrorKind::Other { message },
    };

    ParseError::new(kind, source, span)
}

/// Format expected rules in a human-readable way
fn format_expected_rules<R: DescribeRule>(rules: &[R]) -> String {
    let mut concepts: Vec<&str> = Vec::new();
    for rule in rules {
        let concept = rule.describe();
        if !concepts.contains(&concept) {
            concepts.push(concept);
        }
    }

    match concepts.as_slice() {
        [] => "something else".to_string(),
        [single] => single.to_string(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

fn format_found(source: &str, span: &Span) -> String {
    match source[span.0.start.min(source.len())..].chars().next() {
        Some(c) => format!("{:?}", c),
        None => "end of input".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_position() {
        let error = ParseError::new(
            ParseErrorKind::UnexpectedToken {
                expected: "type".to_string(),
                found: "'x'".to_string(),
            },
            "array(x)",
            Span(6..6),
        );
        assert_eq!(
            error.to_string(),
            "failed to parse array(x):1:7: expected type, found 'x'"
        );
    }

    #[test]
    fn test_into_error_is_syntax() {
        let error = ParseError::new(
            ParseErrorKind::Other {
                message: "boom".to_string(),
            },
            "src",
            Span(1..2),
        );
        let err: Error = error.into();
        assert!(err.is_syntax());
        assert_eq!(err.span, Some(Span(1..2)));
    }

    #[test]
    fn test_found_end_of_input() {
        assert_eq!(format_found("ab", &Span(2..2)), "end of input");
        assert_eq!(format_found("ab", &Span(1..1)), "'b'");
    }
}
