pub mod ast;
pub mod error;
mod parser;
mod syntax;

pub use ast::{BinaryOp, Expression, Literal, LogicalOp, UnaryOp};
pub use error::{ParseError, ParseErrorKind};
pub use parser::{ExpressionParser, Rule, parse, parse_with_max_depth};
pub use syntax::Span;

use alloc::borrow::Cow;

use crate::analyzer::DEFAULT_MAX_DEPTH;
use crate::errors::Error;

/// Anything that can stand for an expression: source text to be parsed, or
/// an already-built tree.
pub trait ToExpression {
    /// Parses with nesting limited to `max_depth` levels.
    fn to_expression_with_max_depth(&self, max_depth: usize)
    -> Result<Cow<'_, Expression>, Error>;

    fn to_expression(&self) -> Result<Cow<'_, Expression>, Error> {
        self.to_expression_with_max_depth(DEFAULT_MAX_DEPTH)
    }
}

impl ToExpression for str {
    fn to_expression_with_max_depth(
        &self,
        max_depth: usize,
    ) -> Result<Cow<'_, Expression>, Error> {
        parse_with_max_depth(self, max_depth).map(Cow::Owned)
    }
}

impl ToExpression for String {
    fn to_expression_with_max_depth(
        &self,
        max_depth: usize,
    ) -> Result<Cow<'_, Expression>, Error> {
        self.as_str().to_expression_with_max_depth(max_depth)
    }
}

// Built trees are bounded by the analyzer and evaluator instead.
impl ToExpression for Expression {
    fn to_expression_with_max_depth(&self, _: usize) -> Result<Cow<'_, Expression>, Error> {
        Ok(Cow::Borrowed(self))
    }
}

/// Decodes the backslash escapes of a quoted string body.
///
/// Unknown escapes stand for the escaped character itself, so `\q` is `q`.
pub(crate) fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = chars
            .next()
            .ok_or_else(|| "trailing backslash".to_string())?;
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                out.push(decode_code_point(&hex, 2)?);
            }
            'u' => {
                let rest = chars.as_str();
                if let Some(braced) = rest.strip_prefix('{') {
                    let end = braced
                        .find('}')
                        .ok_or_else(|| "unterminated unicode escape".to_string())?;
                    out.push(decode_code_point(&braced[..end], end.max(1))?);
                    chars = braced[end + 1..].chars();
                } else {
                    let hex: String = chars.by_ref().take(4).collect();
                    out.push(decode_code_point(&hex, 4)?);
                }
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

fn decode_code_point(hex: &str, digits: usize) -> Result<char, String> {
    if hex.len() != digits || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("invalid escape sequence \\{}", hex));
    }
    u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| format!("invalid code point {}", hex))
}
