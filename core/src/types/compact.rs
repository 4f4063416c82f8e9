//! Parser for the compact descriptor syntax.
//!
//! ```text
//! Type := Base { "?" | "[]" }
//! Base := "null" | "n" | "s" | "b"
//!       | "{" [Key ":" Type {"," Key ":" Type}] "}"
//!       | "f(" [Type {"," Type}] "->" Type ")"
//!       | "(" Type ")"
//! ```
//!
//! `n`, `s` and `b` stand for number, string and boolean. Suffixes apply left
//! to right: `n?[]` is an array of optional numbers, `n[]?` an optional array.

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::errors::Error;
use crate::parser::error::{DescribeRule, ParseError, ParseErrorKind, convert_pest_error};
use crate::parser::{Span, unescape};
use crate::types::TypeModel;

#[derive(Parser)]
#[grammar = "types/compact.pest"]
struct CompactParser;

impl DescribeRule for Rule {
    fn describe(&self) -> &'static str {
        match self {
            Rule::EOI => "end of input",
            Rule::optional_mark | Rule::array_mark => "type suffix",
            Rule::quoted_key | Rule::ident_key | Rule::entry => "object key",
            _ => "type",
        }
    }
}

/// Parses a compact descriptor such as `f(n, s? -> b[])`.
pub fn parse_compact(input: &str) -> Result<TypeModel, Error> {
    let mut pairs =
        CompactParser::parse(Rule::compact, input).map_err(|err| convert_pest_error(err, input))?;
    let compact = pairs.next().ok_or_else(|| missing(input, 0))?;
    let ty = compact
        .into_inner()
        .next()
        .ok_or_else(|| missing(input, 0))?;
    build_ty(input, ty).map_err(Error::from)
}

fn build_ty(input: &str, pair: Pair<Rule>) -> Result<TypeModel, ParseError> {
    let span = pair.as_span();
    let mut parts = pair.into_inner();
    let base = parts.next().ok_or_else(|| missing(input, span.start()))?;
    let mut model = build_base(input, base)?;
    for suffix in parts {
        model = match suffix.as_rule() {
            Rule::optional_mark => TypeModel::nullable(model),
            _ => TypeModel::array(model),
        };
    }
    Ok(model)
}

fn build_base(input: &str, pair: Pair<Rule>) -> Result<TypeModel, ParseError> {
    let span = pair.as_span();
    match pair.as_rule() {
        Rule::null_kw => Ok(TypeModel::null()),
        Rule::number_kw => Ok(TypeModel::number()),
        Rule::string_kw => Ok(TypeModel::string()),
        Rule::boolean_kw => Ok(TypeModel::boolean()),
        Rule::ty => build_ty(input, pair),
        Rule::function => {
            let mut parts = pair.into_inner();
            let arguments = parts
                .next()
                .ok_or_else(|| missing(input, span.start()))?
                .into_inner()
                .map(|argument| build_ty(input, argument))
                .collect::<Result<Vec<_>, _>>()?;
            let result = build_ty(
                input,
                parts.next().ok_or_else(|| missing(input, span.end()))?,
            )?;
            Ok(TypeModel::function(arguments, result))
        }
        Rule::object => {
            let mut entries: Vec<(String, TypeModel)> = Vec::new();
            for entry in pair.into_inner() {
                let entry_span = entry.as_span();
                let mut parts = entry.into_inner();
                let key = parts
                    .next()
                    .ok_or_else(|| missing(input, entry_span.start()))?;
                let key = match key.as_rule() {
                    Rule::quoted_key => {
                        let raw = key.into_inner().next().map_or("", |chars| chars.as_str());
                        unescape(raw).map_err(|reason| {
                            ParseError::new(
                                ParseErrorKind::InvalidLiteral {
                                    text: raw.to_string(),
                                    reason,
                                },
                                input,
                                entry_span.into(),
                            )
                        })?
                    }
                    _ => key.as_str().to_string(),
                };
                let model = build_ty(
                    input,
                    parts
                        .next()
                        .ok_or_else(|| missing(input, entry_span.end()))?,
                )?;
                if entries.iter().any(|(existing, _)| *existing == key) {
                    return Err(ParseError::new(
                        ParseErrorKind::DuplicateKey { key },
                        input,
                        entry_span.into(),
                    ));
                }
                entries.push((key, model));
            }
            Ok(TypeModel::Object(entries))
        }
        rule => Err(ParseError::new(
            ParseErrorKind::Other {
                message: format!("unhandled rule: {:?}", rule),
            },
            input,
            span.into(),
        )),
    }
}

fn missing(input: &str, pos: usize) -> ParseError {
    ParseError::new(
        ParseErrorKind::Other {
            message: "missing expected pair in rule".to_string(),
        },
        input,
        Span::new(pos, pos),
    )
}
