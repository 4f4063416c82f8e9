//! Parser for the verbose descriptor syntax.
//!
//! ```text
//! Type     := Simple | Nullable | Array | Object | Function
//! Simple   := "null" | "number" | "string" | "boolean"
//! Nullable := "optional" "(" Type ")"
//! Array    := "array" "(" Type ")"
//! Object   := "object" "(" [Entry {"," Entry}] ")"
//! Entry    := Key ":" Type
//! Function := "function" "(" [Type {"," Type}] ")" Type
//! ```
//!
//! Alternatives are tried in that order and the whole input must be
//! consumed. Object keys are either identifiers or double-quoted strings and
//! keep their declaration order.

use core::str::FromStr;

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::errors::Error;
use crate::parser::error::{DescribeRule, ParseError, ParseErrorKind, convert_pest_error};
use crate::parser::{Span, unescape};
use crate::types::{Simple, TypeModel};

#[derive(Parser)]
#[grammar = "types/descriptor.pest"]
struct DescriptorParser;

impl DescribeRule for Rule {
    fn describe(&self) -> &'static str {
        match self {
            Rule::EOI => "end of input",
            Rule::quoted_key | Rule::ident_key | Rule::entry => "object key",
            _ => "type",
        }
    }
}

/// Parses a verbose descriptor such as `function(number) optional(string)`.
pub fn parse_descriptor(input: &str) -> Result<TypeModel, Error> {
    let mut pairs = DescriptorParser::parse(Rule::descriptor, input)
        .map_err(|err| convert_pest_error(err, input))?;
    let descriptor = pairs.next().ok_or_else(|| missing(input, 0))?;
    let ty = descriptor
        .into_inner()
        .next()
        .ok_or_else(|| missing(input, 0))?;
    build(input, ty).map_err(Error::from)
}

impl FromStr for TypeModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_descriptor(s)
    }
}

fn build(input: &str, pair: Pair<Rule>) -> Result<TypeModel, ParseError> {
    let span = pair.as_span();
    match pair.as_rule() {
        Rule::simple => {
            let keyword = pair
                .into_inner()
                .next()
                .ok_or_else(|| missing(input, span.start()))?;
            Ok(TypeModel::Simple(match keyword.as_rule() {
                Rule::null_kw => Simple::Null,
                Rule::number_kw => Simple::Number,
                Rule::string_kw => Simple::String,
                _ => Simple::Boolean,
            }))
        }
        Rule::nullable => Ok(TypeModel::nullable(single_inner(input, pair)?)),
        Rule::array => Ok(TypeModel::array(single_inner(input, pair)?)),
        Rule::object => {
            let mut entries: Vec<(String, TypeModel)> = Vec::new();
            for entry in pair.into_inner() {
                let entry_span = entry.as_span();
                let mut parts = entry.into_inner();
                let key_pair = parts
                    .next()
                    .ok_or_else(|| missing(input, entry_span.start()))?;
                let key = build_key(input, key_pair)?;
                let model = build(
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
        Rule::function => {
            let mut parts = pair.into_inner();
            let arguments = parts
                .next()
                .ok_or_else(|| missing(input, span.start()))?
                .into_inner()
                .map(|argument| build(input, argument))
                .collect::<Result<Vec<_>, _>>()?;
            let result = build(
                input,
                parts.next().ok_or_else(|| missing(input, span.end()))?,
            )?;
            Ok(TypeModel::function(arguments, result))
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

fn single_inner(input: &str, pair: Pair<Rule>) -> Result<TypeModel, ParseError> {
    let span = pair.as_span();
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| missing(input, span.start()))?;
    build(input, inner)
}

fn build_key(input: &str, pair: Pair<Rule>) -> Result<String, ParseError> {
    match pair.as_rule() {
        Rule::quoted_key => {
            let span = pair.as_span();
            let raw = pair.into_inner().next().map_or("", |chars| chars.as_str());
            unescape(raw).map_err(|reason| {
                ParseError::new(
                    ParseErrorKind::InvalidLiteral {
                        text: span.as_str().to_string(),
                        reason,
                    },
                    input,
                    span.into(),
                )
            })
        }
        _ => Ok(pair.as_str().to_string()),
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

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple_types() {
        assert_eq!(parse_descriptor("null").unwrap(), TypeModel::null());
        assert_eq!(parse_descriptor("number").unwrap(), TypeModel::number());
        assert_eq!(parse_descriptor(" string ").unwrap(), TypeModel::string());
        assert_eq!(parse_descriptor("boolean").unwrap(), TypeModel::boolean());
    }

    #[test]
    fn test_wrappers() {
        assert_eq!(
            parse_descriptor("optional(array( number ))").unwrap(),
            TypeModel::nullable(TypeModel::array(TypeModel::number()))
        );
        assert_eq!(
            parse_descriptor("optional(optional(number))").unwrap(),
            TypeModel::Nullable(Box::new(TypeModel::Nullable(Box::new(TypeModel::number()))))
        );
    }

    #[test]
    fn test_object_keeps_declaration_order() {
        let model = parse_descriptor(r#"object("str": string, num: number)"#).unwrap();
        assert_eq!(
            model,
            TypeModel::Object(vec![
                ("str".to_string(), TypeModel::string()),
                ("num".to_string(), TypeModel::number()),
            ])
        );
    }

    #[test]
    fn test_empty_object_and_function() {
        assert_eq!(parse_descriptor("object()").unwrap(), TypeModel::Object(vec![]));
        assert_eq!(
            parse_descriptor("function() null").unwrap(),
            TypeModel::function([], TypeModel::null())
        );
    }

    #[test]
    fn test_function() {
        assert_eq!(
            parse_descriptor("function(number, optional(string)) boolean").unwrap(),
            TypeModel::function(
                [TypeModel::number(), TypeModel::nullable(TypeModel::string())],
                TypeModel::boolean()
            )
        );
    }

    #[test]
    fn test_nested_function_result() {
        assert_eq!(
            parse_descriptor("function(number) function(string) null").unwrap(),
            TypeModel::function(
                [TypeModel::number()],
                TypeModel::function([TypeModel::string()], TypeModel::null())
            )
        );
    }

    #[test]
    fn test_display_round_trips() {
        let source = r#"object("a": array(number), "b b": function(optional(string)) boolean)"#;
        let model = parse_descriptor(source).unwrap();
        assert_eq!(model.to_string(), source);
        assert_eq!(parse_descriptor(&model.to_string()).unwrap(), model);
    }

    #[test]
    fn test_trailing_input_is_rejected() {
        let err = parse_descriptor("number string").unwrap_err();
        assert!(err.is_syntax());
        assert_eq!(err.span.as_ref().map(|s| s.0.start), Some(7));
        assert!(err.message.starts_with("failed to parse number string:1:8"));
    }

    #[test]
    fn test_keyword_needs_boundary() {
        assert!(parse_descriptor("numbers").is_err());
        assert!(parse_descriptor("optionalnumber").is_err());
    }

    #[test]
    fn test_unclosed_wrapper() {
        let err = parse_descriptor("array(number").unwrap_err();
        assert!(err.is_syntax());
        assert!(err.message.starts_with("failed to parse array(number:"));
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let err = parse_descriptor("object(a: number, a: string)").unwrap_err();
        assert!(err.message.contains("duplicate key \"a\""));
    }

    #[test]
    fn test_from_str() {
        let model: TypeModel = "array(boolean)".parse().unwrap();
        assert_eq!(model, TypeModel::array(TypeModel::boolean()));
    }
}
