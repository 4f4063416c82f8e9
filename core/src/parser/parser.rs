use lazy_static::lazy_static;
use pest::Parser;
use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;
use tracing::trace;

use crate::analyzer::DEFAULT_MAX_DEPTH;
use crate::errors::Error;
use crate::parser::ast::{BinaryOp, Expression, Literal, LogicalOp, UnaryOp};
use crate::parser::error::{DescribeRule, ParseError, ParseErrorKind, convert_pest_error};
use crate::parser::{Span, unescape};

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        .op(Op::infix(Rule::cond_op, Assoc::Right))      // `? :`
        .op(Op::infix(Rule::or, Assoc::Left))            // `||`
        .op(Op::infix(Rule::and, Assoc::Left))           // `&&`
        .op(Op::infix(Rule::bit_or, Assoc::Left))        // `|`
        .op(Op::infix(Rule::bit_xor, Assoc::Left))       // `^`
        .op(
            Op::infix(Rule::bit_and, Assoc::Left) |
            Op::infix(Rule::nullish, Assoc::Left)
        )                                                // `&`, `??`
        .op(
            Op::infix(Rule::eq, Assoc::Left) |
            Op::infix(Rule::ne, Assoc::Left) |
            Op::infix(Rule::strict_eq, Assoc::Left) |
            Op::infix(Rule::strict_ne, Assoc::Left)
        )                                                // `==`, `!=`, `===`, `!==`
        .op(
            Op::infix(Rule::lt, Assoc::Left) |
            Op::infix(Rule::gt, Assoc::Left) |
            Op::infix(Rule::le, Assoc::Left) |
            Op::infix(Rule::ge, Assoc::Left)
        )                                                // `<`, `>`, `<=`, `>=`
        .op(
            Op::infix(Rule::shl, Assoc::Left) |
            Op::infix(Rule::shr, Assoc::Left) |
            Op::infix(Rule::ushr, Assoc::Left)
        )                                                // `<<`, `>>`, `>>>`
        .op(
            Op::infix(Rule::add, Assoc::Left) |
            Op::infix(Rule::sub, Assoc::Left)
        )                                                // `+`, `-`
        .op(
            Op::infix(Rule::mul, Assoc::Left) |
            Op::infix(Rule::div, Assoc::Left) |
            Op::infix(Rule::rem, Assoc::Left)
        )                                                // `*`, `/`, `%`
        .op(Op::infix(Rule::in_op, Assoc::Left))         // `in`
        .op(
            Op::prefix(Rule::neg) |
            Op::prefix(Rule::not) |
            Op::prefix(Rule::bit_not) |
            Op::prefix(Rule::plus)
        )                                                // `-`, `!`, `~`, `+`

        // Postfix operators.
        .op(
            Op::postfix(Rule::call_op) |
            Op::postfix(Rule::index_op) |
            Op::postfix(Rule::field_op)
        )                                                // `()`, `[]`, `.`
        // (highest precedence)
        ;
}

#[derive(Parser)]
#[grammar = "parser/expression.pest"]
pub struct ExpressionParser;

impl DescribeRule for Rule {
    fn describe(&self) -> &'static str {
        match self {
            Rule::EOI => "end of input",
            Rule::expression | Rule::number | Rule::string | Rule::ident | Rule::array => {
                "expression"
            }
            Rule::property => "property name",
            Rule::cond_op => "\":\"",
            Rule::call_op | Rule::index_op | Rule::field_op => "member access or call",
            _ => "operator",
        }
    }
}

/// Parses expression text. A top-level `a, b` sequence, and the empty input,
/// become a `Compound`.
pub fn parse(source: &str) -> Result<Expression, Error> {
    parse_with_max_depth(source, DEFAULT_MAX_DEPTH)
}

/// Like [`parse`], but rejects nesting deeper than `max_depth` levels with a
/// resource error before the tree is built.
pub fn parse_with_max_depth(source: &str, max_depth: usize) -> Result<Expression, Error> {
    trace!(source, max_depth, "parsing expression");
    check_bracket_depth(source, max_depth)?;
    let mut pairs =
        ExpressionParser::parse(Rule::main, source).map_err(|err| convert_pest_error(err, source))?;
    let main = pairs.next().ok_or_else(|| missing(source, 0))?;
    let builder = Builder { source, max_depth };
    let mut body = main
        .into_inner()
        .filter(|pair| pair.as_rule() == Rule::expression)
        .map(|pair| builder.parse_expr(pair, 0))
        .collect::<Result<Vec<_>, _>>()?;
    if body.len() == 1 {
        Ok(body.remove(0))
    } else {
        Ok(Expression::Compound { body })
    }
}

/// Rejects input whose brackets or `? :` arms nest past `max_depth`, since
/// the grammar descends once per level.
fn check_bracket_depth(source: &str, max_depth: usize) -> Result<(), ParseError> {
    let mut depth = 0usize;
    let mut quote = None;
    let mut chars = source.char_indices().peekable();
    while let Some((pos, c)) = chars.next() {
        if let Some(open) = quote {
            match c {
                '\\' => {
                    chars.next();
                }
                _ if c == open => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '?' if chars.peek().is_some_and(|(_, next)| *next == '?') => {
                chars.next();
            }
            '(' | '[' | '?' => {
                depth += 1;
                if depth > max_depth {
                    return Err(too_deep(source, pos, max_depth));
                }
            }
            ')' | ']' | ':' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Upper bound on how many tree levels a flat `operand (infix operand)*`
/// sequence folds into: one per infix operator plus the longest run of
/// prefix and postfix operators around a single operand.
fn fold_depth(pair: &Pair<Rule>) -> usize {
    let mut infix = 0;
    let mut run = 0;
    let mut longest = 0;
    for part in pair.clone().into_inner() {
        match part.as_rule() {
            Rule::neg
            | Rule::not
            | Rule::bit_not
            | Rule::plus
            | Rule::call_op
            | Rule::index_op
            | Rule::field_op => run += 1,
            Rule::number
            | Rule::string
            | Rule::true_kw
            | Rule::false_kw
            | Rule::null_kw
            | Rule::this_kw
            | Rule::array
            | Rule::grouped
            | Rule::ident => {}
            _ => {
                infix += 1;
                longest = longest.max(run);
                run = 0;
            }
        }
    }
    infix + longest.max(run) + 1
}

fn too_deep(source: &str, pos: usize, max_depth: usize) -> ParseError {
    ParseError::new(
        ParseErrorKind::MaxDepthExceeded { max_depth },
        source,
        Span::new(pos, pos),
    )
}

struct Builder<'s> {
    source: &'s str,
    max_depth: usize,
}

impl Builder<'_> {
    fn parse_expr(&self, pair: Pair<Rule>, depth: usize) -> Result<Expression, ParseError> {
        let source = self.source;
        match pair.as_rule() {
            Rule::expression => {
                let depth = depth + fold_depth(&pair);
                if depth > self.max_depth {
                    let pos = pair.as_span().start();
                    return Err(too_deep(source, pos, self.max_depth));
                }
                PRATT_PARSER
                    .map_primary(|primary| self.parse_expr(primary, depth))
                    .map_prefix(|op, rhs| {
                        let operator = match op.as_rule() {
                            Rule::neg => UnaryOp::Neg,
                            Rule::not => UnaryOp::Not,
                            Rule::bit_not => UnaryOp::BitNot,
                            Rule::plus => UnaryOp::Plus,
                            rule => return Err(unhandled(source, rule, &op)),
                        };
                        Ok(Expression::unary(operator, rhs?))
                    })
                    .map_infix(|lhs, op, rhs| {
                        let operator = match op.as_rule() {
                            Rule::cond_op => {
                                let consequent = self.single_inner(op, depth)?;
                                return Ok(Expression::Conditional {
                                    test: Box::new(lhs?),
                                    consequent: Box::new(consequent),
                                    alternate: Box::new(rhs?),
                                });
                            }
                            Rule::or | Rule::and => {
                                let operator = if op.as_rule() == Rule::or {
                                    LogicalOp::Or
                                } else {
                                    LogicalOp::And
                                };
                                return Ok(Expression::Logical {
                                    operator,
                                    left: Box::new(lhs?),
                                    right: Box::new(rhs?),
                                });
                            }
                            Rule::nullish => BinaryOp::Nullish,
                            Rule::bit_or => BinaryOp::BitOr,
                            Rule::bit_xor => BinaryOp::BitXor,
                            Rule::bit_and => BinaryOp::BitAnd,
                            Rule::eq => BinaryOp::Eq,
                            Rule::ne => BinaryOp::Ne,
                            Rule::strict_eq => BinaryOp::StrictEq,
                            Rule::strict_ne => BinaryOp::StrictNe,
                            Rule::lt => BinaryOp::Lt,
                            Rule::gt => BinaryOp::Gt,
                            Rule::le => BinaryOp::Le,
                            Rule::ge => BinaryOp::Ge,
                            Rule::shl => BinaryOp::Shl,
                            Rule::shr => BinaryOp::Shr,
                            Rule::ushr => BinaryOp::UShr,
                            Rule::add => BinaryOp::Add,
                            Rule::sub => BinaryOp::Sub,
                            Rule::mul => BinaryOp::Mul,
                            Rule::div => BinaryOp::Div,
                            Rule::rem => BinaryOp::Rem,
                            Rule::in_op => BinaryOp::In,
                            rule => return Err(unhandled(source, rule, &op)),
                        };
                        Ok(Expression::binary(operator, lhs?, rhs?))
                    })
                    .map_postfix(|lhs, op| match op.as_rule() {
                        Rule::call_op => {
                            let arguments = op
                                .into_inner()
                                .map(|argument| self.parse_expr(argument, depth))
                                .collect::<Result<_, _>>()?;
                            Ok(Expression::call(lhs?, arguments))
                        }
                        Rule::index_op => {
                            let index = self.single_inner(op, depth)?;
                            Ok(Expression::index(lhs?, index))
                        }
                        Rule::field_op => {
                            let span = op.as_span();
                            let property = op
                                .into_inner()
                                .next()
                                .ok_or_else(|| missing(source, span.end()))?;
                            Ok(Expression::field(lhs?, property.as_str()))
                        }
                        rule => Err(unhandled(source, rule, &op)),
                    })
                    .parse(pair.into_inner())
            }

            Rule::array => {
                let elements = pair
                    .into_inner()
                    .map(|element| self.parse_expr(element, depth))
                    .collect::<Result<_, _>>()?;
                Ok(Expression::Array { elements })
            }

            Rule::grouped => self.single_inner(pair, depth),

            Rule::number => {
                let text = pair.as_str();
                let value = match text
                    .strip_prefix("0x")
                    .or_else(|| text.strip_prefix("0X"))
                {
                    Some(hex) => Some(
                        hex.chars()
                            .filter_map(|digit| digit.to_digit(16))
                            .fold(0.0, |acc, digit| acc * 16.0 + f64::from(digit)),
                    ),
                    None => text.parse::<f64>().ok(),
                };
                let value = value.ok_or_else(|| {
                    ParseError::new(
                        ParseErrorKind::InvalidLiteral {
                            text: text.to_string(),
                            reason: "number out of range".to_string(),
                        },
                        source,
                        pair.as_span().into(),
                    )
                })?;
                Ok(Expression::literal(value))
            }

            Rule::string => {
                let span = pair.as_span();
                let raw = pair.into_inner().next().map_or("", |chars| chars.as_str());
                let value = unescape(raw).map_err(|reason| {
                    ParseError::new(
                        ParseErrorKind::InvalidLiteral {
                            text: span.as_str().to_string(),
                            reason,
                        },
                        source,
                        span.into(),
                    )
                })?;
                Ok(Expression::Literal {
                    value: Literal::String(value),
                })
            }

            Rule::true_kw => Ok(Expression::literal(true)),
            Rule::false_kw => Ok(Expression::literal(false)),
            Rule::null_kw => Ok(Expression::Literal {
                value: Literal::Null,
            }),
            Rule::this_kw => Ok(Expression::This),
            Rule::ident => Ok(Expression::identifier(pair.as_str())),

            rule => Err(unhandled(source, rule, &pair)),
        }
    }

    fn single_inner(&self, pair: Pair<Rule>, depth: usize) -> Result<Expression, ParseError> {
        let span = pair.as_span();
        let inner = pair
            .into_inner()
            .next()
            .ok_or_else(|| missing(self.source, span.start()))?;
        self.parse_expr(inner, depth)
    }
}

fn unhandled(source: &str, rule: Rule, pair: &Pair<Rule>) -> ParseError {
    ParseError::new(
        ParseErrorKind::Other {
            message: format!("unhandled rule: {:?}", rule),
        },
        source,
        pair.as_span().into(),
    )
}

fn missing(source: &str, pos: usize) -> ParseError {
    ParseError::new(
        ParseErrorKind::Other {
            message: "missing expected pair in rule".to_string(),
        },
        source,
        Span::new(pos, pos),
    )
}
