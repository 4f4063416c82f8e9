//! Core evaluation logic.

use hashbrown::HashMap;

use crate::analyzer::DEFAULT_MAX_DEPTH;
use crate::errors::Error;
use crate::evaluator::operators::{eval_binary, eval_unary, get_property};
use crate::parser::{BinaryOp, Expression, Literal, LogicalOp};
use crate::values::Value;

/// Source of identifier values during evaluation.
pub trait Scope {
    fn lookup(&self, name: &str) -> Option<&Value>;
}

impl Scope for HashMap<String, Value> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl Scope for std::collections::HashMap<String, Value> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

/// Tree-walking evaluator.
///
/// Unknown identifiers evaluate to `undefined`; rejecting them is the
/// analyzer's job. The only checks performed here are the ones JavaScript
/// itself performs at runtime (calling a non-function, reading a property of
/// `null`) plus the depth limit.
pub struct Evaluator<'a, S: ?Sized> {
    scope: &'a S,
    this: &'a Value,
    max_depth: usize,
    depth: usize,
}

impl<'a, S: Scope + ?Sized> Evaluator<'a, S> {
    pub fn new(scope: &'a S, this: &'a Value) -> Self {
        Self {
            scope,
            this,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn eval(&mut self, expr: &Expression) -> Result<Value, Error> {
        if self.depth >= self.max_depth {
            return Err(Error::resource_exceeded(format!(
                "evaluation exceeds maximum depth of {}",
                self.max_depth
            )));
        }
        self.depth += 1;
        let result = self.eval_inner(expr);
        self.depth -= 1;
        result
    }

    fn eval_inner(&mut self, expr: &Expression) -> Result<Value, Error> {
        match expr {
            Expression::Literal { value } => Ok(match value {
                Literal::Null => Value::Null,
                Literal::Boolean(b) => Value::Boolean(*b),
                Literal::Number(n) => Value::Number(*n),
                Literal::String(s) => Value::String(s.clone()),
            }),

            Expression::Identifier { name } => {
                Ok(self.scope.lookup(name).cloned().unwrap_or_default())
            }

            Expression::This => Ok(self.this.clone()),

            Expression::Array { elements } => {
                let items = elements
                    .iter()
                    .map(|element| self.eval(element))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::array(items))
            }

            Expression::Unary {
                operator, argument, ..
            } => {
                let value = self.eval(argument)?;
                Ok(eval_unary(*operator, &value))
            }

            Expression::Binary {
                operator: BinaryOp::Nullish,
                left,
                right,
            } => {
                let left = self.eval(left)?;
                if left.is_nullish() {
                    self.eval(right)
                } else {
                    Ok(left)
                }
            }

            Expression::Binary {
                operator,
                left,
                right,
            } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                eval_binary(*operator, &left, &right)
            }

            Expression::Logical {
                operator,
                left,
                right,
            } => {
                let left = self.eval(left)?;
                match (operator, left.is_truthy()) {
                    (LogicalOp::And, false) | (LogicalOp::Or, true) => Ok(left),
                    _ => self.eval(right),
                }
            }

            Expression::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if self.eval(test)?.is_truthy() {
                    self.eval(consequent)
                } else {
                    self.eval(alternate)
                }
            }

            Expression::Compound { body } => {
                let mut last = Value::Undefined;
                for item in body {
                    last = self.eval(item)?;
                }
                Ok(last)
            }

            Expression::Member {
                computed,
                object,
                property,
            } => {
                let object = self.eval(object)?;
                let key = if *computed {
                    self.eval(property)?
                } else {
                    match property.as_ref() {
                        Expression::Identifier { name } => Value::String(name.clone()),
                        _ => return Ok(Value::Undefined),
                    }
                };
                get_property(&object, &key)
            }

            Expression::Call { callee, arguments } => {
                let callee = self.eval(callee)?;
                let args = arguments
                    .iter()
                    .map(|argument| self.eval(argument))
                    .collect::<Result<Vec<_>, _>>()?;
                match &callee {
                    Value::Function(function) => function.call(&args),
                    other => Err(Error::type_error(format!("{:?} is not a function", other))),
                }
            }
        }
    }
}
