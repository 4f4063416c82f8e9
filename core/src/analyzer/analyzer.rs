//! Type inference over the expression tree.
//!
//! Each node gets a [`TypeModel`] computed bottom-up from its children, the
//! models bound in a [`TypeScope`], and the static type of `this`. Every
//! composition point goes through [`merge`] or [`accepts`], so a tree that
//! passes here is one the evaluator can run without further checks.

use hashbrown::HashMap;
use tracing::{debug, trace};

use crate::errors::Error;
use crate::parser::{BinaryOp, Expression, Literal, UnaryOp};
use crate::types::{Simple, TypeModel, accepts, merge, require};

/// Default bound on tree depth, shared with the evaluator.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Source of identifier types during inference.
pub trait TypeScope {
    fn model_of(&self, name: &str) -> Option<&TypeModel>;
}

impl TypeScope for HashMap<String, TypeModel> {
    fn model_of(&self, name: &str) -> Option<&TypeModel> {
        self.get(name)
    }
}

/// Infers the type of `expr` with `this` typed as `this_model`.
pub fn analyze<S: TypeScope + ?Sized>(
    scope: &S,
    this_model: &TypeModel,
    expr: &Expression,
) -> Result<TypeModel, Error> {
    Analyzer::new(scope, this_model).analyze(expr)
}

pub struct Analyzer<'a, S: ?Sized> {
    scope: &'a S,
    this_model: &'a TypeModel,
    max_depth: usize,
    depth: usize,
}

impl<'a, S: TypeScope + ?Sized> Analyzer<'a, S> {
    pub fn new(scope: &'a S, this_model: &'a TypeModel) -> Self {
        Self {
            scope,
            this_model,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn analyze(&mut self, expr: &Expression) -> Result<TypeModel, Error> {
        if self.depth >= self.max_depth {
            return Err(Error::resource_exceeded(format!(
                "expression nesting exceeds maximum depth of {}",
                self.max_depth
            )));
        }
        self.depth += 1;
        let result = self.analyze_inner(expr);
        self.depth -= 1;
        if let Ok(model) = &result {
            trace!(kind = expr.kind_name(), model = %model, "inferred");
        }
        result
    }

    fn analyze_inner(&mut self, expr: &Expression) -> Result<TypeModel, Error> {
        match expr {
            Expression::Literal { value } => Ok(TypeModel::Simple(match value {
                Literal::Null => Simple::Null,
                Literal::Boolean(_) => Simple::Boolean,
                Literal::Number(_) => Simple::Number,
                Literal::String(_) => Simple::String,
            })),

            Expression::Identifier { name } => self
                .scope
                .model_of(name)
                .cloned()
                .ok_or_else(|| Error::reference(format!("\"{}\" not found", name))),

            Expression::This => Ok(self.this_model.clone()),

            Expression::Array { elements } => {
                if elements.is_empty() {
                    return Err(Error::type_error("cannot infer element type of empty array"));
                }
                let mut element: Option<TypeModel> = None;
                for item in elements {
                    let model = self.analyze(item)?;
                    element = Some(merge(element.as_ref(), &model)?);
                }
                Ok(TypeModel::array(element.unwrap_or_else(TypeModel::null)))
            }

            Expression::Unary {
                operator,
                argument,
                prefix,
            } => {
                if !prefix {
                    return Err(Error::syntax(format!(
                        "unary operator \"{}\" must be prefix",
                        operator
                    )));
                }
                let model = self.analyze(argument)?;
                match operator {
                    UnaryOp::Plus => {
                        require_primitive(&model)?;
                        Ok(TypeModel::number())
                    }
                    UnaryOp::Not => {
                        require_primitive(&model)?;
                        Ok(TypeModel::boolean())
                    }
                    UnaryOp::Neg | UnaryOp::BitNot => {
                        require(&TypeModel::number(), &model)?;
                        Ok(model)
                    }
                }
            }

            Expression::Binary {
                operator,
                left,
                right,
            } => self.analyze_binary(*operator, left, right),

            Expression::Logical { left, right, .. } => {
                let boolean = TypeModel::boolean();
                require(&boolean, &self.analyze(left)?)?;
                require(&boolean, &self.analyze(right)?)?;
                Ok(boolean)
            }

            Expression::Conditional {
                test,
                consequent,
                alternate,
            } => {
                require(&TypeModel::boolean(), &self.analyze(test)?)?;
                let consequent = self.analyze(consequent)?;
                let alternate = self.analyze(alternate)?;
                Ok(merge(Some(&consequent), &alternate)?)
            }

            Expression::Compound { body } => {
                let mut last = TypeModel::null();
                for item in body {
                    last = self.analyze(item)?;
                }
                Ok(last)
            }

            Expression::Member {
                computed: true,
                object,
                property,
            } => {
                let object = self.analyze(object)?;
                let TypeModel::Array(element) = &object else {
                    return Err(Error::mismatch("array", &object));
                };
                require(&TypeModel::number(), &self.analyze(property)?)?;
                Ok(TypeModel::nullable(element.strip_nullable().clone()))
            }

            Expression::Member {
                computed: false,
                object,
                property,
            } => {
                let Expression::Identifier { name: key } = property.as_ref() else {
                    return Err(Error::syntax(format!(
                        "unsupported property access with {}",
                        property.kind_name()
                    )));
                };
                let object = self.analyze(object)?;
                if !matches!(object, TypeModel::Object(_)) {
                    return Err(Error::mismatch("object", &object));
                }
                object.entry(key).cloned().ok_or_else(|| {
                    Error::reference(format!("\"{}\" not exists in object", key))
                })
            }

            Expression::Call { callee, arguments } => {
                let callee_model = self.analyze(callee)?;
                let TypeModel::Function {
                    arguments: parameters,
                    result,
                } = &callee_model
                else {
                    return Err(Error::mismatch("function", &callee_model));
                };
                debug!(
                    callee = %callee_model,
                    supplied = arguments.len(),
                    "checking call"
                );
                let supplied = arguments
                    .iter()
                    .map(|argument| self.analyze(argument))
                    .collect::<Result<Vec<_>, _>>()?;
                let null = TypeModel::null();
                for (index, parameter) in parameters.iter().enumerate() {
                    let actual = supplied.get(index).unwrap_or(&null);
                    if !accepts(parameter, actual) {
                        return Err(Error::type_error(format!(
                            "require {} got {} for argument {}",
                            parameter,
                            actual,
                            index + 1
                        )));
                    }
                }
                Ok(result.as_ref().clone())
            }
        }
    }

    fn analyze_binary(
        &mut self,
        operator: BinaryOp,
        left: &Expression,
        right: &Expression,
    ) -> Result<TypeModel, Error> {
        let left = self.analyze(left)?;
        let right = self.analyze(right)?;
        match operator {
            BinaryOp::Nullish => Ok(merge(Some(left.strip_nullable()), &right)?),

            BinaryOp::In => {
                let TypeModel::Array(element) = &right else {
                    return Err(Error::mismatch("array", &right));
                };
                let merged = merge(Some(element.strip_nullable()), &left)?;
                if !merged.strip_nullable().is_simple() {
                    return Err(Error::mismatch("simple", &merged));
                }
                Ok(TypeModel::boolean())
            }

            op if op.is_equality() => {
                let merged = merge(Some(&left), &right)?;
                if !merged.strip_nullable().is_simple() {
                    return Err(Error::mismatch("simple", &merged));
                }
                Ok(TypeModel::boolean())
            }

            op if op.is_comparison() => {
                let merged = merge(Some(&left), &right)?;
                require_number_or_string(&merged)?;
                Ok(TypeModel::boolean())
            }

            BinaryOp::Add => {
                let merged = merge(Some(&left), &right)?;
                require_number_or_string(&merged)?;
                Ok(merged)
            }

            _ => {
                let merged = merge(Some(&left), &right)?;
                require(&TypeModel::number(), &merged)?;
                Ok(merged)
            }
        }
    }
}

fn require_number_or_string(model: &TypeModel) -> Result<(), Error> {
    if accepts(&TypeModel::number(), model) || accepts(&TypeModel::string(), model) {
        Ok(())
    } else {
        Err(Error::mismatch("number or string", model))
    }
}

fn require_primitive(model: &TypeModel) -> Result<(), Error> {
    let accepted = [Simple::Boolean, Simple::Number, Simple::String]
        .into_iter()
        .any(|simple| accepts(&TypeModel::Simple(simple), model));
    if accepted {
        Ok(())
    } else {
        Err(Error::mismatch("boolean, number or string", model))
    }
}
