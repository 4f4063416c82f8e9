use core::fmt;
use core::str::FromStr;

use crate::errors::Error;

/// Expression tree consumed by the analyzer and the evaluator.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Array {
        elements: Vec<Expression>,
    },
    Binary {
        operator: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
    /// Top-level `a, b` sequence. Evaluates to its last element.
    Compound {
        body: Vec<Expression>,
    },
    Conditional {
        test: Box<Expression>,
        consequent: Box<Expression>,
        alternate: Box<Expression>,
    },
    Identifier {
        name: String,
    },
    Literal {
        value: Literal,
    },
    Logical {
        operator: LogicalOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `object[property]` when `computed`, otherwise `object.property` with
    /// `property` an `Identifier`.
    Member {
        computed: bool,
        object: Box<Expression>,
        property: Box<Expression>,
    },
    This,
    Unary {
        operator: UnaryOp,
        argument: Box<Expression>,
        prefix: bool,
    },
}

impl Expression {
    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier { name: name.into() }
    }

    pub fn literal(value: impl Into<Literal>) -> Self {
        Expression::Literal {
            value: value.into(),
        }
    }

    pub fn binary(operator: BinaryOp, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(operator: UnaryOp, argument: Expression) -> Self {
        Expression::Unary {
            operator,
            argument: Box::new(argument),
            prefix: true,
        }
    }

    /// Static member access `object.name`.
    pub fn field(object: Expression, name: impl Into<String>) -> Self {
        Expression::Member {
            computed: false,
            object: Box::new(object),
            property: Box::new(Expression::identifier(name)),
        }
    }

    /// Computed member access `object[index]`.
    pub fn index(object: Expression, index: Expression) -> Self {
        Expression::Member {
            computed: true,
            object: Box::new(object),
            property: Box::new(index),
        }
    }

    pub fn call(callee: Expression, arguments: Vec<Expression>) -> Self {
        Expression::Call {
            callee: Box::new(callee),
            arguments,
        }
    }

    /// Node kind name, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Array { .. } => "ArrayExpression",
            Expression::Binary { .. } => "BinaryExpression",
            Expression::Call { .. } => "CallExpression",
            Expression::Compound { .. } => "Compound",
            Expression::Conditional { .. } => "ConditionalExpression",
            Expression::Identifier { .. } => "Identifier",
            Expression::Literal { .. } => "Literal",
            Expression::Logical { .. } => "LogicalExpression",
            Expression::Member { .. } => "MemberExpression",
            Expression::This => "ThisExpression",
            Expression::Unary { .. } => "UnaryExpression",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Boolean(b)
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Number(n)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Ne,
    StrictEq,
    StrictNe,
    Lt,
    Gt,
    Le,
    Ge,
    Shl,
    Shr,
    UShr,
    Rem,
    Add,
    Sub,
    Mul,
    Div,
    In,
    Nullish,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNe => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::Rem => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::In => "in",
            BinaryOp::Nullish => "??",
        }
    }

    /// Operators whose operands and result are 32-bit integers.
    pub fn is_bitwise(self) -> bool {
        matches!(
            self,
            BinaryOp::BitOr
                | BinaryOp::BitXor
                | BinaryOp::BitAnd
                | BinaryOp::Shl
                | BinaryOp::Shr
                | BinaryOp::UShr
        )
    }

    pub fn is_equality(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::StrictEq | BinaryOp::StrictNe
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge
        )
    }
}

impl FromStr for BinaryOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "|" => BinaryOp::BitOr,
            "^" => BinaryOp::BitXor,
            "&" => BinaryOp::BitAnd,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::Ne,
            "===" => BinaryOp::StrictEq,
            "!==" => BinaryOp::StrictNe,
            "<" => BinaryOp::Lt,
            ">" => BinaryOp::Gt,
            "<=" => BinaryOp::Le,
            ">=" => BinaryOp::Ge,
            "<<" => BinaryOp::Shl,
            ">>" => BinaryOp::Shr,
            ">>>" => BinaryOp::UShr,
            "%" => BinaryOp::Rem,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "in" => BinaryOp::In,
            "??" => BinaryOp::Nullish,
            _ => return Err(invalid_operator(s)),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }
}

impl FromStr for LogicalOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "&&" => Ok(LogicalOp::And),
            "||" => Ok(LogicalOp::Or),
            _ => Err(invalid_operator(s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
    Plus,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::Plus => "+",
        }
    }
}

impl FromStr for UnaryOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "-" => Ok(UnaryOp::Neg),
            "!" => Ok(UnaryOp::Not),
            "~" => Ok(UnaryOp::BitNot),
            "+" => Ok(UnaryOp::Plus),
            _ => Err(invalid_operator(s)),
        }
    }
}

fn invalid_operator(op: &str) -> Error {
    Error::syntax(format!("invalid operator \"{}\"", op))
}

macro_rules! impl_display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

impl_display_as_str!(BinaryOp, LogicalOp, UnaryOp);
