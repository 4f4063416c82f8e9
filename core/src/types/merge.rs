//! Merging of type models into their common shape.
//!
//! [`merge`] is the single compatibility primitive: inference uses it to
//! unify array elements, conditional branches and binary operands, and
//! [`accepts`] derives one-way assignability from it.

use core::fmt;

use crate::errors::Error;
use crate::types::TypeModel;

/// Why two models could not be merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// Different simple names or different top-level variants.
    Mismatch {
        expected: TypeModel,
        actual: TypeModel,
    },
    /// Two functions or two objects whose shapes are not identical.
    IncompatibleComposite {
        kind: &'static str,
        expected: TypeModel,
        actual: TypeModel,
    },
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeError::Mismatch { expected, actual } => {
                write!(f, "require {} got {}", expected, actual)
            }
            MergeError::IncompatibleComposite {
                kind,
                expected,
                actual,
            } => write!(
                f,
                "cannot merge incompatible {}: {} and {}",
                kind, expected, actual
            ),
        }
    }
}

impl From<MergeError> for Error {
    fn from(err: MergeError) -> Self {
        Error::type_error(err.to_string())
    }
}

/// Merges `actual` into `expected`.
///
/// - With no `expected`, the result is `actual`.
/// - If either side is nullable, one nullable layer is stripped from both,
///   the inner types are merged and the result is wrapped again. A bare
///   `null` therefore does not merge into `optional(T)` unless `T` is `null`.
/// - Simple types merge only with the same name.
/// - Arrays merge element-wise.
/// - Functions and objects must be structurally identical (declaration order
///   included); the result is `expected`.
/// - Any other combination fails.
pub fn merge(expected: Option<&TypeModel>, actual: &TypeModel) -> Result<TypeModel, MergeError> {
    let Some(expected) = expected else {
        return Ok(actual.clone());
    };

    match (expected, actual) {
        (TypeModel::Nullable(_), _) | (_, TypeModel::Nullable(_)) => {
            let inner = merge(Some(expected.strip_nullable()), actual.strip_nullable())?;
            Ok(TypeModel::nullable(inner))
        }
        (TypeModel::Simple(left), TypeModel::Simple(right)) => {
            if left == right {
                Ok(expected.clone())
            } else {
                Err(mismatch(expected, actual))
            }
        }
        (TypeModel::Array(left), TypeModel::Array(right)) => {
            let inner = merge(Some(left), right)?;
            Ok(TypeModel::array(inner))
        }
        (TypeModel::Function { .. }, TypeModel::Function { .. })
        | (TypeModel::Object(_), TypeModel::Object(_)) => {
            if expected == actual {
                Ok(expected.clone())
            } else {
                Err(MergeError::IncompatibleComposite {
                    kind: expected.kind_name(),
                    expected: expected.clone(),
                    actual: actual.clone(),
                })
            }
        }
        _ => Err(mismatch(expected, actual)),
    }
}

fn mismatch(expected: &TypeModel, actual: &TypeModel) -> MergeError {
    MergeError::Mismatch {
        expected: expected.clone(),
        actual: actual.clone(),
    }
}

/// Whether a value of type `actual` may be supplied where `expected` is
/// required: the merge succeeds and does not widen `expected`.
///
/// Function types get no parameter variance; they are accepted only when
/// identical.
pub fn accepts(expected: &TypeModel, actual: &TypeModel) -> bool {
    match merge(Some(expected), actual) {
        Ok(merged) => merged == *expected,
        Err(_) => false,
    }
}

/// Like [`accepts`], but fails with `require <expected> got <actual>`.
pub fn require(expected: &TypeModel, actual: &TypeModel) -> Result<(), Error> {
    if accepts(expected, actual) {
        Ok(())
    } else {
        Err(Error::mismatch(expected, actual))
    }
}
