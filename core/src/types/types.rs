use core::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Names of the primitive types.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Simple {
    Null,
    Number,
    String,
    Boolean,
}

impl Simple {
    pub fn name(self) -> &'static str {
        match self {
            Simple::Null => "null",
            Simple::Number => "number",
            Simple::String => "string",
            Simple::Boolean => "boolean",
        }
    }
}

impl Display for Simple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Structural type of a value.
///
/// Models are finite trees. Equality is the derived structural one, so
/// `Object` entries and `Function` arguments compare in declaration order:
/// `object("a": number, "b": string)` and `object("b": string, "a": number)`
/// are different models.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeModel {
    Simple(Simple),
    /// Either absent (`null`/`undefined`) or the inner type.
    Nullable(Box<TypeModel>),
    /// Homogeneous sequence.
    Array(Box<TypeModel>),
    /// Record with unique keys, in declaration order.
    Object(Vec<(String, TypeModel)>),
    Function {
        arguments: Vec<TypeModel>,
        result: Box<TypeModel>,
    },
}

impl TypeModel {
    pub fn null() -> Self {
        TypeModel::Simple(Simple::Null)
    }

    pub fn number() -> Self {
        TypeModel::Simple(Simple::Number)
    }

    pub fn string() -> Self {
        TypeModel::Simple(Simple::String)
    }

    pub fn boolean() -> Self {
        TypeModel::Simple(Simple::Boolean)
    }

    /// Wraps `inner` as nullable. Layers are kept: `optional(optional(T))`
    /// is a distinct tree from `optional(T)`.
    pub fn nullable(inner: TypeModel) -> Self {
        TypeModel::Nullable(Box::new(inner))
    }

    pub fn array(inner: TypeModel) -> Self {
        TypeModel::Array(Box::new(inner))
    }

    /// Builds an object model. Keys must be unique.
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, TypeModel)>) -> Self {
        let entries: Vec<(String, TypeModel)> = entries
            .into_iter()
            .map(|(key, model)| (key.into(), model))
            .collect();
        debug_assert!(
            entries
                .iter()
                .enumerate()
                .all(|(i, (key, _))| entries[..i].iter().all(|(other, _)| other != key)),
            "object keys must be unique"
        );
        TypeModel::Object(entries)
    }

    pub fn function(arguments: impl IntoIterator<Item = TypeModel>, result: TypeModel) -> Self {
        TypeModel::Function {
            arguments: arguments.into_iter().collect(),
            result: Box::new(result),
        }
    }

    /// Removes one outer `Nullable` layer, if present.
    pub fn strip_nullable(&self) -> &TypeModel {
        match self {
            TypeModel::Nullable(inner) => inner,
            other => other,
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, TypeModel::Nullable(_))
    }

    pub fn is_simple(&self) -> bool {
        matches!(self, TypeModel::Simple(_))
    }

    pub fn as_simple(&self) -> Option<Simple> {
        match self {
            TypeModel::Simple(simple) => Some(*simple),
            _ => None,
        }
    }

    /// Looks up an entry of an `Object` model.
    pub fn entry(&self, key: &str) -> Option<&TypeModel> {
        match self {
            TypeModel::Object(entries) => entries
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, model)| model),
            _ => None,
        }
    }

    /// Name of the variant, used in merge diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeModel::Simple(_) => "simple",
            TypeModel::Nullable(_) => "optional",
            TypeModel::Array(_) => "array",
            TypeModel::Object(_) => "object",
            TypeModel::Function { .. } => "function",
        }
    }
}

impl From<Simple> for TypeModel {
    fn from(simple: Simple) -> Self {
        TypeModel::Simple(simple)
    }
}

/// Renders the model in the verbose descriptor syntax, so the output parses
/// back to an equal model.
impl Display for TypeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeModel::Simple(simple) => write!(f, "{}", simple),
            TypeModel::Nullable(inner) => write!(f, "optional({})", inner),
            TypeModel::Array(inner) => write!(f, "array({})", inner),
            TypeModel::Object(entries) => {
                write!(f, "object(")?;
                for (i, (key, model)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", key, model)?;
                }
                write!(f, ")")
            }
            TypeModel::Function { arguments, result } => {
                write!(f, "function(")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ") {}", result)
            }
        }
    }
}
