//! Validated (model, value) pairs.

use alloc::borrow::Cow;

use crate::api::DescriptorSyntax;
use crate::errors::Error;
use crate::types::{TypeModel, conforms};
use crate::values::Value;

/// A value together with the model it was checked against.
///
/// Bindings can only be built through [`Binding::new`], which checks the
/// value structurally, or through [`lit`], whose models are correct by
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    model: TypeModel,
    value: Value,
}

impl Binding {
    pub fn new(model: TypeModel, value: impl Into<Value>) -> Result<Self, Error> {
        let value = value.into();
        if !conforms(&model, &value) {
            return Err(Error::type_error("Model validation failed"));
        }
        Ok(Self { model, value })
    }

    pub fn model(&self) -> &TypeModel {
        &self.model
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_parts(self) -> (TypeModel, Value) {
        (self.model, self.value)
    }
}

/// Host values with a fixed model.
pub trait LiteralValue: Into<Value> {
    fn model() -> TypeModel;
}

impl LiteralValue for () {
    fn model() -> TypeModel {
        TypeModel::null()
    }
}

impl LiteralValue for bool {
    fn model() -> TypeModel {
        TypeModel::boolean()
    }
}

impl LiteralValue for f64 {
    fn model() -> TypeModel {
        TypeModel::number()
    }
}

impl LiteralValue for i32 {
    fn model() -> TypeModel {
        TypeModel::number()
    }
}

impl LiteralValue for &str {
    fn model() -> TypeModel {
        TypeModel::string()
    }
}

impl LiteralValue for String {
    fn model() -> TypeModel {
        TypeModel::string()
    }
}

impl<T: LiteralValue> LiteralValue for Option<T> {
    fn model() -> TypeModel {
        TypeModel::nullable(T::model())
    }
}

/// Wraps a primitive or absent value in a binding of the matching model.
///
/// ```
/// use typex_core::api::lit;
/// use typex_core::types::TypeModel;
///
/// assert_eq!(lit(42).model(), &TypeModel::number());
/// assert_eq!(lit(()).model(), &TypeModel::null());
/// assert_eq!(lit(None::<&str>).model(), &TypeModel::nullable(TypeModel::string()));
/// ```
pub fn lit<T: LiteralValue>(value: T) -> Binding {
    Binding {
        model: T::model(),
        value: value.into(),
    }
}

/// Anything that denotes a type model: descriptor text, read with the VM's
/// configured syntax, or a model built in code.
pub trait Descriptor {
    fn resolve(&self, syntax: DescriptorSyntax) -> Result<Cow<'_, TypeModel>, Error>;
}

impl Descriptor for str {
    fn resolve(&self, syntax: DescriptorSyntax) -> Result<Cow<'_, TypeModel>, Error> {
        syntax.parse(self).map(Cow::Owned)
    }
}

impl Descriptor for String {
    fn resolve(&self, syntax: DescriptorSyntax) -> Result<Cow<'_, TypeModel>, Error> {
        self.as_str().resolve(syntax)
    }
}

impl Descriptor for TypeModel {
    fn resolve(&self, _syntax: DescriptorSyntax) -> Result<Cow<'_, TypeModel>, Error> {
        Ok(Cow::Borrowed(self))
    }
}
