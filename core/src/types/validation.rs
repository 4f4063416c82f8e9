use crate::types::{Simple, TypeModel};
use crate::values::Value;

/// Checks that a runtime value inhabits `model`.
///
/// Objects are open: keys the model does not declare are ignored, and a
/// declared key missing from the value is checked as `undefined`. Function
/// models accept any callable without inspecting its signature.
pub fn conforms(model: &TypeModel, value: &Value) -> bool {
    match model {
        TypeModel::Simple(simple) => match (simple, value) {
            (Simple::Null, value) => value.is_nullish(),
            (Simple::Number, Value::Number(_)) => true,
            (Simple::String, Value::String(_)) => true,
            (Simple::Boolean, Value::Boolean(_)) => true,
            _ => false,
        },
        TypeModel::Nullable(inner) => value.is_nullish() || conforms(inner, value),
        TypeModel::Array(element) => match value {
            Value::Array(items) => items.iter().all(|item| conforms(element, item)),
            _ => false,
        },
        TypeModel::Object(entries) => match value {
            Value::Object(fields) => entries.iter().all(|(key, model)| {
                conforms(model, fields.get(key.as_str()).unwrap_or(&Value::Undefined))
            }),
            _ => false,
        },
        TypeModel::Function { .. } => matches!(value, Value::Function(_)),
    }
}
