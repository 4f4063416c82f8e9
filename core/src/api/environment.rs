//! Name to binding table owned by a [`Vm`](super::Vm).

use hashbrown::HashMap;
use tracing::debug;

use crate::analyzer::TypeScope;
use crate::api::Binding;
use crate::evaluator::Scope;
use crate::types::TypeModel;
use crate::values::Value;

/// Bindings visible to expressions, keyed by identifier.
///
/// The analyzer reads models from it and the evaluator reads values, so both
/// passes see the same names.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: HashMap<String, Binding>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name`, replacing and returning any previous binding.
    pub fn insert(&mut self, name: impl Into<String>, binding: Binding) -> Option<Binding> {
        let name = name.into();
        debug!(name = %name, model = %binding.model(), "binding");
        self.bindings.insert(name, binding)
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Binding> {
        let removed = self.bindings.remove(name);
        if removed.is_some() {
            debug!(name, "unbinding");
        }
        removed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bound names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }
}

impl TypeScope for Environment {
    fn model_of(&self, name: &str) -> Option<&TypeModel> {
        self.get(name).map(Binding::model)
    }
}

impl Scope for Environment {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name).map(Binding::value)
    }
}
