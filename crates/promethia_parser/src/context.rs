//! Shared resolution state: named variables and the last-result slot.
//!
//! One [`ResolutionContext`] is shared (through `Arc`) by the engine and by
//! any action that reads or writes variables. Its locks are the mutual
//! exclusion boundary around the variable store and the last-result slot.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};

use promethia_foundation::Value;

/// Key/value store consulted for variable references.
pub trait VariableStore: Send + Sync {
    /// Returns the value bound to `name`.
    fn get(&self, name: &str) -> Option<Value>;

    /// Binds `name`, replacing any previous value.
    fn set(&self, name: &str, value: Value);

    /// Returns true if `name` is bound.
    fn exists(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Unbinds `name`, returning its value.
    fn remove(&self, name: &str) -> Option<Value>;

    /// Bound names in sorted order.
    fn names(&self) -> Vec<String>;
}

/// In-memory [`VariableStore`].
#[derive(Debug, Default)]
pub struct MemoryVariables {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryVariables {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl VariableStore for MemoryVariables {
    fn get(&self, name: &str) -> Option<Value> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn set(&self, name: &str, value: Value) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value);
    }

    fn exists(&self, name: &str) -> bool {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    fn remove(&self, name: &str) -> Option<Value> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

/// Variables plus the most recent action result.
pub struct ResolutionContext {
    variables: Box<dyn VariableStore>,
    last_result: Mutex<Value>,
}

impl std::fmt::Debug for ResolutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionContext")
            .field("variables", &self.variables.names())
            .field("last_result", &self.last_result())
            .finish()
    }
}

impl Default for ResolutionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionContext {
    /// Creates a context backed by [`MemoryVariables`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_variables(Box::new(MemoryVariables::new()))
    }

    /// Creates a context backed by a caller-supplied store.
    #[must_use]
    pub fn with_variables(variables: Box<dyn VariableStore>) -> Self {
        Self {
            variables,
            last_result: Mutex::new(Value::Nil),
        }
    }

    /// The variable store.
    #[must_use]
    pub fn variables(&self) -> &dyn VariableStore {
        self.variables.as_ref()
    }

    /// Returns the most recent action result (Nil before any action ran).
    #[must_use]
    pub fn last_result(&self) -> Value {
        self.last_result
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the last-result slot.
    pub fn set_last_result(&self, value: Value) {
        *self.last_result.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }
}
