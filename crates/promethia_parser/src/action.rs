//! Action definitions and trie bindings.
//!
//! An action is a host callable plus the phrase template that invokes it.
//! The engine never inspects the callable; it only passes positional
//! arguments and stores the returned [`Value`].

use std::fmt;
use std::sync::Arc;

use promethia_foundation::{Error, Result, Value};

/// Callable behind an action. Receives one argument per declared parameter.
pub type ActionFn = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

/// A registrable action.
#[derive(Clone)]
pub struct ActionDefinition {
    /// Name used in logs and error frames
    pub name: String,
    /// Phrase template, e.g. `save <data> (to) file (named) <name>`
    pub template: String,
    /// Formal parameter names; empty means "take them from the template"
    pub params: Vec<String>,
    /// Parameters that receive the words as written, never substituted
    /// pronoun or variable values
    pub raw_params: Vec<String>,
    /// The host function
    pub callable: ActionFn,
}

impl ActionDefinition {
    /// Creates an action whose parameter names come from its template.
    pub fn new<F>(name: impl Into<String>, template: impl Into<String>, callable: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            template: template.into(),
            params: Vec::new(),
            raw_params: Vec::new(),
            callable: Arc::new(callable),
        }
    }

    /// Builder method to override the formal parameter names.
    ///
    /// The override must name as many parameters as the template has
    /// placeholders, or registration rejects the action.
    #[must_use]
    pub fn with_params(mut self, params: &[&str]) -> Self {
        self.params = params.iter().map(|p| (*p).to_string()).collect();
        self
    }

    /// Builder method to mark parameters as raw.
    ///
    /// A raw parameter receives the surface words of its slot. A pronoun or
    /// variable name there arrives as the word itself, so actions that take
    /// a variable name see the name rather than its current value.
    #[must_use]
    pub fn with_raw_params(mut self, params: &[&str]) -> Self {
        self.raw_params = params.iter().map(|p| (*p).to_string()).collect();
        self
    }

    /// Returns true if the parameter at `index` is raw.
    #[must_use]
    pub fn is_raw(&self, index: usize) -> bool {
        self.params
            .get(index)
            .is_some_and(|name| self.raw_params.contains(name))
    }

    /// Invokes the callable, tagging failures with the action name.
    ///
    /// # Errors
    ///
    /// Propagates whatever the callable returns.
    pub fn invoke(&self, args: &[Value]) -> Result<Value> {
        (self.callable)(args).map_err(|e| e.in_frame(format!("action '{}'", self.name)))
    }
}

impl fmt::Debug for ActionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDefinition")
            .field("name", &self.name)
            .field("template", &self.template)
            .field("params", &self.params)
            .field("raw_params", &self.raw_params)
            .finish_non_exhaustive()
    }
}

/// The action attached to the trie node where one signature ends.
#[derive(Clone, Debug)]
pub struct ActionBinding {
    /// The registered action, parameters resolved
    pub action: Arc<ActionDefinition>,
    /// For each placeholder along the signature, its parameter index
    pub slots: Vec<usize>,
}

impl ActionBinding {
    /// Name of the bound action.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.action.name
    }

    /// Formal parameter names of the bound action.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.action.params
    }
}

/// Outcome of registering one action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    /// Action name
    pub action: String,
    /// Signatures inserted into the trie
    pub signatures: usize,
    /// Signatures skipped as unusable (empty, or starting with a placeholder)
    pub skipped: usize,
    /// Names of actions whose binding was overwritten, one per signature
    pub overwritten: Vec<String>,
}

impl RegistrationReport {
    /// Returns true if the action can be reached by at least one signature.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.signatures > 0
    }
}

// =============================================================================
// Argument helpers for action implementations
// =============================================================================

/// Returns the argument at `index`.
///
/// # Errors
///
/// Returns an arity mismatch if fewer arguments were supplied.
pub fn arg(args: &[Value], index: usize) -> Result<&Value> {
    args.get(index)
        .ok_or_else(|| Error::arity_mismatch(index + 1, args.len()))
}

/// Returns the argument at `index` as text.
///
/// # Errors
///
/// Returns an arity mismatch if the argument is missing, or a type mismatch
/// if it is not a string.
pub fn string_arg(args: &[Value], index: usize) -> Result<&str> {
    let value = arg(args, index)?;
    value
        .as_str()
        .ok_or_else(|| Error::type_mismatch("string", value.type_name()))
}

/// Returns the argument at `index` as an integer, parsing numeric text.
///
/// # Errors
///
/// Returns an arity mismatch if the argument is missing, or a type mismatch
/// if it is not an integer.
pub fn int_arg(args: &[Value], index: usize) -> Result<i64> {
    let value = arg(args, index)?;
    value
        .as_int()
        .ok_or_else(|| Error::type_mismatch("int", value.type_name()))
}
