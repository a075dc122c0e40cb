//! Standard actions over the shared variable store.
//!
//! - `save <data> (to) variable (named) <name>` stores and returns the data
//! - `get (value) (from) variable (named) <name>` returns the value, or Nil
//!
//! `<name>` is a raw parameter: a bound variable's name arrives as the name,
//! so re-saving under it overwrites the variable.

use std::sync::Arc;

use promethia_foundation::{Error, Result, SynonymTable, Value};

use crate::action::{ActionDefinition, RegistrationReport, arg};
use crate::context::ResolutionContext;
use crate::engine::ResolutionEngine;

/// Template of the store action.
pub const SAVE_VARIABLE: &str = "save <data> (to) variable (named) <name>";

/// Template of the lookup action.
pub const GET_VARIABLE: &str = "get (value) (from) variable (named) <name>";

/// Default wording for the standard actions.
pub const VARIABLE_SYNONYMS: &str = r#"{
    "save": ["store", "keep"],
    "get": ["retrieve", "load"],
    "variable": ["var"],
    "named": ["called"]
}"#;

/// Parses [`VARIABLE_SYNONYMS`].
///
/// # Errors
///
/// Returns a configuration error if the built-in table is malformed.
pub fn default_synonyms() -> Result<SynonymTable> {
    SynonymTable::from_json_str(VARIABLE_SYNONYMS)
}

/// Builds the variable actions over `context`.
#[must_use]
pub fn variable_actions(context: &Arc<ResolutionContext>) -> Vec<ActionDefinition> {
    let store = Arc::clone(context);
    let save = ActionDefinition::new("store_variable", SAVE_VARIABLE, move |args| {
        let data = arg(args, 0)?.clone();
        let name = variable_name(args, 1)?;
        store.variables().set(&name, data.clone());
        Ok(data)
    })
    .with_raw_params(&["name"]);

    let load = Arc::clone(context);
    let get = ActionDefinition::new("get_variable", GET_VARIABLE, move |args| {
        let name = variable_name(args, 0)?;
        Ok(load.variables().get(&name).unwrap_or_default())
    })
    .with_raw_params(&["name"]);

    vec![save, get]
}

/// Registers the variable actions on `engine`, bound to its context.
///
/// # Errors
///
/// Returns the first registration error.
pub fn register_variable_actions(engine: &mut ResolutionEngine) -> Result<Vec<RegistrationReport>> {
    let actions = variable_actions(engine.context());
    engine.register_actions(actions)
}

/// Variable names are text; a non-string value passed by a host caller names
/// by its display form.
fn variable_name(args: &[Value], index: usize) -> Result<String> {
    let value = arg(args, index)?;
    match value {
        Value::String(s) => Ok(s.to_string()),
        Value::Nil => Err(Error::type_mismatch("string", value.type_name())),
        other => Ok(other.to_string()),
    }
}
