//! Shared fixtures: a small action pack that records every call.

use std::sync::{Arc, Mutex};

use promethia_foundation::{Error, SynonymTable, Value};
use promethia_parser::action::{int_arg, string_arg};
use promethia_parser::{ActionDefinition, EngineConfig, ResolutionEngine};

/// Every call made to a recorded action, in order.
pub type Calls = Arc<Mutex<Vec<(String, Vec<Value>)>>>;

fn record(calls: &Calls, name: &str, args: &[Value]) {
    calls
        .lock()
        .unwrap()
        .push((name.to_string(), args.to_vec()));
}

/// Builds an engine with web, file, greeting, and arithmetic actions.
pub fn engine() -> (ResolutionEngine, Calls) {
    let calls: Calls = Arc::default();
    let synonyms = SynonymTable::from_json_str(r#"{"from": ["at"]}"#).unwrap();
    let mut engine = ResolutionEngine::new(EngineConfig::default(), synonyms);

    let c = Arc::clone(&calls);
    let fetch = ActionDefinition::new("webpage", "fetch webpage (from) <url>", move |args| {
        record(&c, "webpage", args);
        Ok(Value::from(format!("content of {}", string_arg(args, 0)?)))
    });

    let c = Arc::clone(&calls);
    let save = ActionDefinition::new("store_file", "save <data> (to) file (named) <name>", move |args| {
        record(&c, "store_file", args);
        Ok(args[0].clone())
    });

    let c = Arc::clone(&calls);
    let say = ActionDefinition::new("say", "say hello to <name>", move |args| {
        record(&c, "say", args);
        Ok(Value::from(format!("hello, {}", args[0])))
    });

    let c = Arc::clone(&calls);
    let add = ActionDefinition::new("add", "add <a> plus <b>", move |args| {
        record(&c, "add", args);
        Ok(Value::Int(int_arg(args, 0)? + int_arg(args, 1)?))
    });

    let c = Arc::clone(&calls);
    let double = ActionDefinition::new("double", "double <x>", move |args| {
        record(&c, "double", args);
        Ok(Value::Int(int_arg(args, 0)? * 2))
    });

    let c = Arc::clone(&calls);
    let count = ActionDefinition::new("count", "count words in <text>", move |args| {
        record(&c, "count", args);
        let words = string_arg(args, 0)?.split_whitespace().count();
        Ok(Value::Int(i64::try_from(words).unwrap_or(i64::MAX)))
    });

    let c = Arc::clone(&calls);
    let fail = ActionDefinition::new("explode", "explode <reason>", move |args| {
        record(&c, "explode", args);
        Err(Error::action_failed("explode", "refused"))
    });

    let reports = engine
        .register_actions([fetch, save, say, add, double, count, fail])
        .unwrap();
    assert!(reports.iter().all(|r| r.is_registered()));

    (engine, calls)
}

/// Names of the recorded calls, in order.
pub fn call_names(calls: &Calls) -> Vec<String> {
    calls.lock().unwrap().iter().map(|(n, _)| n.clone()).collect()
}

/// Arguments of the `index`-th recorded call.
pub fn call_args(calls: &Calls, index: usize) -> Vec<Value> {
    calls.lock().unwrap()[index].1.clone()
}
