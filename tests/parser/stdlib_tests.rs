//! Standard variable action tests.

use promethia_foundation::Value;
use promethia_parser::stdlib::{default_synonyms, register_variable_actions};
use promethia_parser::{EngineConfig, ResolutionEngine};

fn engine() -> ResolutionEngine {
    let mut engine = ResolutionEngine::new(EngineConfig::default(), default_synonyms().unwrap());
    register_variable_actions(&mut engine).unwrap();
    engine
}

#[test]
fn stored_variable_is_read_back() {
    let engine = engine();
    engine.resolve("save 'blue' to variable named 'color'").unwrap();

    let resolution = engine.resolve("get value from variable named 'color'").unwrap();
    assert_eq!(resolution.last_result(), Some(&Value::from("blue")));
}

#[test]
fn stored_variable_is_referenced_by_name() {
    let engine = engine();
    engine.resolve("save 'blue' to variable named 'color'").unwrap();
    engine.resolve("save color to variable named 'copy'").unwrap();

    assert_eq!(
        engine.context().variables().get("copy"),
        Some(Value::from("blue"))
    );
}

#[test]
fn bare_variable_name_is_read_back() {
    let engine = engine();
    engine.resolve("save 'happy' to variable named mood").unwrap();
    assert!(engine.context().variables().exists("mood"));

    let resolution = engine.resolve("get variable named mood").unwrap();
    assert_eq!(resolution.last_result(), Some(&Value::from("happy")));
}

#[test]
fn reassignment_overwrites_bare_name() {
    let engine = engine();
    engine.resolve("save 5 to variable named mood").unwrap();
    engine.resolve("save 6 to variable named mood").unwrap();

    assert_eq!(engine.context().variables().names(), vec!["mood".to_string()]);
    assert_eq!(
        engine.context().variables().get("mood"),
        Some(Value::from("6"))
    );
}

#[test]
fn get_then_save_chains_through_last_result() {
    let engine = engine();
    engine.context().variables().set("answer", Value::Int(42));

    let resolution = engine
        .resolve("get variable named 'answer' and save it to variable named 'copy'")
        .unwrap();

    assert_eq!(resolution.executed.len(), 2);
    assert_eq!(
        engine.context().variables().get("copy"),
        Some(Value::Int(42))
    );
}

#[test]
fn shared_context_is_visible_to_host() {
    let context = std::sync::Arc::new(promethia_parser::ResolutionContext::new());
    let mut engine = ResolutionEngine::new(EngineConfig::default(), default_synonyms().unwrap())
        .with_context(std::sync::Arc::clone(&context));
    register_variable_actions(&mut engine).unwrap();

    engine.resolve("store 7 var called 'week'").unwrap();
    assert_eq!(context.variables().get("week"), Some(Value::from("7")));
}
