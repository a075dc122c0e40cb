//! Last-result and variable chaining tests.

use promethia_foundation::Value;

use crate::support::{call_args, call_names, engine};

// =============================================================================
// Pronouns
// =============================================================================

#[test]
fn pronoun_refers_to_previous_result() {
    let (engine, calls) = engine();
    let resolution = engine
        .resolve("fetch webpage at 'http://x' and save it to file 'y.txt'")
        .unwrap();

    assert_eq!(call_names(&calls), vec!["webpage", "store_file"]);
    assert_eq!(
        call_args(&calls, 1),
        vec![Value::from("content of http://x"), Value::from("y.txt")]
    );
    assert_eq!(resolution.executed[0].result, Value::from("content of http://x"));
}

#[test]
fn non_string_result_passes_through() {
    let (engine, calls) = engine();
    let resolution = engine
        .resolve("count words in 'one two three' and double it")
        .unwrap();

    assert_eq!(call_args(&calls, 1), vec![Value::Int(3)]);
    assert_eq!(resolution.last_result(), Some(&Value::Int(6)));
}

#[test]
fn pronoun_reads_result_of_earlier_sentence() {
    let (engine, calls) = engine();
    engine.resolve("add 20 plus 1").unwrap();
    engine.resolve("double it").unwrap();

    assert_eq!(call_args(&calls, 1), vec![Value::Int(21)]);
    assert_eq!(engine.context().last_result(), Value::Int(42));
}

#[test]
fn pronoun_before_any_action_is_nil() {
    let (engine, calls) = engine();
    engine.resolve("say hello to them").unwrap();
    assert_eq!(call_args(&calls, 0), vec![Value::Nil]);
}

// =============================================================================
// Variables
// =============================================================================

#[test]
fn variable_reference_supplies_its_value() {
    let (engine, calls) = engine();
    engine.context().variables().set("n", Value::Int(5));

    let resolution = engine.resolve("double n").unwrap();

    assert_eq!(call_args(&calls, 0), vec![Value::Int(5)]);
    assert_eq!(resolution.last_result(), Some(&Value::Int(10)));
}

#[test]
fn variable_executes_immediately_then_continues() {
    let (engine, calls) = engine();
    engine.context().variables().set("n", Value::Int(5));

    engine.resolve("double n add 1 plus 2").unwrap();
    assert_eq!(call_names(&calls), vec!["double", "add"]);
}

#[test]
fn variable_fills_a_middle_slot() {
    let (engine, calls) = engine();
    engine.context().variables().set("page", Value::from("<html/>"));

    engine.resolve("save page to file 'index.html'").unwrap();
    assert_eq!(
        call_args(&calls, 0),
        vec![Value::from("<html/>"), Value::from("index.html")]
    );
}

#[test]
fn quoted_variable_name_is_literal() {
    let (engine, calls) = engine();
    engine.context().variables().set("n", Value::Int(5));

    engine.resolve("say hello to 'n'").unwrap();
    assert_eq!(call_args(&calls, 0), vec![Value::from("n")]);
}
