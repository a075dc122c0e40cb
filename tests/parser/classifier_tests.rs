//! Word classification tests.

use promethia_foundation::{Result, TokenCatalog, TokenId, Value};
use promethia_parser::{
    ActionDefinition, Embedder, EngineConfig, ResolutionEngine, SemanticClassifier,
};
use proptest::prelude::*;

use crate::support::{call_names, engine};

/// One-hot on the first letter: words sharing an initial are identical.
struct InitialEmbedder;

impl Embedder for InitialEmbedder {
    fn dim(&self) -> usize {
        26
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0; 26];
        if let Some(c) = text.chars().next().filter(char::is_ascii_lowercase) {
            vector[(c as u8 - b'a') as usize] = 1.0;
        }
        Ok(vector)
    }
}

#[test]
fn special_classes() {
    let (engine, _) = engine();
    let classifier = engine.classifier();

    assert_eq!(classifier.classify("it"), TokenId::LAST_RESULT);
    assert_eq!(classifier.classify("them"), TokenId::LAST_RESULT);
    assert_eq!(classifier.classify("an"), TokenId::NULL);
    assert_eq!(classifier.classify("then"), TokenId::STOP);
}

#[test]
fn literals_and_numbers_are_unknown() {
    let (engine, _) = engine();
    let classifier = engine.classifier();

    assert_eq!(classifier.classify("'save'"), TokenId::UNKNOWN);
    assert_eq!(classifier.classify("2024"), TokenId::UNKNOWN);
}

#[test]
fn synonyms_are_exemplars() {
    let (engine, _) = engine();
    let from = engine.catalog().lookup("from").unwrap();
    assert_eq!(engine.classifier().classify("at"), from);
    assert_eq!(engine.classifier().classify("AT"), from);
}

#[test]
fn remove_token_forgets_exemplars() {
    let mut catalog = TokenCatalog::new();
    let mut classifier = SemanticClassifier::new(&EngineConfig::default());
    let webpage = catalog.intern_or_lookup("webpage");
    let file = catalog.intern_or_lookup("file");
    classifier.add_token(webpage, &["webpage", "site"]).unwrap();
    classifier.add_token(file, &["file"]).unwrap();

    assert_eq!(classifier.classify("webpages"), webpage);
    classifier.remove_token(webpage).unwrap();
    assert_eq!(classifier.classify("webpages"), TokenId::UNKNOWN);
    assert_eq!(classifier.classify("file"), file);
}

#[test]
fn wrong_dimension_embedder_is_rejected() {
    let mut catalog = TokenCatalog::new();
    let mut classifier = SemanticClassifier::with_embedder(
        &EngineConfig::default(),
        Box::new(InitialEmbedder),
    )
    .with_index(Box::new(promethia_parser::FlatL2Index::new(3)))
    .unwrap();

    let save = catalog.intern_or_lookup("save");
    assert!(classifier.add_token(save, &["save"]).is_err());
}

#[test]
fn custom_embedder_drives_resolution() {
    let calls = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let recorded = std::sync::Arc::clone(&calls);

    let mut engine = ResolutionEngine::new(EngineConfig::default(), Default::default())
        .with_embedder(Box::new(InitialEmbedder))
        .unwrap();
    engine
        .register_action(ActionDefinition::new("launch", "launch <target>", move |args| {
            recorded.lock().unwrap().push(args[0].clone());
            Ok(Value::Nil)
        }))
        .unwrap();

    // "lunch" shares the initial of "launch"; "rocket" shares nothing
    engine.resolve("lunch rocket").unwrap();
    assert_eq!(*calls.lock().unwrap(), vec![Value::from("rocket")]);
}

#[test]
fn thresholds_come_from_config() {
    let strict = EngineConfig::default().with_similarity_threshold(0.0);
    let mut catalog = TokenCatalog::new();
    let mut classifier = SemanticClassifier::new(&strict);
    let webpage = catalog.intern_or_lookup("webpage");
    classifier.add_token(webpage, &["webpage"]).unwrap();

    assert_eq!(classifier.classify("webpage"), webpage);
    assert_eq!(classifier.classify("webpages"), TokenId::UNKNOWN);
}

#[test]
fn conjunction_list_is_configurable() {
    let config = EngineConfig::default().with_conjunctions(&["and"]);
    let classifier = SemanticClassifier::new(&config);
    assert_eq!(classifier.classify("and"), TokenId::STOP);
    assert_eq!(classifier.classify("then"), TokenId::UNKNOWN);
}

#[test]
fn unmatched_words_do_not_fire_actions() {
    let (engine, calls) = engine();
    engine.resolve("quux frobnicate zork").unwrap();
    assert!(call_names(&calls).is_empty());
}

proptest! {
    #[test]
    fn classify_is_deterministic(word in "[a-zA-Z0-9']{1,12}") {
        let (engine, _) = engine();
        let first = engine.classifier().classify(&word);
        for _ in 0..5 {
            prop_assert_eq!(engine.classifier().classify(&word), first);
        }
    }
}
