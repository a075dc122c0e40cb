//! Template compilation and trie construction tests.

use promethia_foundation::{SynonymTable, TokenCatalog, TokenId, Value};
use promethia_parser::signature::TemplateWordKind;
use promethia_parser::{ActionDefinition, EngineConfig, ResolutionEngine, SignatureCompiler};
use proptest::prelude::*;

#[test]
fn template_words_are_classified() {
    let words = promethia_parser::parse_template("get (value) (from) variable (named) <name>");

    assert_eq!(words.len(), 6);
    assert_eq!(words.iter().filter(|w| w.optional).count(), 3);
    assert_eq!(
        words[5].kind,
        TemplateWordKind::Parameter("name".to_string())
    );
}

#[test]
fn all_excluded_signature_is_present() {
    let mut catalog = TokenCatalog::new();
    let compiled =
        SignatureCompiler::new().compile("get (value) (from) variable (named) <name>", &mut catalog);

    let get = catalog.lookup("get").unwrap();
    let variable = catalog.lookup("variable").unwrap();
    assert_eq!(compiled.signatures.len(), 8);
    assert!(
        compiled
            .signatures
            .iter()
            .any(|s| s.tokens == vec![get, variable, TokenId::PARAM])
    );
}

#[test]
fn optional_synonyms_share_canonical_token() {
    let synonyms = SynonymTable::from_json_str(r#"{"from": ["at"]}"#).unwrap();
    let mut catalog = TokenCatalog::with_synonyms(synonyms);
    let compiler = SignatureCompiler::new();

    let a = compiler.compile("fetch webpage (from) <url>", &mut catalog);
    let b = compiler.compile("fetch webpage (at) <url>", &mut catalog);

    assert_eq!(a.signatures, b.signatures);
}

#[test]
fn registration_builds_shared_prefixes() {
    let mut engine = ResolutionEngine::new(EngineConfig::default(), SynonymTable::new());
    engine
        .register_actions([
            ActionDefinition::new("store_file", "save <data> (to) file <name>", |_| Ok(Value::Nil)),
            ActionDefinition::new("store_variable", "save <data> (to) variable <name>", |_| {
                Ok(Value::Nil)
            }),
        ])
        .unwrap();

    let signatures = engine.trie().signatures();
    assert_eq!(signatures.len(), 4);

    // root, save, <param>, to, file, <param>, variable, <param>, file, <param>, variable, <param>
    assert_eq!(engine.trie().len(), 12);
}

#[test]
fn template_parameter_names_become_action_params() {
    let mut engine = ResolutionEngine::new(EngineConfig::default(), SynonymTable::new());
    engine
        .register_action(ActionDefinition::new("add", "add <left> plus <right>", |_| {
            Ok(Value::Nil)
        }))
        .unwrap();

    assert_eq!(engine.actions()[0].params, vec!["left", "right"]);
}

proptest! {
    #[test]
    fn compile_produces_two_to_the_k_signatures(
        words in prop::collection::vec(("[a-z]{3,8}", any::<bool>(), any::<bool>()), 1..6),
    ) {
        // Suffix each word with its position so literals never repeat
        let template: Vec<String> = words
            .iter()
            .enumerate()
            .map(|(i, (word, optional, param))| {
                let word = if *param { format!("<{word}{i}>") } else { format!("{word}{i}") };
                if *optional { format!("({word})") } else { word }
            })
            .collect();
        let template = template.join(" ");
        let k = words.iter().filter(|(_, optional, _)| *optional).count();

        let mut catalog = TokenCatalog::new();
        let compiled = SignatureCompiler::new().compile(&template, &mut catalog);

        // Optional placeholders can coincide once their neighbours drop out,
        // so only literal-only templates are guaranteed distinct.
        if words.iter().all(|(_, _, param)| !*param) {
            prop_assert_eq!(compiled.signatures.len(), 1 << k);
        } else {
            prop_assert!(compiled.signatures.len() <= 1 << k);
        }
        for signature in &compiled.signatures {
            prop_assert!(signature.tokens.len() <= words.len());
            prop_assert_eq!(
                signature.slots.len(),
                signature.tokens.iter().filter(|&&t| t == TokenId::PARAM).count()
            );
        }

        let required = words.iter().filter(|(_, optional, _)| !*optional).count();
        prop_assert!(compiled.signatures.iter().any(|s| s.tokens.len() == required));
    }
}
