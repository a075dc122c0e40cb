//! Integration tests for the token catalog
//!
//! Tests reserved sentinels, interning, and synonym-aware lookup.

use promethia_foundation::{SynonymTable, TokenCatalog, TokenId};

#[test]
fn reserved_sentinels_are_distinct() {
    let reserved = [
        TokenId::PARAM,
        TokenId::LAST_RESULT,
        TokenId::NULL,
        TokenId::STOP,
        TokenId::UNKNOWN,
        TokenId::VARIABLE,
    ];
    for (i, a) in reserved.iter().enumerate() {
        assert!(a.is_reserved());
        for b in &reserved[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn vocabulary_never_collides_with_sentinels() {
    let mut catalog = TokenCatalog::new();
    for word in ["save", "file", "param", "unknown", "stop", "null"] {
        let id = catalog.intern_or_lookup(word);
        assert!(!id.is_reserved(), "{word} minted a reserved id");
    }
}

#[test]
fn intern_then_resolve() {
    let mut catalog = TokenCatalog::new();
    let id = catalog.intern_or_lookup("webpage");
    assert_eq!(catalog.resolve(id), Some("webpage"));
    assert_eq!(catalog.intern_or_lookup("webpage"), id);
}

#[test]
fn resolve_unknown_id_is_none() {
    let mut other = TokenCatalog::new();
    let id = other.intern_or_lookup("elsewhere");
    let catalog = TokenCatalog::new();
    assert_eq!(catalog.resolve(id), None);
}

#[test]
fn synonyms_share_one_identifier() {
    let synonyms =
        SynonymTable::from_json_str(r#"{"save": ["store", "keep"], "from": ["at"]}"#).unwrap();
    let mut catalog = TokenCatalog::with_synonyms(synonyms);

    let store = catalog.intern_or_lookup("store");
    let save = catalog.intern_or_lookup("save");
    let keep = catalog.intern_or_lookup("keep");

    assert_eq!(store, save);
    assert_eq!(keep, save);
    assert_eq!(catalog.resolve(store), Some("save"));
    assert_eq!(catalog.surfaces(save), vec!["save", "store", "keep"]);
    assert_eq!(catalog.canonical_text("at"), "from");
}
