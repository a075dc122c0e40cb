//! Integration tests for the synonym table
//!
//! Tests JSON loading, idempotent insertion, and conflict detection.

use std::io::Write;

use promethia_foundation::{ErrorKind, SynonymTable};

#[test]
fn load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"fetch": ["download", "grab"], "webpage": ["site"]}}"#).unwrap();

    let table = SynonymTable::from_json_file(file.path()).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.canonical_for("grab"), Some("fetch"));
    assert_eq!(
        table.synonyms_of("fetch").unwrap(),
        ["fetch", "download", "grab"]
    );
}

#[test]
fn missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SynonymTable::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Config { path: Some(_), .. }));
}

#[test]
fn malformed_json_is_config_error() {
    let err = SynonymTable::from_json_str(r#"{"fetch": "download"}"#).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Config { .. }));
}

#[test]
fn surface_claimed_twice_is_conflict() {
    let err = SynonymTable::from_json_str(r#"{"get": ["grab"], "take": ["grab"]}"#).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SynonymConflict { .. }));
}

#[test]
fn adding_existing_pair_is_noop() {
    let mut table = SynonymTable::new();
    table.add("from", "at").unwrap();
    table.add("from", "at").unwrap();
    table.add_canonical("from").unwrap();

    assert_eq!(table.synonyms_of("from").unwrap(), ["from", "at"]);
}

#[test]
fn merge_combines_tables() {
    let mut base = SynonymTable::from_json_str(r#"{"save": ["store"]}"#).unwrap();
    let extra = SynonymTable::from_json_str(r#"{"save": ["keep"], "file": ["document"]}"#).unwrap();
    base.merge(&extra).unwrap();

    assert_eq!(base.len(), 2);
    assert_eq!(base.canonical_for("keep"), Some("save"));
    let pairs: Vec<&str> = base.iter().map(|(canonical, _)| canonical).collect();
    assert_eq!(pairs, vec!["file", "save"]);
}
