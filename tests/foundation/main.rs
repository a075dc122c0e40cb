//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, TokenId, TokenCatalog, SynonymTable, and Error.

mod synonyms;
mod tokens;
