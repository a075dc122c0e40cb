//! Promethia - natural-language command resolution
//!
//! This crate re-exports all layers of the Promethia system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: promethia_parser     - Tokenizer, classifier, signature trie, resolution engine
//! Layer 0: promethia_foundation - Core types (Value, TokenId, Error, synonyms)
//! ```

pub use promethia_foundation as foundation;
pub use promethia_parser as parser;
