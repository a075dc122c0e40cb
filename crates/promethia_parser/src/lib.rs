//! Command resolution engine for natural-language sentences.
//!
//! This crate turns input like "fetch webpage at 'http://x' and save it to
//! file 'y.txt'" into calls against registered actions, each declared with a
//! phrase template such as `save <data> (to) file (named) <name>`.
//!
//! # Architecture
//!
//! ```text
//! "save 'hello' to file named 'out.txt'"
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   TOKENIZER     │  → [save, 'hello', to, file, named, 'out.txt']
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ SEMANTIC        │  → [Token(save), Unknown, Token(to), Token(file), ...]
//! │ CLASSIFIER      │
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ SIGNATURE TRIE  │  → save <param> to file named <param>
//! │ WALK            │
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ ACTION          │  → store_file("hello", "out.txt"), result kept as last-result
//! │ EXECUTION       │
//! └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`tokenizer`] - Convert raw input to words and quoted literals
//! - [`config`] - Engine configuration loaded from JSON
//! - [`embedding`] - Embedding provider and nearest-neighbor index seams
//! - [`classifier`] - Word to canonical token classification
//! - [`signature`] - Template parsing and signature expansion
//! - [`trie`] - Prefix tree over signatures
//! - [`action`] - Action definitions and argument helpers
//! - [`context`] - Shared variables and last-result slot
//! - [`engine`] - The resolution state machine
//! - [`stdlib`] - Variable store actions

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod action;
pub mod classifier;
pub mod config;
pub mod context;
pub mod embedding;
pub mod engine;
pub mod signature;
pub mod stdlib;
pub mod tokenizer;
pub mod trie;

// Re-export main types for convenience
pub use action::{ActionBinding, ActionDefinition, ActionFn, RegistrationReport};
pub use classifier::SemanticClassifier;
pub use config::EngineConfig;
pub use context::{MemoryVariables, ResolutionContext, VariableStore};
pub use embedding::{Embedder, FlatL2Index, Neighbor, TrigramEmbedder, VectorIndex};
pub use engine::{ExecutedAction, ParameterCapture, Resolution, ResolutionEngine};
pub use signature::{CompiledTemplate, Signature, SignatureCompiler, TemplateWord, parse_template};
pub use tokenizer::{InputToken, InputTokenizer};
pub use trie::{NodeId, SignatureTrie, TrieNode};
