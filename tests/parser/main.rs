//! Integration tests for Layer 1: the promethia_parser crate.
//!
//! Tests for the command resolution pipeline:
//! - Template compilation
//! - Word classification
//! - Sentence resolution and command splitting
//! - Last-result and variable chaining
//! - Standard variable actions

mod classifier_tests;
mod compiler_tests;
mod chaining_tests;
mod stdlib_tests;
mod support;
