//! Core values, errors, and token identifiers for Promethia.
//!
//! This crate provides:
//! - [`Value`] - The value type passed to and returned from actions
//! - [`TokenId`] - Canonical token identifiers with reserved sentinels
//! - [`TokenCatalog`] - Surface word to token interning, synonym-aware
//! - [`SynonymTable`] - Canonical token to synonym configuration
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod synonyms;
pub mod token;
pub mod value;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use synonyms::SynonymTable;
pub use token::{TokenCatalog, TokenId};
pub use value::Value;
