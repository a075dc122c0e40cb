//! Synonym table loaded from configuration.
//!
//! Maps each canonical token text to the ordered list of surface words that
//! should resolve to it. The canonical text itself is always the first
//! surface of its own entry.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};

/// Canonical token text to surface synonyms.
///
/// Every surface maps to at most one canonical token. Adding a pair that is
/// already present is a no-op.
#[derive(Clone, Debug, Default)]
pub struct SynonymTable {
    /// Canonical text -> ordered surfaces (canonical first).
    entries: BTreeMap<String, Vec<String>>,
    /// Surface -> canonical text.
    owners: HashMap<String, String>,
}

impl SynonymTable {
    /// Creates an empty synonym table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a synonym table from JSON text.
    ///
    /// The document must be an object mapping canonical token text to an
    /// array of synonym strings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the JSON is malformed, and a synonym
    /// conflict if one surface is claimed by two canonical tokens.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::parse(json, None)
    }

    /// Loads a synonym table from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file is missing or malformed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::config(Some(path.to_path_buf()), e.to_string()))?;
        let table = Self::parse(&text, Some(path))?;
        info!(
            path = %path.display(),
            canonical_tokens = table.len(),
            "loaded synonym table"
        );
        Ok(table)
    }

    fn parse(json: &str, path: Option<&Path>) -> Result<Self> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(json)
            .map_err(|e| Error::config(path.map(Path::to_path_buf), e.to_string()))?;

        let mut table = Self::new();
        for (canonical, synonyms) in raw {
            table.add_canonical(&canonical)?;
            for synonym in synonyms {
                table.add(&canonical, &synonym)?;
            }
        }
        Ok(table)
    }

    /// Ensures `canonical` has an entry, owning its own text.
    ///
    /// # Errors
    ///
    /// Returns a synonym conflict if the text is already a synonym of a
    /// different canonical token.
    pub fn add_canonical(&mut self, canonical: &str) -> Result<()> {
        self.add(canonical, canonical)
    }

    /// Adds `synonym` as a surface of `canonical`.
    ///
    /// # Errors
    ///
    /// Returns a synonym conflict if `synonym` already belongs to a different
    /// canonical token.
    pub fn add(&mut self, canonical: &str, synonym: &str) -> Result<()> {
        if let Some(owner) = self.owners.get(synonym) {
            if owner == canonical {
                return Ok(());
            }
            return Err(Error::synonym_conflict(synonym, owner.clone(), canonical));
        }

        if canonical != synonym && !self.entries.contains_key(canonical) {
            self.add_canonical(canonical)?;
        }

        self.owners.insert(synonym.to_string(), canonical.to_string());
        self.entries
            .entry(canonical.to_string())
            .or_default()
            .push(synonym.to_string());
        Ok(())
    }

    /// Returns the canonical text a surface resolves to, if it is listed.
    #[must_use]
    pub fn canonical_for(&self, surface: &str) -> Option<&str> {
        self.owners.get(surface).map(String::as_str)
    }

    /// Returns the ordered surfaces of a canonical token (canonical first).
    #[must_use]
    pub fn synonyms_of(&self, canonical: &str) -> Option<&[String]> {
        self.entries.get(canonical).map(Vec::as_slice)
    }

    /// Returns the number of canonical tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(canonical, surfaces)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(canonical, surfaces)| (canonical.as_str(), surfaces.as_slice()))
    }

    /// Merges every entry of `other` into this table.
    ///
    /// # Errors
    ///
    /// Returns a synonym conflict if the tables disagree about a surface.
    pub fn merge(&mut self, other: &SynonymTable) -> Result<()> {
        for (canonical, surfaces) in other.iter() {
            for surface in surfaces {
                self.add(canonical, surface)?;
            }
        }
        Ok(())
    }
}
