//! Canonical token identifiers and the token catalog.
//!
//! Surface words are interned to [`TokenId`]s so that signatures and trie
//! transitions compare integers rather than strings. Synonyms collapse onto
//! the identifier of their canonical token.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::synonyms::SynonymTable;

/// Canonical token identifier.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TokenId(pub(crate) u32);

impl TokenId {
    /// Returns the raw index of this token.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    // =========================================================================
    // Reserved Tokens
    // =========================================================================
    // These are always interned at startup with fixed indices, below every
    // identifier handed out to vocabulary.

    /// Parameter placeholder (`<name>` in a template).
    pub const PARAM: TokenId = TokenId(0);

    /// Reference to the previous action's result ("it", "them", ...).
    pub const LAST_RESULT: TokenId = TokenId(1);

    /// Discardable word (articles).
    pub const NULL: TokenId = TokenId(2);

    /// Conjunction that may end a command.
    pub const STOP: TokenId = TokenId(3);

    /// Word with no known classification.
    pub const UNKNOWN: TokenId = TokenId(4);

    /// Reference to a named variable.
    pub const VARIABLE: TokenId = TokenId(5);

    /// Number of reserved identifiers.
    pub const RESERVED_COUNT: u32 = 6;

    /// Returns true if this is one of the reserved sentinels.
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        self.0 < Self::RESERVED_COUNT
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::PARAM => f.write_str("TokenId(<param>)"),
            Self::LAST_RESULT => f.write_str("TokenId(<last-result>)"),
            Self::NULL => f.write_str("TokenId(<null>)"),
            Self::STOP => f.write_str("TokenId(<stop>)"),
            Self::UNKNOWN => f.write_str("TokenId(<unknown>)"),
            Self::VARIABLE => f.write_str("TokenId(<variable>)"),
            _ => write!(f, "TokenId({})", self.0),
        }
    }
}

/// Bidirectional map between surface tokens and [`TokenId`]s.
///
/// A surface listed in the synonym table resolves to its canonical token's
/// identifier instead of minting a new one. Not thread-safe; registration
/// happens before resolution traffic.
#[derive(Clone, Debug)]
pub struct TokenCatalog {
    /// Token text by index.
    tokens: Vec<Arc<str>>,
    /// Token text -> identifier.
    token_map: HashMap<Arc<str>, TokenId>,
    /// Synonym configuration.
    synonyms: SynonymTable,
}

impl TokenCatalog {
    /// Surface text of the reserved tokens, in index order.
    const RESERVED_TOKENS: &'static [&'static str] = &[
        "<param>",       // TokenId(0) = PARAM
        "<last-result>", // TokenId(1) = LAST_RESULT
        "<null>",        // TokenId(2) = NULL
        "<stop>",        // TokenId(3) = STOP
        "<unknown>",     // TokenId(4) = UNKNOWN
        "<variable>",    // TokenId(5) = VARIABLE
    ];

    /// Creates a catalog with no synonyms.
    #[must_use]
    pub fn new() -> Self {
        Self::with_synonyms(SynonymTable::new())
    }

    /// Creates a catalog that resolves surfaces through `synonyms`.
    #[must_use]
    pub fn with_synonyms(synonyms: SynonymTable) -> Self {
        let mut catalog = Self {
            tokens: Vec::new(),
            token_map: HashMap::new(),
            synonyms,
        };

        for (i, &text) in Self::RESERVED_TOKENS.iter().enumerate() {
            let id = catalog.mint(text);
            debug_assert_eq!(
                id.0 as usize, i,
                "Reserved token '{}' should have index {}, got {}",
                text, i, id.0
            );
        }

        catalog
    }

    fn mint(&mut self, text: &str) -> TokenId {
        let id = TokenId(u32::try_from(self.tokens.len()).expect("too many tokens"));
        let arc: Arc<str> = text.into();
        self.tokens.push(arc.clone());
        self.token_map.insert(arc, id);
        id
    }

    /// Returns the canonical text for a surface (itself if it is not a synonym).
    #[must_use]
    pub fn canonical_text<'a>(&'a self, surface: &'a str) -> &'a str {
        self.synonyms.canonical_for(surface).unwrap_or(surface)
    }

    /// Returns the identifier for `surface`, minting one on first sight.
    ///
    /// Synonyms resolve to their canonical token. Reserved sentinel text maps
    /// to the matching sentinel.
    ///
    /// # Panics
    ///
    /// Panics if the number of tokens exceeds `u32::MAX`.
    pub fn intern_or_lookup(&mut self, surface: &str) -> TokenId {
        let canonical = self.canonical_text(surface).to_string();
        if let Some(&id) = self.token_map.get(canonical.as_str()) {
            return id;
        }
        self.mint(&canonical)
    }

    /// Returns the identifier for `surface` without minting.
    #[must_use]
    pub fn lookup(&self, surface: &str) -> Option<TokenId> {
        self.token_map.get(self.canonical_text(surface)).copied()
    }

    /// Returns the text of a token.
    #[must_use]
    pub fn resolve(&self, id: TokenId) -> Option<&str> {
        self.tokens.get(id.0 as usize).map(AsRef::as_ref)
    }

    /// Returns the ordered surfaces that resolve to `id` (its text first).
    ///
    /// Tokens without a synonym entry have exactly one surface: their text.
    #[must_use]
    pub fn surfaces(&self, id: TokenId) -> Vec<String> {
        let Some(text) = self.resolve(id) else {
            return Vec::new();
        };
        match self.synonyms.synonyms_of(text) {
            Some(surfaces) => surfaces.to_vec(),
            None => vec![text.to_string()],
        }
    }

    /// Returns the synonym table.
    #[must_use]
    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    /// Returns the number of interned tokens, including reserved ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if no vocabulary token has been interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.len() == Self::RESERVED_TOKENS.len()
    }
}

impl Default for TokenCatalog {
    fn default() -> Self {
        Self::new()
    }
}
