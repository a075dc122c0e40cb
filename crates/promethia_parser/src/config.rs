//! Configuration for the resolution engine.

use std::path::Path;

use promethia_foundation::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Configuration for classification and resolution.
///
/// Loaded from JSON; every field is optional and falls back to the default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum squared L2 distance for an embedding match to count.
    pub similarity_threshold: f32,

    /// Number of neighbors retrieved per nearest-neighbor query.
    pub neighbors: usize,

    /// Dimension of the built-in embedder's vectors.
    pub embedding_dim: usize,

    /// Whether word matching respects case.
    pub case_sensitive: bool,

    /// Words that refer to the previous action's result.
    pub pronouns: Vec<String>,

    /// Words discarded outside of parameters.
    pub articles: Vec<String>,

    /// Words that may separate two commands in one sentence.
    pub conjunctions: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.75,
            neighbors: 3,
            embedding_dim: 384,
            case_sensitive: false,
            pronouns: to_strings(&[
                "it", "he", "she", "they", "them", "him", "her", "his", "hers", "its", "their",
                "theirs",
            ]),
            articles: to_strings(&["the", "a", "an"]),
            conjunctions: to_strings(&["and", "then"]),
        }
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

impl EngineConfig {
    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the JSON is malformed or a value is
    /// out of range.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::config(None, e.to_string()))?;
        config.validate(None)?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file is missing or malformed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::config(Some(path.to_path_buf()), e.to_string()))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| Error::config(Some(path.to_path_buf()), e.to_string()))?;
        config.validate(Some(path))?;
        info!(path = %path.display(), "loaded engine configuration");
        Ok(config)
    }

    fn validate(&self, path: Option<&Path>) -> Result<()> {
        let fail = |message: &str| Err(Error::config(path.map(Path::to_path_buf), message));
        if !self.similarity_threshold.is_finite() || self.similarity_threshold < 0.0 {
            return fail("similarity_threshold must be a non-negative number");
        }
        if self.neighbors == 0 {
            return fail("neighbors must be at least 1");
        }
        if self.embedding_dim == 0 {
            return fail("embedding_dim must be at least 1");
        }
        Ok(())
    }

    /// Builder method to set the similarity threshold.
    #[must_use]
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Builder method to set the neighbor count.
    #[must_use]
    pub fn with_neighbors(mut self, neighbors: usize) -> Self {
        self.neighbors = neighbors;
        self
    }

    /// Builder method to set the built-in embedder's dimension.
    #[must_use]
    pub fn with_embedding_dim(mut self, dim: usize) -> Self {
        self.embedding_dim = dim;
        self
    }

    /// Builder method to enable/disable case-sensitive matching.
    #[must_use]
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Builder method to replace the pronoun list.
    #[must_use]
    pub fn with_pronouns(mut self, pronouns: &[&str]) -> Self {
        self.pronouns = to_strings(pronouns);
        self
    }

    /// Builder method to replace the article list.
    #[must_use]
    pub fn with_articles(mut self, articles: &[&str]) -> Self {
        self.articles = to_strings(articles);
        self
    }

    /// Builder method to replace the conjunction list.
    #[must_use]
    pub fn with_conjunctions(mut self, conjunctions: &[&str]) -> Self {
        self.conjunctions = to_strings(conjunctions);
        self
    }
}
