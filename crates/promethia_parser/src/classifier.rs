//! Semantic word classification.
//!
//! Maps an input word to a canonical token: first through the configured
//! special word classes, then by exact exemplar match, then by nearest
//! exemplar in embedding space.

use std::collections::{HashMap, HashSet};
use std::fmt;

use promethia_foundation::{Result, TokenId};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::embedding::{Embedder, FlatL2Index, TrigramEmbedder, VectorIndex};

/// An exemplar phrase indexed for a canonical token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exemplar {
    /// The token this phrase stands for
    pub token: TokenId,
    /// The phrase text as registered
    pub phrase: String,
}

/// Classifies words into canonical tokens.
///
/// Classification is a pure function of the word and the index contents.
pub struct SemanticClassifier {
    embedder: Box<dyn Embedder>,
    index: Box<dyn VectorIndex>,
    /// Exemplars in index insertion order
    exemplars: Vec<Exemplar>,
    /// Folded exemplar text -> token, for exact matches
    exact: HashMap<String, TokenId>,
    threshold: f32,
    neighbors: usize,
    case_sensitive: bool,
    pronouns: HashSet<String>,
    articles: HashSet<String>,
    conjunctions: HashSet<String>,
}

impl fmt::Debug for SemanticClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemanticClassifier")
            .field("exemplars", &self.exemplars.len())
            .field("threshold", &self.threshold)
            .field("neighbors", &self.neighbors)
            .field("case_sensitive", &self.case_sensitive)
            .finish_non_exhaustive()
    }
}

impl SemanticClassifier {
    /// Creates a classifier using the built-in [`TrigramEmbedder`].
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        let embedder = TrigramEmbedder::new(config.embedding_dim)
            .with_case_sensitive(config.case_sensitive);
        Self::with_embedder(config, Box::new(embedder))
    }

    /// Creates a classifier over a caller-supplied embedder and a flat index.
    #[must_use]
    pub fn with_embedder(config: &EngineConfig, embedder: Box<dyn Embedder>) -> Self {
        let index = Box::new(FlatL2Index::new(embedder.dim()));
        let case_sensitive = config.case_sensitive;
        let fold_all = |words: &[String]| -> HashSet<String> {
            words.iter().map(|w| fold(w, case_sensitive)).collect()
        };

        Self {
            embedder,
            index,
            exemplars: Vec::new(),
            exact: HashMap::new(),
            threshold: config.similarity_threshold,
            neighbors: config.neighbors,
            case_sensitive,
            pronouns: fold_all(&config.pronouns),
            articles: fold_all(&config.articles),
            conjunctions: fold_all(&config.conjunctions),
        }
    }

    /// Replaces the vector index, re-adding every exemplar to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the new index rejects the embedder's vectors.
    pub fn with_index(mut self, index: Box<dyn VectorIndex>) -> Result<Self> {
        self.index = index;
        self.rebuild()?;
        Ok(self)
    }

    /// Indexes exemplar phrases for a token.
    ///
    /// Phrases already indexed for the same token are skipped. A phrase that
    /// is already an exemplar of another token keeps its first owner for
    /// exact matching.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedder fails or produces vectors the index
    /// rejects.
    pub fn add_token<S: AsRef<str>>(&mut self, token: TokenId, exemplars: &[S]) -> Result<()> {
        for phrase in exemplars {
            let phrase = phrase.as_ref();
            if self
                .exemplars
                .iter()
                .any(|e| e.token == token && e.phrase == phrase)
            {
                continue;
            }

            let vector = self.embedder.embed(phrase)?;
            self.index.add(vector)?;
            self.exemplars.push(Exemplar {
                token,
                phrase: phrase.to_string(),
            });

            let key = fold(phrase, self.case_sensitive);
            if let Some(owner) = self.exact.get(&key) {
                if *owner != token {
                    debug!(phrase, ?owner, ?token, "exemplar already owned by another token");
                }
            } else {
                self.exact.insert(key, token);
            }
        }
        Ok(())
    }

    /// Removes every exemplar of a token and rebuilds the index.
    ///
    /// # Errors
    ///
    /// Returns an error if re-embedding the remaining exemplars fails.
    pub fn remove_token(&mut self, token: TokenId) -> Result<()> {
        self.exemplars.retain(|e| e.token != token);
        self.rebuild()
    }

    fn rebuild(&mut self) -> Result<()> {
        self.index.clear();
        self.exact.clear();
        for exemplar in &self.exemplars {
            let vector = self.embedder.embed(&exemplar.phrase)?;
            self.index.add(vector)?;
            self.exact
                .entry(fold(&exemplar.phrase, self.case_sensitive))
                .or_insert(exemplar.token);
        }
        Ok(())
    }

    /// Classifies a word.
    ///
    /// Returns [`TokenId::LAST_RESULT`] for pronouns, [`TokenId::NULL`] for
    /// articles, [`TokenId::STOP`] for conjunctions, and
    /// [`TokenId::UNKNOWN`] for quoted literals, words without letters, and
    /// words too far from every exemplar.
    #[must_use]
    pub fn classify(&self, word: &str) -> TokenId {
        if let Some(special) = self.special(word) {
            return special;
        }

        if is_literal(word) {
            return TokenId::UNKNOWN;
        }

        let key = fold(word, self.case_sensitive);
        if let Some(&token) = self.exact.get(&key) {
            return token;
        }

        self.nearest(word).unwrap_or(TokenId::UNKNOWN)
    }

    /// Returns the special classification of a word, if it has one.
    #[must_use]
    pub fn special(&self, word: &str) -> Option<TokenId> {
        let key = fold(word, self.case_sensitive);
        if self.pronouns.contains(&key) {
            Some(TokenId::LAST_RESULT)
        } else if self.articles.contains(&key) {
            Some(TokenId::NULL)
        } else if self.conjunctions.contains(&key) {
            Some(TokenId::STOP)
        } else {
            None
        }
    }

    fn nearest(&self, word: &str) -> Option<TokenId> {
        if self.index.is_empty() {
            return None;
        }

        let hits = match self
            .embedder
            .embed(word)
            .and_then(|vector| self.index.search(&vector, self.neighbors))
        {
            Ok(hits) => hits,
            Err(e) => {
                warn!(word, error = %e, "embedding lookup failed; treating word as unknown");
                return None;
            }
        };

        let best = hits.first()?;
        let exemplar = &self.exemplars[best.id];
        if best.distance < self.threshold {
            debug!(
                word,
                exemplar = %exemplar.phrase,
                distance = best.distance,
                "classified by nearest exemplar"
            );
            Some(exemplar.token)
        } else {
            debug!(
                word,
                nearest = %exemplar.phrase,
                distance = best.distance,
                "no exemplar within threshold"
            );
            None
        }
    }

    /// Returns the indexed exemplars in insertion order.
    #[must_use]
    pub fn exemplars(&self) -> &[Exemplar] {
        &self.exemplars
    }

    /// Returns true if a token has at least one exemplar.
    #[must_use]
    pub fn contains_token(&self, token: TokenId) -> bool {
        self.exemplars.iter().any(|e| e.token == token)
    }

    /// Returns true if the word is a configured pronoun.
    #[must_use]
    pub fn is_pronoun(&self, word: &str) -> bool {
        self.pronouns.contains(&fold(word, self.case_sensitive))
    }

    /// Returns true if the word is a configured article.
    #[must_use]
    pub fn is_article(&self, word: &str) -> bool {
        self.articles.contains(&fold(word, self.case_sensitive))
    }

    /// Returns true if the word is a configured conjunction.
    #[must_use]
    pub fn is_conjunction(&self, word: &str) -> bool {
        self.conjunctions.contains(&fold(word, self.case_sensitive))
    }
}

fn fold(word: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        word.to_string()
    } else {
        word.to_lowercase()
    }
}

/// Quoted literals and words without letters are never classified.
pub(crate) fn is_literal(word: &str) -> bool {
    word.starts_with(['"', '\'']) || !word.chars().any(char::is_alphabetic)
}
