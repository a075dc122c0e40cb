//! Phrase template compilation.
//!
//! A template such as `save <data> (to) file (named) <name>` is a sequence of
//! whitespace-separated words. A word wrapped in `( )` is optional and a word
//! wrapped in `< >` is a parameter placeholder. Compiling a template with k
//! optional words yields one [`Signature`] per subset of included optional
//! words, 2^k in total before deduplication.

use std::collections::HashSet;

use promethia_foundation::{TokenCatalog, TokenId};
use tracing::warn;

/// Most optional words a template may carry. Past this the expansion is
/// refused and the template compiles to no signatures.
pub const MAX_OPTIONAL_WORDS: usize = 16;

/// What a template word stands for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateWordKind {
    /// A literal word matched through the token catalog
    Fixed(String),
    /// A parameter placeholder with its formal name
    Parameter(String),
}

/// One word of a parsed template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateWord {
    /// Literal or placeholder
    pub kind: TemplateWordKind,
    /// Whether the word was wrapped in parentheses
    pub optional: bool,
}

impl TemplateWord {
    /// Returns true if this word is a parameter placeholder.
    #[must_use]
    pub const fn is_parameter(&self) -> bool {
        matches!(self.kind, TemplateWordKind::Parameter(_))
    }
}

/// Parses a template into its words.
///
/// Punctuation other than the four delimiters `( ) < >` is stripped; words
/// left empty by stripping are dropped.
#[must_use]
pub fn parse_template(template: &str) -> Vec<TemplateWord> {
    let cleaned: String = template
        .chars()
        .filter(|c| {
            c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '(' | ')' | '<' | '>')
        })
        .collect();

    cleaned.split_whitespace().filter_map(parse_word).collect()
}

fn parse_word(raw: &str) -> Option<TemplateWord> {
    let (body, optional) = match raw.strip_prefix('(').and_then(|w| w.strip_suffix(')')) {
        Some(inner) => (inner, true),
        None => (raw, false),
    };

    let kind = match body.strip_prefix('<').and_then(|w| w.strip_suffix('>')) {
        Some(name) => TemplateWordKind::Parameter(name.to_string()),
        None => {
            // Stray delimiters left over from unbalanced brackets
            let text: String = body.chars().filter(|c| !"()<>".contains(*c)).collect();
            if text.is_empty() {
                return None;
            }
            TemplateWordKind::Fixed(text)
        }
    };

    Some(TemplateWord { kind, optional })
}

/// An ordered sequence of canonical tokens one template can match.
pub type Signature = Vec<TokenId>;

/// One signature together with the parameters it carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledSignature {
    /// The token sequence; placeholders appear as [`TokenId::PARAM`]
    pub tokens: Signature,
    /// For each placeholder in `tokens`, its index in the template's
    /// parameter list
    pub slots: Vec<usize>,
}

/// The result of compiling one template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledTemplate {
    /// The parsed template words
    pub words: Vec<TemplateWord>,
    /// Distinct signatures, all-optional-included first
    pub signatures: Vec<CompiledSignature>,
    /// Placeholder names in template order
    pub params: Vec<String>,
}

impl CompiledTemplate {
    /// Returns true if the template has at least one literal word.
    ///
    /// A template made only of placeholders can never be entered from the
    /// trie root.
    #[must_use]
    pub fn has_fixed_word(&self) -> bool {
        self.words.iter().any(|w| !w.is_parameter())
    }

    /// Returns the distinct literal tokens used by the signatures.
    #[must_use]
    pub fn fixed_tokens(&self) -> Vec<TokenId> {
        let mut tokens: Vec<TokenId> = Vec::new();
        for signature in &self.signatures {
            for &token in &signature.tokens {
                if token != TokenId::PARAM && !tokens.contains(&token) {
                    tokens.push(token);
                }
            }
        }
        tokens
    }
}

/// Compiles templates into signatures.
#[derive(Clone, Debug, Default)]
pub struct SignatureCompiler {
    case_sensitive: bool,
}

impl SignatureCompiler {
    /// Creates a compiler that case-folds literal words.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to keep the case of literal words.
    #[must_use]
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Compiles a template, interning its literal words in `catalog`.
    ///
    /// Literal words resolve through the catalog's synonym table, optional
    /// or not. Identical token sequences produced by different subsets are
    /// kept once. A template with more than [`MAX_OPTIONAL_WORDS`] optional
    /// words yields no signatures.
    pub fn compile(&self, template: &str, catalog: &mut TokenCatalog) -> CompiledTemplate {
        let words = parse_template(template);

        let mut params = Vec::new();
        // (token, parameter index if placeholder)
        let mut resolved: Vec<(TokenId, Option<usize>)> = Vec::with_capacity(words.len());
        for word in &words {
            match &word.kind {
                TemplateWordKind::Fixed(text) => {
                    let token = if self.case_sensitive {
                        catalog.intern_or_lookup(text)
                    } else {
                        catalog.intern_or_lookup(&text.to_lowercase())
                    };
                    resolved.push((token, None));
                }
                TemplateWordKind::Parameter(name) => {
                    resolved.push((TokenId::PARAM, Some(params.len())));
                    params.push(name.clone());
                }
            }
        }

        let optional: Vec<usize> = words
            .iter()
            .enumerate()
            .filter(|(_, w)| w.optional)
            .map(|(i, _)| i)
            .collect();

        let mut signatures: Vec<CompiledSignature> = Vec::new();
        if optional.len() > MAX_OPTIONAL_WORDS {
            warn!(
                template,
                optional = optional.len(),
                limit = MAX_OPTIONAL_WORDS,
                "too many optional words; template not expanded"
            );
            return CompiledTemplate {
                words,
                signatures,
                params,
            };
        }

        let mut seen: HashSet<Signature> = HashSet::new();
        // Bit i of `excluded` drops the i-th optional word; 0 includes all.
        for excluded in 0..(1_u32 << optional.len()) {
            let mut tokens = Vec::with_capacity(resolved.len());
            let mut slots = Vec::new();
            for (position, &(token, param)) in resolved.iter().enumerate() {
                let skipped = optional
                    .iter()
                    .position(|&o| o == position)
                    .is_some_and(|bit| excluded & (1 << bit) != 0);
                if skipped {
                    continue;
                }
                tokens.push(token);
                if let Some(index) = param {
                    slots.push(index);
                }
            }

            if seen.insert(tokens.clone()) {
                signatures.push(CompiledSignature { tokens, slots });
            }
        }

        CompiledTemplate {
            words,
            signatures,
            params,
        }
    }
}
