//! The resolution engine.
//!
//! Walks a tokenized sentence through the signature trie. Matching is
//! greedy and incremental: each word either extends the current path,
//! feeds the open parameter, or ends the current command. A sentence may
//! hold several commands; each executed action's result becomes the
//! last-result that pronouns in later commands refer to.
//!
//! # States
//!
//! ```text
//!            root start
//!  SCANNING ───────────────▶ MATCHING ◀──────────────┐
//!     ▲                        │  placeholder         │ literal continues
//!     │ execute / void         ▼                      │
//!     └─────────────────── CAPTURING ─────────────────┘
//! ```

use std::sync::Arc;

use promethia_foundation::{Result, SynonymTable, TokenCatalog, TokenId, Value};
use tracing::{debug, warn};

use crate::action::{ActionBinding, ActionDefinition, RegistrationReport};
use crate::classifier::{SemanticClassifier, is_literal};
use crate::config::EngineConfig;
use crate::context::ResolutionContext;
use crate::embedding::Embedder;
use crate::signature::SignatureCompiler;
use crate::tokenizer::{InputToken, InputTokenizer};
use crate::trie::{NodeId, SignatureTrie};

/// Words gathered for one parameter slot during a pass.
///
/// Each item keeps the word as written next to the value it stands for;
/// the two differ only for pronouns and variable names.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterCapture {
    items: Vec<(String, Value)>,
}

impl ParameterCapture {
    /// Creates an empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a surface word.
    pub fn push_word(&mut self, word: &str) {
        self.items.push((word.to_string(), Value::from(word)));
    }

    /// Appends a pronoun or variable name together with its value.
    pub fn push_reference(&mut self, word: &str, value: Value) {
        self.items.push((word.to_string(), value));
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Converts the capture into the argument passed to the action.
    ///
    /// A lone non-string value passes through unchanged; anything else is
    /// joined with single spaces.
    #[must_use]
    pub fn into_argument(mut self) -> Value {
        match self.items.len() {
            0 => Value::Nil,
            1 if !self.items[0].1.is_string() => {
                self.items.pop().map(|(_, value)| value).unwrap_or_default()
            }
            _ => {
                let joined: Vec<String> = self.items.iter().map(|(_, v)| v.to_string()).collect();
                Value::from(joined.join(" "))
            }
        }
    }

    /// Converts the capture into its words as written, joined with single
    /// spaces. Nothing is substituted.
    #[must_use]
    pub fn into_surface(self) -> Value {
        if self.items.is_empty() {
            return Value::Nil;
        }
        let joined: Vec<String> = self.items.into_iter().map(|(word, _)| word).collect();
        Value::from(joined.join(" "))
    }
}

/// One action executed during a pass.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutedAction {
    /// Name of the action
    pub action: String,
    /// Arguments, one per declared parameter
    pub arguments: Vec<Value>,
    /// Value returned by the action
    pub result: Value,
}

/// Outcome of resolving one sentence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolution {
    /// Actions in execution order
    pub executed: Vec<ExecutedAction>,
}

impl Resolution {
    /// Returns true if nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.executed.is_empty()
    }

    /// Result of the last executed action.
    #[must_use]
    pub fn last_result(&self) -> Option<&Value> {
        self.executed.last().map(|e| &e.result)
    }
}

/// How a single input word participates in matching.
#[derive(Clone, Debug, PartialEq)]
enum WordClass {
    /// A registered vocabulary token
    Token(TokenId),
    /// Literal, or too far from every exemplar
    Unknown,
    /// Discardable outside parameters
    Null,
    /// Conjunction
    Stop,
    /// Pronoun or named variable, already substituted
    Reference(Value),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Scanning,
    Matching(NodeId),
    Capturing(NodeId),
}

/// Resolves sentences into action calls.
pub struct ResolutionEngine {
    config: EngineConfig,
    catalog: TokenCatalog,
    classifier: SemanticClassifier,
    compiler: SignatureCompiler,
    trie: SignatureTrie,
    actions: Vec<Arc<ActionDefinition>>,
    context: Arc<ResolutionContext>,
}

impl std::fmt::Debug for ResolutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionEngine")
            .field("actions", &self.actions.len())
            .field("trie_nodes", &self.trie.len())
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}

impl ResolutionEngine {
    /// Creates an engine with the built-in embedder and a fresh context.
    #[must_use]
    pub fn new(config: EngineConfig, synonyms: SynonymTable) -> Self {
        let classifier = SemanticClassifier::new(&config);
        let compiler = SignatureCompiler::new().with_case_sensitive(config.case_sensitive);
        Self {
            config,
            catalog: TokenCatalog::with_synonyms(synonyms),
            classifier,
            compiler,
            trie: SignatureTrie::new(),
            actions: Vec::new(),
            context: Arc::new(ResolutionContext::new()),
        }
    }

    /// Builder method to replace the embedding provider.
    ///
    /// Exemplars already indexed are re-embedded with the new provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails on an existing exemplar.
    pub fn with_embedder(mut self, embedder: Box<dyn Embedder>) -> Result<Self> {
        let mut classifier = SemanticClassifier::with_embedder(&self.config, embedder);
        for exemplar in self.classifier.exemplars() {
            classifier.add_token(exemplar.token, &[exemplar.phrase.as_str()])?;
        }
        self.classifier = classifier;
        Ok(self)
    }

    /// Builder method to share an existing context.
    #[must_use]
    pub fn with_context(mut self, context: Arc<ResolutionContext>) -> Self {
        self.context = context;
        self
    }

    /// The shared context.
    #[must_use]
    pub fn context(&self) -> &Arc<ResolutionContext> {
        &self.context
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The token catalog.
    #[must_use]
    pub fn catalog(&self) -> &TokenCatalog {
        &self.catalog
    }

    /// The word classifier.
    #[must_use]
    pub fn classifier(&self) -> &SemanticClassifier {
        &self.classifier
    }

    /// The signature trie.
    #[must_use]
    pub fn trie(&self) -> &SignatureTrie {
        &self.trie
    }

    /// Registered actions in registration order.
    #[must_use]
    pub fn actions(&self) -> &[Arc<ActionDefinition>] {
        &self.actions
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Registers an action under every signature its template compiles to.
    ///
    /// An unusable template is logged and reported with zero signatures,
    /// not treated as an error. A signature already bound to another action
    /// is overwritten; the report lists the displaced action.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedding provider fails while indexing the
    /// template's words. The trie and action list are left untouched.
    pub fn register_action(&mut self, mut action: ActionDefinition) -> Result<RegistrationReport> {
        let mut report = RegistrationReport {
            action: action.name.clone(),
            ..RegistrationReport::default()
        };

        let compiled = self.compiler.compile(&action.template, &mut self.catalog);
        if !compiled.has_fixed_word() {
            warn!(action = %action.name, template = %action.template, "template has no literal word; action not registered");
            return Ok(report);
        }

        if action.params.is_empty() {
            action.params.clone_from(&compiled.params);
        } else if action.params.len() != compiled.params.len() {
            warn!(
                action = %action.name,
                declared = action.params.len(),
                placeholders = compiled.params.len(),
                "parameter names do not match template placeholders; action not registered"
            );
            return Ok(report);
        }

        if let Some(unknown) = action.raw_params.iter().find(|r| !action.params.contains(r)) {
            warn!(action = %action.name, param = %unknown, "raw parameter is not a template placeholder");
        }

        let mut usable = Vec::with_capacity(compiled.signatures.len());
        for signature in &compiled.signatures {
            if signature.tokens.first().is_none_or(|&t| t == TokenId::PARAM) {
                warn!(action = %action.name, "skipping signature that is empty or starts with a placeholder");
                report.skipped += 1;
            } else {
                usable.push(signature);
            }
        }
        if usable.is_empty() {
            warn!(action = %action.name, template = %action.template, "no usable signature; action not registered");
            return Ok(report);
        }

        // Index the wording before the trie can reach the action
        for token in compiled.fixed_tokens() {
            let surfaces = self.catalog.surfaces(token);
            self.classifier.add_token(token, &surfaces)?;
        }

        let action = Arc::new(action);
        for signature in usable {
            let binding = ActionBinding {
                action: Arc::clone(&action),
                slots: signature.slots.clone(),
            };
            if let Some(displaced) = self.trie.insert(&signature.tokens, binding) {
                warn!(
                    action = %action.name,
                    displaced = %displaced.name(),
                    signature = %self.describe(&signature.tokens),
                    "signature already registered; later registration wins"
                );
                report.overwritten.push(displaced.name().to_string());
            }
            report.signatures += 1;
        }

        debug!(action = %action.name, signatures = report.signatures, "registered action");
        self.actions.push(action);

        Ok(report)
    }

    /// Registers several actions, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first registration error.
    pub fn register_actions(
        &mut self,
        actions: impl IntoIterator<Item = ActionDefinition>,
    ) -> Result<Vec<RegistrationReport>> {
        actions
            .into_iter()
            .map(|action| self.register_action(action))
            .collect()
    }

    fn describe(&self, tokens: &[TokenId]) -> String {
        let words: Vec<&str> = tokens
            .iter()
            .map(|&t| self.catalog.resolve(t).unwrap_or("?"))
            .collect();
        words.join(" ")
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolves a sentence, executing every command it contains.
    ///
    /// A sentence that matches nothing resolves to an empty [`Resolution`]
    /// and leaves the last-result untouched.
    ///
    /// # Errors
    ///
    /// Propagates the first action failure, with the sentence recorded as
    /// the error's source; later commands in the sentence are not run.
    pub fn resolve(&self, sentence: &str) -> Result<Resolution> {
        debug!(sentence, "resolving");
        let words = InputTokenizer::tokenize(sentence);
        self.resolve_tokens(&words).map_err(|e| e.with_source(sentence))
    }

    /// Resolves an already tokenized sentence.
    ///
    /// # Errors
    ///
    /// Propagates the first action failure.
    pub fn resolve_tokens(&self, words: &[InputToken]) -> Result<Resolution> {
        let mut resolution = Resolution::default();
        let mut captures: Vec<ParameterCapture> = Vec::new();
        let mut state = State::Scanning;
        let mut i = 0;

        while i < words.len() {
            let word = &words[i];
            let next = words.get(i + 1);
            let class = self.classify(word);

            match state {
                State::Scanning => {
                    match class {
                        WordClass::Token(token) => {
                            if let Some(node) = self.trie.advance(NodeId::ROOT, token) {
                                captures.clear();
                                state = State::Matching(node);
                            } else {
                                debug!(word = word.text(), "not a command start; dropped");
                            }
                        }
                        _ => debug!(word = word.text(), "dropped outside a command"),
                    }
                    i += 1;
                }

                State::Matching(node) => match class {
                    WordClass::Token(token) => {
                        if let Some(child) = self.trie.advance(node, token) {
                            state = State::Matching(child);
                            i += 1;
                        } else if let Some(param) = self
                            .trie
                            .param_child(node)
                            .filter(|_| !self.trie.has_root_start(token))
                        {
                            state = Self::open_capture(&mut captures, param, word.text());
                            i += 1;
                        } else {
                            // Re-evaluate the same word from the root
                            self.execute(node, &mut captures, &mut resolution)?;
                            state = State::Scanning;
                        }
                    }
                    WordClass::Unknown => {
                        if let Some(param) = self.trie.param_child(node) {
                            state = Self::open_capture(&mut captures, param, word.text());
                            i += 1;
                        } else {
                            self.execute(node, &mut captures, &mut resolution)?;
                            state = State::Scanning;
                        }
                    }
                    WordClass::Reference(value) => {
                        if let Some(param) = self.trie.param_child(node) {
                            let mut capture = ParameterCapture::new();
                            capture.push_reference(word.text(), value);
                            captures.push(capture);
                            i += 1;

                            // A whole-slot reference ends the command if nothing can follow it
                            if self.trie.binding(param).is_some() && !self.continues(param, next) {
                                self.execute(param, &mut captures, &mut resolution)?;
                                state = State::Scanning;
                            } else {
                                state = State::Matching(param);
                            }
                        } else {
                            self.execute(node, &mut captures, &mut resolution)?;
                            state = State::Scanning;
                        }
                    }
                    WordClass::Null => {
                        match self.trie.param_child(node) {
                            Some(param) if self.is_boundary(next) => {
                                state = Self::open_capture(&mut captures, param, word.text());
                            }
                            _ => debug!(word = word.text(), "article dropped"),
                        }
                        i += 1;
                    }
                    WordClass::Stop => {
                        if self.ends_command(next) {
                            self.execute(node, &mut captures, &mut resolution)?;
                            state = State::Scanning;
                            i += 1;
                        } else if let Some(param) = self.trie.param_child(node) {
                            state = Self::open_capture(&mut captures, param, word.text());
                            i += 1;
                        } else {
                            self.execute(node, &mut captures, &mut resolution)?;
                            state = State::Scanning;
                        }
                    }
                },

                State::Capturing(node) => {
                    match class {
                        WordClass::Reference(value) => {
                            Self::current(&mut captures).push_reference(word.text(), value);
                            state = State::Matching(node);
                        }
                        WordClass::Token(token) if self.trie.has_root_start(token) => {
                            // Push the word back; it starts the next command
                            self.execute(node, &mut captures, &mut resolution)?;
                            state = State::Scanning;
                            continue;
                        }
                        WordClass::Token(token) => match self.trie.advance(node, token) {
                            // The fixed phrasing continues; the parameter is complete
                            Some(child) => state = State::Matching(child),
                            None => Self::current(&mut captures).push_word(word.text()),
                        },
                        WordClass::Stop if self.ends_command(next) => {
                            self.execute(node, &mut captures, &mut resolution)?;
                            state = State::Scanning;
                        }
                        WordClass::Unknown | WordClass::Null | WordClass::Stop => {
                            Self::current(&mut captures).push_word(word.text());
                        }
                    }
                    i += 1;
                }
            }
        }

        match state {
            State::Matching(node) | State::Capturing(node) => {
                self.execute(node, &mut captures, &mut resolution)?;
            }
            State::Scanning => {}
        }

        Ok(resolution)
    }

    fn open_capture(captures: &mut Vec<ParameterCapture>, param: NodeId, word: &str) -> State {
        let mut capture = ParameterCapture::new();
        capture.push_word(word);
        captures.push(capture);
        State::Capturing(param)
    }

    fn current(captures: &mut Vec<ParameterCapture>) -> &mut ParameterCapture {
        if captures.is_empty() {
            captures.push(ParameterCapture::new());
        }
        let last = captures.len() - 1;
        &mut captures[last]
    }

    fn classify(&self, word: &InputToken) -> WordClass {
        let text = match word {
            InputToken::Quoted(_) => return WordClass::Unknown,
            InputToken::Word(text) => text.as_str(),
        };

        if !is_literal(text) {
            if let Some(value) = self.context.variables().get(text) {
                debug!(word = text, "variable reference");
                return WordClass::Reference(value);
            }
        }

        match self.classifier.classify(text) {
            TokenId::LAST_RESULT => WordClass::Reference(self.context.last_result()),
            TokenId::NULL => WordClass::Null,
            TokenId::STOP => WordClass::Stop,
            TokenId::UNKNOWN => WordClass::Unknown,
            token => WordClass::Token(token),
        }
    }

    /// True if `next` is absent or a vocabulary word that starts a command.
    fn ends_command(&self, next: Option<&InputToken>) -> bool {
        next.is_none_or(|word| {
            matches!(self.classify(word), WordClass::Token(t) if self.trie.has_root_start(t))
        })
    }

    /// True if `next` is absent or a conjunction.
    fn is_boundary(&self, next: Option<&InputToken>) -> bool {
        next.is_none_or(|word| matches!(self.classify(word), WordClass::Stop))
    }

    /// True if `next` extends the path below `node`.
    fn continues(&self, node: NodeId, next: Option<&InputToken>) -> bool {
        next.is_some_and(|word| {
            matches!(self.classify(word), WordClass::Token(t) if self.trie.advance(node, t).is_some())
        })
    }

    fn execute(
        &self,
        node: NodeId,
        captures: &mut Vec<ParameterCapture>,
        resolution: &mut Resolution,
    ) -> Result<()> {
        let gathered = std::mem::take(captures);
        let Some(binding) = self.trie.binding(node) else {
            debug!(parameters = gathered.len(), "no action bound here; match void");
            return Ok(());
        };

        debug_assert_eq!(gathered.len(), binding.slots.len());
        let mut arguments = vec![Value::Nil; binding.params().len()];
        for (capture, &slot) in gathered.into_iter().zip(&binding.slots) {
            arguments[slot] = if binding.action.is_raw(slot) {
                capture.into_surface()
            } else {
                capture.into_argument()
            };
        }

        debug!(action = binding.name(), ?arguments, "executing action");
        let result = binding.action.invoke(&arguments)?;
        self.context.set_last_result(result.clone());

        resolution.executed.push(ExecutedAction {
            action: binding.name().to_string(),
            arguments,
            result,
        });
        Ok(())
    }
}
