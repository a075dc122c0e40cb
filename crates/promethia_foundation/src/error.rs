//! Error types for the Promethia system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The main error type for Promethia operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Records the sentence or file being processed, keeping any frames.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_source(source));
        self
    }

    /// Pushes a frame onto this error's context, creating the context if needed.
    #[must_use]
    pub fn in_frame(mut self, frame: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(frame));
        self
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config {
            path,
            message: message.into(),
        })
    }

    /// Creates a synonym conflict error.
    #[must_use]
    pub fn synonym_conflict(
        surface: impl Into<String>,
        existing: impl Into<String>,
        requested: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::SynonymConflict {
            surface: surface.into(),
            existing: existing.into(),
            requested: requested.into(),
        })
    }

    /// Creates an embedding dimension mismatch error.
    #[must_use]
    pub fn embedding_dimension(expected: usize, actual: usize) -> Self {
        Self::new(ErrorKind::EmbeddingDimension { expected, actual })
    }

    /// Creates an embedding provider error.
    #[must_use]
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Embedding(message.into()))
    }

    /// Creates an arity mismatch error.
    #[must_use]
    pub fn arity_mismatch(expected: usize, actual: usize) -> Self {
        Self::new(ErrorKind::ArityMismatch { expected, actual })
    }

    /// Creates a type mismatch error for an action argument.
    #[must_use]
    pub fn type_mismatch(expected: &'static str, actual: &'static str) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Creates an action failure error.
    #[must_use]
    pub fn action_failed(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ActionFailed {
            action: action.into(),
            message: message.into(),
        })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Configuration was missing or could not be parsed.
    #[error("invalid configuration{}: {message}", path_suffix(.path.as_ref()))]
    Config {
        /// The file the configuration was read from, if any.
        path: Option<PathBuf>,
        /// Description of the problem.
        message: String,
    },

    /// A surface word is already a synonym of a different canonical token.
    #[error("synonym conflict: '{surface}' belongs to '{existing}', cannot add to '{requested}'")]
    SynonymConflict {
        /// The surface word.
        surface: String,
        /// The canonical token that already owns it.
        existing: String,
        /// The canonical token that tried to claim it.
        requested: String,
    },

    /// An embedding vector has the wrong length for the index.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    EmbeddingDimension {
        /// The index dimension.
        expected: usize,
        /// The vector length supplied.
        actual: usize,
    },

    /// The embedding provider could not produce a vector.
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// An action received fewer arguments than it needs.
    #[error("arity mismatch: expected {expected}, got {actual}")]
    ArityMismatch {
        /// Number of arguments required.
        expected: usize,
        /// Number of arguments supplied.
        actual: usize,
    },

    /// An action argument had an unexpected type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected value type.
        expected: &'static str,
        /// The actual value type.
        actual: &'static str,
    },

    /// A host action reported a failure.
    #[error("action '{action}' failed: {message}")]
    ActionFailed {
        /// Name of the action.
        action: String,
        /// The failure message.
        message: String,
    },
}

fn path_suffix(path: Option<&PathBuf>) -> String {
    path.map(|path| format!(" in {}", path.display()))
        .unwrap_or_default()
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The sentence or file being processed.
    pub source: Option<String>,
    /// Stack of actions or stages the error passed through.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at \"{source}\"")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}

/// Result type alias using the Promethia [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
