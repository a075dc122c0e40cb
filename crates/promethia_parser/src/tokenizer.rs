//! Input tokenization.
//!
//! Converts a raw sentence into a stream of words and quoted literals.

/// A token from a sentence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputToken {
    /// A bare word, original case preserved
    Word(String),
    /// A quoted literal (quotes removed, contents preserved as-is)
    Quoted(String),
}

impl InputToken {
    /// Returns the text of the token.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Word(w) | Self::Quoted(w) => w,
        }
    }

    /// Returns true if this token is a quoted literal.
    #[must_use]
    pub const fn is_quoted(&self) -> bool {
        matches!(self, Self::Quoted(_))
    }
}

/// Tokenizes sentences.
pub struct InputTokenizer;

impl InputTokenizer {
    /// Sentence punctuation stripped from the end of bare words.
    const TRAILING_PUNCTUATION: &'static [char] = &['.', ',', '!', '?', ';', ':'];

    /// Tokenizes a raw input string into tokens.
    ///
    /// - Preserves quoted strings (single or double quotes opening a word) as atomic units
    /// - Strips trailing sentence punctuation from bare words
    /// - Keeps interior punctuation, so URLs, file names, and contractions survive
    #[must_use]
    pub fn tokenize(input: &str) -> Vec<InputToken> {
        let mut tokens = Vec::new();
        let mut chars = input.chars().peekable();
        let mut current_word = String::new();

        while let Some(ch) = chars.next() {
            match ch {
                // Start of a quoted literal (only at a word boundary)
                '"' | '\'' if current_word.is_empty() => {
                    let mut quoted = String::new();
                    for c in chars.by_ref() {
                        if c == ch {
                            break;
                        }
                        quoted.push(c);
                    }
                    tokens.push(InputToken::Quoted(quoted));
                }
                // Whitespace - end of word
                c if c.is_whitespace() => {
                    Self::flush(&mut current_word, &mut tokens);
                }
                // Regular character
                _ => {
                    current_word.push(ch);
                }
            }
        }

        // Flush final word
        Self::flush(&mut current_word, &mut tokens);
        tokens
    }

    fn flush(current_word: &mut String, tokens: &mut Vec<InputToken>) {
        let word = current_word.trim_end_matches(Self::TRAILING_PUNCTUATION);
        if !word.is_empty() {
            tokens.push(InputToken::Word(word.to_string()));
        }
        current_word.clear();
    }
}
