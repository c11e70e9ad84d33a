//! Tokenizers split (already normalized) text into a stream of tokens.
//!
//! The only tokenizer an artifact can ask for is the word-level
//! [`RegexTokenizer`](regex::RegexTokenizer); the trait is the seam the
//! analyzer composes against.

use std::borrow::Cow;

use crate::analysis::token::TokenStream;

/// Trait for tokenizers that convert text into tokens.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a lazy stream of tokens.
    ///
    /// Owned text is moved into the stream, so the stream is free to
    /// outlive the caller's buffer.
    fn tokenize<'a>(&'a self, text: Cow<'a, str>) -> TokenStream<'a>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod regex;

pub use self::regex::{DEFAULT_TOKEN_PATTERN, RegexTokenizer};
