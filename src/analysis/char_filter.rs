//! Char filters that normalize raw text before it reaches the tokenizer.
//!
//! A char filter sees the whole input string, which is where case folding
//! has to happen: the token pattern is matched against the already-folded
//! text, exactly as the training library's preprocessor does it.

use std::borrow::Cow;

/// Trait for character filters that transform text before tokenization.
///
/// Implementations return the input unchanged (borrowed) when there is
/// nothing to rewrite.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text.
    fn filter<'a>(&self, input: &'a str) -> Cow<'a, str>;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod lowercase;

pub use lowercase::LowercaseCharFilter;
