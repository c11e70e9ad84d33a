//! Stop filter implementation.
//!
//! Removes tokens listed in an artifact's `stop_words`. Matching is exact:
//! the list is compared against tokens after case folding, the same way the
//! model saw them during training.
//!
//! # Examples
//!
//! ```
//! use linfer::analysis::token_filter::Filter;
//! use linfer::analysis::token_filter::stop::StopFilter;
//! use linfer::analysis::token::Token;
//!
//! let filter = StopFilter::from_words(["the", "and"]);
//! let tokens = vec![Token::new("the", 0), Token::new("quick", 1), Token::new("fox", 2)];
//! let result: Vec<_> = filter.filter(Box::new(tokens.into_iter())).collect();
//!
//! assert_eq!(result.len(), 2);
//! assert_eq!(result[0].text, "quick");
//! ```

use ahash::AHashSet;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;

/// A filter that drops stop words from the token stream.
#[derive(Clone, Debug, Default)]
pub struct StopFilter {
    stop_words: AHashSet<String>,
}

impl StopFilter {
    /// Create a stop filter from a list of words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopFilter {
            stop_words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether a word is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Number of stop words in this filter.
    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    /// Check if the stop word list is empty.
    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Filter for StopFilter {
    fn filter<'a>(&'a self, tokens: TokenStream<'a>) -> TokenStream<'a> {
        Box::new(tokens.filter(move |token| !self.is_stop_word(&token.text)))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_stop_filter() {
        let filter = StopFilter::from_words(vec!["the", "and"]);
        let tokens = vec![
            Token::new("the", 0),
            Token::new("cat", 1),
            Token::new("and", 2),
            Token::new("the", 3),
            Token::new("dog", 4),
        ];

        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).collect();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].text, "cat");
        assert_eq!(result[1].text, "dog");
    }

    #[test]
    fn test_matching_is_exact() {
        let filter = StopFilter::from_words(["the"]);
        assert!(filter.is_stop_word("the"));
        assert!(!filter.is_stop_word("The"));
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(StopFilter::default().name(), "stop");
        assert!(StopFilter::default().is_empty());
    }
}
