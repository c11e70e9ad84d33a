//! Word n-gram (shingle) filter.
//!
//! Expands a token sequence into every contiguous run of `min_n..=max_n`
//! tokens, each joined with a single space. Unigrams come first in their
//! original order, followed by all bigrams, then trigrams, and so on.
//!
//! # Examples
//!
//! ```
//! use linfer::analysis::token_filter::Filter;
//! use linfer::analysis::token_filter::shingle::ShingleFilter;
//! use linfer::analysis::token::Token;
//!
//! let filter = ShingleFilter::new(1, 2).unwrap();
//! let tokens = vec![Token::new("not", 0), Token::new("good", 1)];
//! let result: Vec<_> = filter
//!     .filter(Box::new(tokens.into_iter()))
//!     .map(|t| t.text)
//!     .collect();
//!
//! assert_eq!(result, vec!["not", "good", "not good"]);
//! ```

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::{LinferError, Result};

/// Builds word n-grams from the incoming tokens.
#[derive(Clone, Debug)]
pub struct ShingleFilter {
    min_n: usize,
    max_n: usize,
}

impl ShingleFilter {
    /// Create a filter emitting n-grams for every n in `min_n..=max_n`.
    pub fn new(min_n: usize, max_n: usize) -> Result<Self> {
        if min_n == 0 || min_n > max_n {
            return Err(LinferError::config_unsupported(format!(
                "ngram_range ({min_n}, {max_n}) is invalid"
            )));
        }
        Ok(ShingleFilter { min_n, max_n })
    }

    /// The n-gram range this filter produces.
    pub fn range(&self) -> (usize, usize) {
        (self.min_n, self.max_n)
    }

    fn shingles(&self, tokens: Vec<Token>) -> Vec<Token> {
        let mut output = Vec::new();
        let mut position = 0;
        for n in self.min_n..=self.max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                let text = window
                    .iter()
                    .map(|token| token.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                output.push(Token::with_offsets(
                    text,
                    position,
                    window[0].start_offset,
                    window[n - 1].end_offset,
                ));
                position += 1;
            }
        }
        output
    }
}

impl Filter for ShingleFilter {
    fn filter<'a>(&'a self, tokens: TokenStream<'a>) -> TokenStream<'a> {
        if self.min_n == 1 && self.max_n == 1 {
            return tokens;
        }
        Box::new(self.shingles(tokens.collect()).into_iter())
    }

    fn name(&self) -> &'static str {
        "shingle"
    }
}
