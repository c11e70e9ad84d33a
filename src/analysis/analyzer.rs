//! Analyzers combine char filters, a tokenizer and token filters into the
//! complete text-to-tokens pipeline.
//!
//! ```text
//! Raw Text → LowercaseCharFilter → RegexTokenizer → StopFilter → ShingleFilter → Tokens
//! ```
//!
//! Each stage is present only when the artifact's configuration asks for it.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::analysis::char_filter::{CharFilter, LowercaseCharFilter};
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::{Filter, ShingleFilter, StopFilter};
use crate::analysis::tokenizer::{RegexTokenizer, Tokenizer};
use crate::error::Result;
use crate::model::config::VectorizerConfig;

/// Trait for analyzers that convert text into processed tokens.
///
/// Analysis cannot fail: everything that could go wrong is checked when the
/// analyzer is built.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a lazy stream of tokens.
    fn analyze<'a>(&'a self, text: &'a str) -> TokenStream<'a>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// The word-level analyzer described by an artifact's `meta` block.
#[derive(Clone)]
pub struct WordAnalyzer {
    char_filters: Vec<Arc<dyn CharFilter>>,
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
}

impl WordAnalyzer {
    /// Build the pipeline for a vectorizer configuration, compiling the token
    /// pattern once.
    pub fn from_config(config: &VectorizerConfig) -> Result<Self> {
        let mut char_filters: Vec<Arc<dyn CharFilter>> = Vec::new();
        if config.lowercase {
            char_filters.push(Arc::new(LowercaseCharFilter::new()));
        }

        let tokenizer = Arc::new(RegexTokenizer::with_pattern(&config.token_pattern)?);

        let mut filters: Vec<Arc<dyn Filter>> = Vec::new();
        if let Some(words) = config.stop_words.as_ref().filter(|w| !w.is_empty()) {
            filters.push(Arc::new(StopFilter::from_words(words.iter().cloned())));
        }
        let (min_n, max_n) = config.ngram_range;
        if (min_n, max_n) != (1, 1) {
            filters.push(Arc::new(ShingleFilter::new(min_n, max_n)?));
        }

        Ok(WordAnalyzer {
            char_filters,
            tokenizer,
            filters,
        })
    }

    /// Get the char filters used by this analyzer.
    pub fn char_filters(&self) -> &[Arc<dyn CharFilter>] {
        &self.char_filters
    }

    /// Get the tokenizer used by this analyzer.
    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    /// Get the token filters used by this analyzer.
    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }
}

impl Analyzer for WordAnalyzer {
    fn analyze<'a>(&'a self, text: &'a str) -> TokenStream<'a> {
        let mut normalized = Cow::Borrowed(text);
        for char_filter in &self.char_filters {
            normalized = match normalized {
                Cow::Borrowed(s) => char_filter.filter(s),
                Cow::Owned(s) => Cow::Owned(char_filter.filter(&s).into_owned()),
            };
        }

        let mut tokens = self.tokenizer.tokenize(normalized);
        for filter in &self.filters {
            tokens = filter.filter(tokens);
        }
        tokens
    }

    fn name(&self) -> &'static str {
        "word"
    }
}

impl fmt::Debug for WordAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordAnalyzer")
            .field(
                "char_filters",
                &self.char_filters.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field("tokenizer", &self.tokenizer.name())
            .field(
                "filters",
                &self.filters.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(config: &VectorizerConfig, text: &str) -> Vec<String> {
        let analyzer = WordAnalyzer::from_config(config).unwrap();
        analyzer.analyze(text).map(|token| token.text).collect()
    }

    #[test]
    fn test_default_pipeline() {
        let config = VectorizerConfig::default();
        assert_eq!(
            analyze(&config, "Great product!! Loved it."),
            vec!["great", "product", "loved", "it"]
        );
    }

    #[test]
    fn test_case_preserved_without_lowercase() {
        let config = VectorizerConfig {
            lowercase: false,
            ..VectorizerConfig::default()
        };
        assert_eq!(analyze(&config, "Great DAY"), vec!["Great", "DAY"]);
    }

    #[test]
    fn test_stop_words_then_ngrams() {
        let config = VectorizerConfig {
            stop_words: Some(vec!["the".to_string()]),
            ngram_range: (1, 2),
            ..VectorizerConfig::default()
        };
        assert_eq!(
            analyze(&config, "The plot was thin"),
            vec!["plot", "was", "thin", "plot was", "was thin"]
        );
    }

    #[test]
    fn test_stop_words_compare_after_lowercasing() {
        let config = VectorizerConfig {
            stop_words: Some(vec!["the".to_string()]),
            ..VectorizerConfig::default()
        };
        assert_eq!(analyze(&config, "THE end"), vec!["end"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(analyze(&VectorizerConfig::default(), "").is_empty());
        assert!(analyze(&VectorizerConfig::default(), "!!! ???").is_empty());
    }

    #[test]
    fn test_debug_lists_stages() {
        let analyzer = WordAnalyzer::from_config(&VectorizerConfig::default()).unwrap();
        let debug = format!("{analyzer:?}");
        assert!(debug.contains("lowercase"));
        assert!(debug.contains("regex"));
        assert_eq!(analyzer.name(), "word");
    }
}
