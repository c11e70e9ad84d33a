//! Text analysis: turning raw text into the token sequence the vectorizer
//! counts.
//!
//! The pipeline is built from an artifact's configuration by
//! [`WordAnalyzer::from_config`] and then reused for every call.

pub mod analyzer;
pub mod char_filter;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, WordAnalyzer};
pub use token::{Token, TokenStream};

use crate::error::Result;
use crate::model::config::VectorizerConfig;

/// Tokenize `text` the way `config` prescribes.
///
/// This builds the analysis pipeline on every call; hold on to a
/// [`WordAnalyzer`] when tokenizing more than once.
///
/// # Examples
///
/// ```
/// use linfer::analysis::tokenize;
/// use linfer::model::config::VectorizerConfig;
///
/// let tokens = tokenize("Great product!! Loved it.", &VectorizerConfig::default()).unwrap();
/// assert_eq!(tokens, vec!["great", "product", "loved", "it"]);
/// ```
pub fn tokenize(text: &str, config: &VectorizerConfig) -> Result<Vec<String>> {
    let analyzer = WordAnalyzer::from_config(config)?;
    Ok(analyzer.analyze(text).map(|token| token.text).collect())
}
