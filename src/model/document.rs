//! Serialized form of a model artifact.
//!
//! These types mirror the JSON layout field for field and carry no
//! invariants of their own. [`ModelArtifact`](super::artifact::ModelArtifact)
//! validates a document and freezes it into the form the engine runs on.
//!
//! ```json
//! {
//!   "classes": ["negative", "neutral", "positive"],
//!   "coef": [[...], [...], [...]],
//!   "intercept": [0.1, -0.2, 0.1],
//!   "vocabulary": ["awful", "fine", "great"],
//!   "idf": [2.1, 1.7, 1.9],
//!   "meta": { "analyzer": "word", "lowercase": true, "norm": "l2", "n_features": 3 }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::DEFAULT_TOKEN_PATTERN;

/// The complete artifact as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDocument {
    /// Class labels; their order is the order of every probability vector.
    pub classes: Vec<ClassLabel>,
    /// Coefficient matrix, one row per class (or a single row for the binary
    /// special case).
    pub coef: Vec<Vec<f64>>,
    /// One intercept per coefficient row.
    pub intercept: Vec<f64>,
    /// Feature vocabulary.
    pub vocabulary: VocabularyDocument,
    /// Inverse document frequencies aligned with the vocabulary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idf: Option<Vec<f64>>,
    /// Feature-extraction configuration.
    pub meta: MetaDocument,
}

/// A class label. The training side allows numeric and boolean labels as
/// well as strings; all of them are rendered to strings by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassLabel {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassLabel::Text(s) => write!(f, "{s}"),
            ClassLabel::Integer(i) => write!(f, "{i}"),
            ClassLabel::Float(x) => write!(f, "{x:?}"),
            ClassLabel::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ClassLabel {
    fn from(value: &str) -> Self {
        ClassLabel::Text(value.to_string())
    }
}

/// Vocabulary as an index-ordered token list, or as the `{token: index}`
/// mapping the training library keeps internally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VocabularyDocument {
    List(Vec<String>),
    Mapping(BTreeMap<String, i64>),
}

impl VocabularyDocument {
    /// Number of entries.
    pub fn len(&self) -> usize {
        match self {
            VocabularyDocument::List(tokens) => tokens.len(),
            VocabularyDocument::Mapping(map) => map.len(),
        }
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Stop words: either an explicit list or the name of a built-in list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopWordsDocument {
    Named(String),
    List(Vec<String>),
}

/// The `meta` block. Missing keys take the training library's defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaDocument {
    #[serde(default = "default_analyzer")]
    pub analyzer: String,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_true")]
    pub use_idf: bool,
    #[serde(default = "default_true")]
    pub smooth_idf: bool,
    /// `"l2"`, `"l1"`, `"none"`, or `null`.
    #[serde(default = "default_norm")]
    pub norm: Option<String>,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_features: Option<usize>,
    #[serde(default)]
    pub binary: bool,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: Vec<usize>,
    #[serde(default)]
    pub stop_words: Option<StopWordsDocument>,
    #[serde(default)]
    pub strip_accents: Option<String>,
    #[serde(default = "default_multi_class")]
    pub multi_class: String,
    /// Keys this engine does not interpret.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for MetaDocument {
    fn default() -> Self {
        MetaDocument {
            analyzer: default_analyzer(),
            lowercase: true,
            token_pattern: default_token_pattern(),
            use_idf: true,
            smooth_idf: true,
            norm: default_norm(),
            sublinear_tf: false,
            n_features: None,
            binary: false,
            ngram_range: default_ngram_range(),
            stop_words: None,
            strip_accents: None,
            multi_class: default_multi_class(),
            extra: BTreeMap::new(),
        }
    }
}

fn default_analyzer() -> String {
    "word".to_string()
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_norm() -> Option<String> {
    Some("l2".to_string())
}

fn default_ngram_range() -> Vec<usize> {
    vec![1, 1]
}

fn default_multi_class() -> String {
    "auto".to_string()
}
