//! Feature-extraction configuration carried by an artifact.
//!
//! [`VectorizerConfig`] is the validated, typed form of the `meta` block.
//! Every option the engine cannot reproduce exactly is rejected with
//! [`LinferError::ConfigUnsupported`] instead of being approximated.

use std::fmt;

use log::warn;
use serde::Serialize;

use crate::analysis::tokenizer::DEFAULT_TOKEN_PATTERN;
use crate::error::{LinferError, Result};
use crate::model::document::{MetaDocument, StopWordsDocument};

/// `meta` keys that only matter while fitting and are ignored here.
const TRAINING_ONLY_KEYS: &[&str] = &[
    "min_df",
    "max_df",
    "max_features",
    "dtype",
    "encoding",
    "decode_error",
    "input",
];

/// `meta` keys naming custom callables; only an absent or null value can be
/// honored.
const CALLABLE_KEYS: &[&str] = &["preprocessor", "tokenizer"];

/// Row normalization applied to the TF-IDF vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
    None,
}

impl Norm {
    fn parse(value: Option<&str>) -> Result<Self> {
        match value {
            Some("l2") => Ok(Norm::L2),
            Some("l1") => Ok(Norm::L1),
            Some("none") | None => Ok(Norm::None),
            Some(other) => Err(LinferError::config_unsupported(format!(
                "norm {other:?} (expected \"l2\", \"l1\" or none)"
            ))),
        }
    }

    fn as_meta(self) -> Option<String> {
        match self {
            Norm::L1 => Some("l1".to_string()),
            Norm::L2 => Some("l2".to_string()),
            Norm::None => None,
        }
    }
}

impl fmt::Display for Norm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Norm::L1 => write!(f, "l1"),
            Norm::L2 => write!(f, "l2"),
            Norm::None => write!(f, "none"),
        }
    }
}

/// How a model with one coefficient row per class turns scores into
/// probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiClass {
    /// Softmax over all rows (the training library's default).
    Auto,
    /// Softmax over all rows.
    Multinomial,
    /// Independent per-class sigmoids, normalized to sum to one.
    Ovr,
}

impl MultiClass {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "auto" => Ok(MultiClass::Auto),
            "multinomial" => Ok(MultiClass::Multinomial),
            "ovr" => Ok(MultiClass::Ovr),
            other => Err(LinferError::config_unsupported(format!(
                "multi_class {other:?}"
            ))),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            MultiClass::Auto => "auto",
            MultiClass::Multinomial => "multinomial",
            MultiClass::Ovr => "ovr",
        }
    }
}

/// Validated feature-extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorizerConfig {
    /// Fold text to lowercase before tokenizing.
    pub lowercase: bool,
    /// Regular expression selecting tokens.
    pub token_pattern: String,
    /// Multiply term frequencies by idf.
    pub use_idf: bool,
    /// Whether idf was fitted with add-one smoothing. Already baked into the
    /// idf values; kept for reporting and re-serialization.
    pub smooth_idf: bool,
    /// Row normalization.
    pub norm: Norm,
    /// Use `1 + ln(count)` instead of the raw count.
    pub sublinear_tf: bool,
    /// Use 1 for every present term instead of its count.
    pub binary: bool,
    /// Inclusive word n-gram range.
    pub ngram_range: (usize, usize),
    /// Tokens removed before n-gram expansion.
    pub stop_words: Option<Vec<String>>,
    /// Probability rule for models with one coefficient row per class.
    pub multi_class: MultiClass,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        VectorizerConfig {
            lowercase: true,
            token_pattern: DEFAULT_TOKEN_PATTERN.to_string(),
            use_idf: true,
            smooth_idf: true,
            norm: Norm::L2,
            sublinear_tf: false,
            binary: false,
            ngram_range: (1, 1),
            stop_words: None,
            multi_class: MultiClass::Auto,
        }
    }
}

impl VectorizerConfig {
    /// Validate a `meta` block.
    ///
    /// The token pattern itself is compiled later, by the analyzer.
    pub fn from_meta(meta: &MetaDocument) -> Result<Self> {
        if meta.analyzer != "word" {
            return Err(LinferError::config_unsupported(format!(
                "analyzer {:?} (only \"word\" is implemented)",
                meta.analyzer
            )));
        }

        if let Some(strip_accents) = &meta.strip_accents {
            return Err(LinferError::config_unsupported(format!(
                "strip_accents {strip_accents:?}"
            )));
        }

        let ngram_range = match meta.ngram_range.as_slice() {
            &[min_n, max_n] if min_n >= 1 && min_n <= max_n => (min_n, max_n),
            other => {
                return Err(LinferError::config_unsupported(format!(
                    "ngram_range {other:?}"
                )));
            }
        };

        let stop_words = match &meta.stop_words {
            None => None,
            Some(StopWordsDocument::List(words)) => Some(words.clone()),
            Some(StopWordsDocument::Named(name)) => {
                return Err(LinferError::config_unsupported(format!(
                    "built-in stop word list {name:?}; export the list itself instead"
                )));
            }
        };

        for (key, value) in &meta.extra {
            if CALLABLE_KEYS.contains(&key.as_str()) {
                if !value.is_null() {
                    return Err(LinferError::config_unsupported(format!(
                        "custom {key} cannot be reproduced"
                    )));
                }
            } else if !TRAINING_ONLY_KEYS.contains(&key.as_str()) {
                warn!("ignoring unrecognized meta key {key:?}");
            }
        }

        Ok(VectorizerConfig {
            lowercase: meta.lowercase,
            token_pattern: meta.token_pattern.clone(),
            use_idf: meta.use_idf,
            smooth_idf: meta.smooth_idf,
            norm: Norm::parse(meta.norm.as_deref())?,
            sublinear_tf: meta.sublinear_tf,
            binary: meta.binary,
            ngram_range,
            stop_words,
            multi_class: MultiClass::parse(&meta.multi_class)?,
        })
    }

    /// Render back into a `meta` block for `n_features` features.
    pub fn to_meta(&self, n_features: usize) -> MetaDocument {
        MetaDocument {
            analyzer: "word".to_string(),
            lowercase: self.lowercase,
            token_pattern: self.token_pattern.clone(),
            use_idf: self.use_idf,
            smooth_idf: self.smooth_idf,
            norm: self.norm.as_meta(),
            sublinear_tf: self.sublinear_tf,
            n_features: Some(n_features),
            binary: self.binary,
            ngram_range: vec![self.ngram_range.0, self.ngram_range.1],
            stop_words: self.stop_words.clone().map(StopWordsDocument::List),
            strip_accents: None,
            multi_class: self.multi_class.as_str().to_string(),
            extra: Default::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(json: &str) -> MetaDocument {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_defaults_match_empty_meta() {
        let config = VectorizerConfig::from_meta(&meta("{}")).unwrap();
        assert_eq!(config, VectorizerConfig::default());
    }

    #[test]
    fn test_norm_values() {
        let parse = |json: &str| VectorizerConfig::from_meta(&meta(json)).map(|c| c.norm);
        assert_eq!(parse(r#"{"norm": "l2"}"#).unwrap(), Norm::L2);
        assert_eq!(parse(r#"{"norm": "l1"}"#).unwrap(), Norm::L1);
        assert_eq!(parse(r#"{"norm": "none"}"#).unwrap(), Norm::None);
        assert_eq!(parse(r#"{"norm": null}"#).unwrap(), Norm::None);
        assert!(matches!(
            parse(r#"{"norm": "max"}"#),
            Err(LinferError::ConfigUnsupported(_))
        ));
    }

    #[test]
    fn test_rejects_other_analyzers() {
        for analyzer in ["char", "char_wb"] {
            let json = format!(r#"{{"analyzer": "{analyzer}"}}"#);
            let err = VectorizerConfig::from_meta(&meta(&json)).unwrap_err();
            assert!(matches!(err, LinferError::ConfigUnsupported(_)));
        }
    }

    #[test]
    fn test_rejects_unreproducible_options() {
        for json in [
            r#"{"strip_accents": "unicode"}"#,
            r#"{"stop_words": "english"}"#,
            r#"{"ngram_range": [2, 1]}"#,
            r#"{"ngram_range": [1]}"#,
            r#"{"multi_class": "crammer_singer"}"#,
            r#"{"tokenizer": "<function>"}"#,
        ] {
            let err = VectorizerConfig::from_meta(&meta(json)).unwrap_err();
            assert!(matches!(err, LinferError::ConfigUnsupported(_)), "{json}");
        }
    }

    #[test]
    fn test_accepts_training_only_and_null_callables() {
        let config = VectorizerConfig::from_meta(&meta(
            r#"{"min_df": 2, "max_df": 0.95, "tokenizer": null, "stop_words": ["the"]}"#,
        ))
        .unwrap();
        assert_eq!(config.stop_words, Some(vec!["the".to_string()]));
    }

    #[test]
    fn test_meta_round_trip() {
        let config = VectorizerConfig {
            norm: Norm::None,
            sublinear_tf: true,
            ngram_range: (1, 3),
            stop_words: Some(vec!["and".to_string()]),
            multi_class: MultiClass::Ovr,
            ..VectorizerConfig::default()
        };
        let meta = config.to_meta(42);
        assert_eq!(meta.n_features, Some(42));
        assert_eq!(VectorizerConfig::from_meta(&meta).unwrap(), config);
    }
}
