//! The loaded, validated model artifact.

use std::fmt;
use std::fs;
use std::path::Path;

use ahash::AHashMap;
use log::{debug, info};
use serde::Serialize;

use crate::error::{LinferError, Result};
use crate::model::config::{MultiClass, VectorizerConfig};
use crate::model::document::{ArtifactDocument, ClassLabel, VocabularyDocument};

/// How raw class scores become probabilities. Fixed when the artifact is
/// loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionRule {
    /// One row per class, normalized exponentials.
    Softmax,
    /// Two classes, a single row holding the log-odds of the second class.
    Sigmoid,
    /// One row per class, per-class sigmoids normalized to sum to one.
    OneVsRest,
}

impl fmt::Display for DecisionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionRule::Softmax => write!(f, "softmax"),
            DecisionRule::Sigmoid => write!(f, "sigmoid"),
            DecisionRule::OneVsRest => write!(f, "one_vs_rest"),
        }
    }
}

/// An immutable TF-IDF linear classifier.
///
/// Coefficients are stored feature-major: the weights of feature `i` for
/// every row sit next to each other at `weights[i * rows..(i + 1) * rows]`,
/// so scoring a sparse vector touches one contiguous slice per present
/// feature.
#[derive(Clone)]
pub struct ModelArtifact {
    classes: Vec<String>,
    vocabulary: Vec<String>,
    index: AHashMap<String, usize>,
    idf: Option<Vec<f64>>,
    weights: Vec<f64>,
    intercepts: Vec<f64>,
    rows: usize,
    decision_rule: DecisionRule,
    config: VectorizerConfig,
}

impl ModelArtifact {
    /// Parse and validate an artifact from its serialized bytes.
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let document: ArtifactDocument = serde_json::from_slice(bytes)
            .map_err(|e| LinferError::artifact(format!("malformed artifact: {e}")))?;
        Self::from_document(document)
    }

    /// Read and load an artifact file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("reading artifact from {}", path.display());
        let bytes = fs::read(path)?;
        Self::load(&bytes)
    }

    /// Validate an in-memory document.
    pub fn from_document(document: ArtifactDocument) -> Result<Self> {
        let ArtifactDocument {
            classes,
            coef,
            intercept,
            vocabulary,
            idf,
            meta,
        } = document;

        let config = VectorizerConfig::from_meta(&meta)?;
        let classes = validate_classes(classes)?;
        let vocabulary = resolve_vocabulary(vocabulary)?;
        let n_features = vocabulary.len();

        if let Some(declared) = meta.n_features {
            if declared != n_features {
                return Err(LinferError::artifact(format!(
                    "meta.n_features is {declared} but the vocabulary has {n_features} entries"
                )));
            }
        }

        let idf = match idf {
            Some(values) => {
                if values.len() != n_features {
                    return Err(LinferError::artifact(format!(
                        "idf has {} entries but the vocabulary has {n_features}",
                        values.len()
                    )));
                }
                ensure_finite("idf", &values)?;
                Some(values)
            }
            None if config.use_idf => {
                return Err(LinferError::artifact("missing field `idf` (use_idf is set)"));
            }
            None => None,
        };

        let rows = coef.len();
        if rows == 0 {
            return Err(LinferError::artifact("coef has no rows"));
        }
        let decision_rule = match (rows, classes.len()) {
            (1, 2) => DecisionRule::Sigmoid,
            (r, c) if r == c => match config.multi_class {
                MultiClass::Ovr => DecisionRule::OneVsRest,
                MultiClass::Auto | MultiClass::Multinomial => DecisionRule::Softmax,
            },
            (r, c) => {
                return Err(LinferError::artifact(format!(
                    "coef has {r} rows for {c} classes (expected {c}, or 1 for two classes)"
                )));
            }
        };

        if intercept.len() != rows {
            return Err(LinferError::artifact(format!(
                "intercept has {} entries but coef has {rows} rows",
                intercept.len()
            )));
        }
        ensure_finite("intercept", &intercept)?;

        let mut weights = vec![0.0; rows * n_features];
        for (row, values) in coef.iter().enumerate() {
            if values.len() != n_features {
                return Err(LinferError::artifact(format!(
                    "coef row {row} has {} columns but the vocabulary has {n_features} entries",
                    values.len()
                )));
            }
            ensure_finite(&format!("coef row {row}"), values)?;
            for (feature, &value) in values.iter().enumerate() {
                weights[feature * rows + row] = value;
            }
        }

        let index: AHashMap<String, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, token)| (token.clone(), i))
            .collect();

        info!(
            "loaded artifact: {} classes, {} features, {} decision rule",
            classes.len(),
            n_features,
            decision_rule
        );

        Ok(ModelArtifact {
            classes,
            vocabulary,
            index,
            idf,
            weights,
            intercepts: intercept,
            rows,
            decision_rule,
            config,
        })
    }

    /// Convert back into the serialized document form.
    pub fn to_document(&self) -> ArtifactDocument {
        let n_features = self.n_features();
        let coef = (0..self.rows)
            .map(|row| {
                (0..n_features)
                    .map(|feature| self.weights[feature * self.rows + row])
                    .collect()
            })
            .collect();

        ArtifactDocument {
            classes: self
                .classes
                .iter()
                .map(|label| ClassLabel::Text(label.clone()))
                .collect(),
            coef,
            intercept: self.intercepts.clone(),
            vocabulary: VocabularyDocument::List(self.vocabulary.clone()),
            idf: self.idf.clone(),
            meta: self.config.to_meta(n_features),
        }
    }

    /// Serialize to the artifact JSON format.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.to_document())?)
    }

    /// Class labels in probability-vector order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of classes.
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Number of features (vocabulary size).
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of coefficient rows: the class count, or 1 for the binary
    /// special case.
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    /// Tokens in feature-index order.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Feature index of a token, or `None` if it is out of vocabulary.
    pub fn feature_index(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// Inverse document frequencies, if the artifact carries them.
    pub fn idf(&self) -> Option<&[f64]> {
        self.idf.as_deref()
    }

    /// Coefficients of one feature across all rows.
    pub fn feature_weights(&self, feature: usize) -> &[f64] {
        &self.weights[feature * self.rows..(feature + 1) * self.rows]
    }

    /// Coefficient of `feature` in `row`.
    pub fn coefficient(&self, row: usize, feature: usize) -> f64 {
        self.weights[feature * self.rows + row]
    }

    /// One intercept per coefficient row.
    pub fn intercepts(&self) -> &[f64] {
        &self.intercepts
    }

    /// The probability rule fixed at load time.
    pub fn decision_rule(&self) -> DecisionRule {
        self.decision_rule
    }

    /// Feature-extraction configuration.
    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }
}

impl fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelArtifact")
            .field("classes", &self.classes)
            .field("n_features", &self.n_features())
            .field("rows", &self.rows)
            .field("decision_rule", &self.decision_rule)
            .field("config", &self.config)
            .finish()
    }
}

fn validate_classes(labels: Vec<ClassLabel>) -> Result<Vec<String>> {
    if labels.len() < 2 {
        return Err(LinferError::artifact(format!(
            "classes has {} entries, at least 2 are required",
            labels.len()
        )));
    }
    let classes: Vec<String> = labels.iter().map(ToString::to_string).collect();
    let mut seen = ahash::AHashSet::with_capacity(classes.len());
    for label in &classes {
        if !seen.insert(label.as_str()) {
            return Err(LinferError::artifact(format!("duplicate class {label:?}")));
        }
    }
    Ok(classes)
}

/// Turn either vocabulary form into an index-ordered token list.
fn resolve_vocabulary(vocabulary: VocabularyDocument) -> Result<Vec<String>> {
    match vocabulary {
        VocabularyDocument::List(tokens) => {
            let mut seen = ahash::AHashSet::with_capacity(tokens.len());
            for token in &tokens {
                if !seen.insert(token.as_str()) {
                    return Err(LinferError::artifact(format!(
                        "duplicate vocabulary token {token:?}"
                    )));
                }
            }
            Ok(tokens)
        }
        VocabularyDocument::Mapping(map) => {
            let size = map.len();
            let mut slots: Vec<Option<String>> = vec![None; size];
            for (token, index) in map {
                let position = usize::try_from(index)
                    .ok()
                    .filter(|&i| i < size)
                    .ok_or_else(|| {
                        LinferError::artifact(format!(
                            "vocabulary index {index} of {token:?} is outside 0..{size}"
                        ))
                    })?;
                let slot = &mut slots[position];
                if let Some(previous) = slot {
                    return Err(LinferError::artifact(format!(
                        "vocabulary index {index} is shared by {previous:?} and {token:?}"
                    )));
                }
                *slot = Some(token);
            }
            // Every index in 0..size is now filled exactly once.
            Ok(slots.into_iter().flatten().collect())
        }
    }
}

fn ensure_finite(what: &str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(LinferError::artifact(format!(
            "{what} holds a non-finite value at position {i}"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn binary_document() -> serde_json::Value {
        json!({
            "classes": ["neg", "pos"],
            "coef": [[-1.5, 2.0, 0.25]],
            "intercept": [0.1],
            "vocabulary": ["bad", "good", "movie"],
            "idf": [1.2, 1.3, 1.0],
            "meta": {"analyzer": "word", "lowercase": true, "norm": "l2", "n_features": 3}
        })
    }

    fn load(value: serde_json::Value) -> Result<ModelArtifact> {
        ModelArtifact::load(value.to_string().as_bytes())
    }

    #[test]
    fn test_load_binary_artifact() {
        let artifact = load(binary_document()).unwrap();
        assert_eq!(artifact.classes(), &["neg", "pos"]);
        assert_eq!(artifact.n_features(), 3);
        assert_eq!(artifact.n_rows(), 1);
        assert_eq!(artifact.decision_rule(), DecisionRule::Sigmoid);
        assert_eq!(artifact.feature_index("good"), Some(1));
        assert_eq!(artifact.feature_index("great"), None);
        assert_eq!(artifact.feature_weights(1), &[2.0]);
    }

    #[test]
    fn test_feature_major_layout() {
        let artifact = load(json!({
            "classes": ["a", "b", "c"],
            "coef": [[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]],
            "intercept": [0.0, 0.0, 0.0],
            "vocabulary": ["xx", "yy"],
            "idf": [1.0, 1.0],
            "meta": {}
        }))
        .unwrap();
        assert_eq!(artifact.decision_rule(), DecisionRule::Softmax);
        assert_eq!(artifact.feature_weights(0), &[1.0, 3.0, 5.0]);
        assert_eq!(artifact.feature_weights(1), &[2.0, 4.0, 6.0]);
        assert_eq!(artifact.coefficient(2, 1), 6.0);
    }

    #[test]
    fn test_two_rows_for_two_classes_is_softmax() {
        let mut doc = binary_document();
        doc["coef"] = json!([[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0]]);
        doc["intercept"] = json!([0.0, 0.0]);
        assert_eq!(load(doc).unwrap().decision_rule(), DecisionRule::Softmax);
    }

    #[test]
    fn test_ovr_rule() {
        let doc = json!({
            "classes": ["a", "b", "c"],
            "coef": [[1.0], [2.0], [3.0]],
            "intercept": [0.0, 0.0, 0.0],
            "vocabulary": ["xx"],
            "idf": [1.0],
            "meta": {"multi_class": "ovr"}
        });
        assert_eq!(load(doc).unwrap().decision_rule(), DecisionRule::OneVsRest);
    }

    #[test]
    fn test_mapping_vocabulary_is_ordered_by_index() {
        let mut doc = binary_document();
        doc["vocabulary"] = json!({"movie": 2, "bad": 0, "good": 1});
        let artifact = load(doc).unwrap();
        assert_eq!(artifact.vocabulary(), &["bad", "good", "movie"]);
    }

    #[test]
    fn test_mapping_vocabulary_rejects_bad_indices() {
        for vocabulary in [
            json!({"bad": 0, "good": 0, "movie": 2}),
            json!({"bad": 0, "good": 1, "movie": 3}),
            json!({"bad": -1, "good": 1, "movie": 2}),
        ] {
            let mut doc = binary_document();
            doc["vocabulary"] = vocabulary;
            assert!(matches!(load(doc), Err(LinferError::Artifact(_))));
        }
    }

    #[test]
    fn test_use_idf_false_allows_missing_idf() {
        let mut doc = binary_document();
        doc.as_object_mut().unwrap().remove("idf");
        doc["meta"]["use_idf"] = json!(false);
        let artifact = load(doc).unwrap();
        assert!(artifact.idf().is_none());
    }

    #[test]
    fn test_document_round_trip() {
        let artifact = load(binary_document()).unwrap();
        let reloaded = ModelArtifact::load(&artifact.to_bytes().unwrap()).unwrap();
        assert_eq!(reloaded.to_document(), artifact.to_document());
    }
}
