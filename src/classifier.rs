//! The classification facade: text → tokens → TF-IDF vector → prediction.
//!
//! # Examples
//!
//! ```
//! use linfer::classifier::Classifier;
//!
//! let classifier = Classifier::from_bytes(br#"{
//!     "classes": ["negative", "positive"],
//!     "coef": [[-2.0, 2.0]],
//!     "intercept": [0.0],
//!     "vocabulary": ["awful", "great"],
//!     "idf": [1.0, 1.0],
//!     "meta": {"analyzer": "word", "lowercase": true, "norm": "l2", "n_features": 2}
//! }"#).unwrap();
//!
//! let prediction = classifier.classify("GREAT phone, truly great!");
//! assert_eq!(prediction.label, "positive");
//! assert!((prediction.probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-9);
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use rayon::prelude::*;

use crate::analysis::analyzer::{Analyzer, WordAnalyzer};
use crate::error::Result;
use crate::model::artifact::ModelArtifact;
use crate::scoring::{Prediction, Scorer};
use crate::vectorize::{SparseVector, vectorize};

/// A ready-to-use classifier owning (a shared handle to) one artifact.
///
/// Construction performs all validation and compiles the token pattern;
/// afterwards every operation is infallible. Cloning is cheap and clones
/// share the artifact, so one classifier can serve any number of threads.
#[derive(Clone)]
pub struct Classifier {
    artifact: Arc<ModelArtifact>,
    analyzer: WordAnalyzer,
}

impl Classifier {
    /// Create a classifier around a loaded artifact.
    pub fn new(artifact: ModelArtifact) -> Result<Self> {
        Self::from_shared(Arc::new(artifact))
    }

    /// Create a classifier around an artifact shared with other owners.
    pub fn from_shared(artifact: Arc<ModelArtifact>) -> Result<Self> {
        let analyzer = WordAnalyzer::from_config(artifact.config())?;
        debug!("built analyzer {analyzer:?}");
        Ok(Classifier { artifact, analyzer })
    }

    /// Load an artifact from its serialized bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::new(ModelArtifact::load(bytes)?)
    }

    /// Load an artifact file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(ModelArtifact::from_path(path)?)
    }

    /// The artifact this classifier runs.
    pub fn artifact(&self) -> &Arc<ModelArtifact> {
        &self.artifact
    }

    /// Class labels in probability-vector order.
    pub fn classes(&self) -> &[String] {
        self.artifact.classes()
    }

    /// The analyzed tokens of `text`, before vocabulary lookup.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        self.analyzer.analyze(text).map(|token| token.text).collect()
    }

    /// The TF-IDF feature vector of `text`.
    pub fn transform(&self, text: &str) -> SparseVector {
        vectorize(self.analyzer.analyze(text), &self.artifact)
    }

    /// Raw linear scores of `text`, one per coefficient row.
    pub fn decision_function(&self, text: &str) -> Vec<f64> {
        Scorer::new(&self.artifact).decision_function(&self.transform(text))
    }

    /// Classify one text.
    pub fn classify(&self, text: &str) -> Prediction {
        Scorer::new(&self.artifact).score(&self.transform(text))
    }

    /// Classify many texts in parallel. Results keep the input order.
    pub fn classify_batch<S>(&self, texts: &[S]) -> Vec<Prediction>
    where
        S: AsRef<str> + Sync,
    {
        texts
            .par_iter()
            .map(|text| self.classify(text.as_ref()))
            .collect()
    }
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("artifact", &self.artifact)
            .field("analyzer", &self.analyzer)
            .finish()
    }
}
