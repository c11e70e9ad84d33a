//! # linfer
//!
//! Portable inference for TF-IDF linear text classifiers.
//!
//! A trained bag-of-words model is exported as a self-describing JSON
//! artifact (vocabulary, idf weights, coefficients, intercepts, class labels
//! and the feature-extraction settings). linfer loads it and reproduces the
//! reference model's predictions without the training library.
//!
//! ## Pipeline
//!
//! - [`analysis`] - lowercasing, regex tokenization, stop words, word n-grams
//! - [`vectorize`] - sparse TF-IDF vectors with l1/l2 normalization
//! - [`scoring`] - linear scores, softmax / sigmoid / one-vs-rest
//! - [`classifier`] - the `classify(text)` facade
//!
//! ```
//! use linfer::prelude::*;
//!
//! let classifier = Classifier::from_bytes(br#"{
//!     "classes": ["ham", "spam"],
//!     "coef": [[3.0, -1.0]],
//!     "intercept": [-0.5],
//!     "vocabulary": ["prize", "meeting"],
//!     "idf": [1.5, 1.2],
//!     "meta": {"analyzer": "word", "norm": "l2"}
//! }"#)?;
//!
//! assert_eq!(classifier.classify("Claim your PRIZE now").label, "spam");
//! # Ok::<(), linfer::error::LinferError>(())
//! ```

pub mod analysis;
pub mod classifier;
pub mod cli;
pub mod error;
pub mod model;
pub mod scoring;
pub mod vectorize;

pub mod prelude {
    pub use crate::classifier::Classifier;
    pub use crate::error::{LinferError, Result};
    pub use crate::model::{DecisionRule, ModelArtifact, VectorizerConfig};
    pub use crate::scoring::Prediction;
    pub use crate::vectorize::SparseVector;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
