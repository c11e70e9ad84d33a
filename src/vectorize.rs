//! TF-IDF feature extraction.
//!
//! Maps a token sequence onto an artifact's vocabulary and weights each
//! present feature:
//!
//! ```text
//! count → tf (raw | binary | 1 + ln(count)) → tf × idf → l2 / l1 / none
//! ```
//!
//! Out-of-vocabulary tokens are dropped without a trace, and so are features
//! whose weight comes out as zero (a zero idf). Entries are kept in
//! ascending feature order, so every sum over a vector (the norm here, the
//! dot products in the scorer) runs in the same order on every call and
//! repeated calls give bit-identical results.

use ahash::AHashMap;

use crate::model::artifact::ModelArtifact;
use crate::model::config::{Norm, VectorizerConfig};

/// A sparse feature vector: `(feature index, weight)` pairs sorted by index.
///
/// Features that are not stored are implicitly zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Create an empty (all-zero) vector.
    pub fn new() -> Self {
        SparseVector {
            entries: Vec::new(),
        }
    }

    /// Build a vector from arbitrary-order entries. Entries are sorted by
    /// index; duplicate indices are summed.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let mut entries: Vec<(usize, f64)> = entries.into_iter().collect();
        entries.sort_by_key(|&(index, _)| index);
        entries.dedup_by(|next, kept| {
            if next.0 == kept.0 {
                kept.1 += next.1;
                true
            } else {
                false
            }
        });
        SparseVector { entries }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no feature is stored (the all-zero vector).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(feature index, weight)` in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Weight of one feature (zero when absent).
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map_or(0.0, |pos| self.entries[pos].1)
    }

    /// Euclidean norm.
    pub fn l2_norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Sum of absolute weights.
    pub fn l1_norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w.abs()).sum()
    }

    /// Dense copy of length `n_features`.
    pub fn to_dense(&self, n_features: usize) -> Vec<f64> {
        let mut dense = vec![0.0; n_features];
        for &(index, weight) in &self.entries {
            if let Some(slot) = dense.get_mut(index) {
                *slot = weight;
            }
        }
        dense
    }

    fn normalize(&mut self, norm: Norm) {
        let total = match norm {
            Norm::L2 => self.l2_norm(),
            Norm::L1 => self.l1_norm(),
            Norm::None => return,
        };
        if total == 0.0 {
            return;
        }
        for (_, weight) in &mut self.entries {
            *weight /= total;
        }
    }
}

/// Term-frequency weight for a raw count.
fn term_frequency(count: u32, config: &VectorizerConfig) -> f64 {
    if config.binary {
        1.0
    } else if config.sublinear_tf {
        1.0 + f64::from(count).ln()
    } else {
        f64::from(count)
    }
}

/// Turn a token sequence into the artifact's TF-IDF feature vector.
///
/// # Examples
///
/// ```
/// use linfer::model::ModelArtifact;
/// use linfer::vectorize::vectorize;
///
/// let artifact = ModelArtifact::load(br#"{
///     "classes": ["neg", "pos"], "coef": [[1.0, -1.0]], "intercept": [0.0],
///     "vocabulary": ["good", "bad"], "idf": [1.0, 1.0],
///     "meta": {"norm": null}
/// }"#).unwrap();
///
/// let vector = vectorize(["good", "good", "unknown"], &artifact);
/// assert_eq!(vector.get(0), 2.0);
/// assert_eq!(vector.len(), 1);
/// ```
pub fn vectorize<I, T>(tokens: I, artifact: &ModelArtifact) -> SparseVector
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut counts: AHashMap<usize, u32> = AHashMap::new();
    for token in tokens {
        if let Some(index) = artifact.feature_index(token.as_ref()) {
            *counts.entry(index).or_insert(0) += 1;
        }
    }

    let config = artifact.config();
    let idf = artifact.idf().filter(|_| config.use_idf);

    let mut entries: Vec<(usize, f64)> = counts
        .into_iter()
        .map(|(index, count)| {
            let tf = term_frequency(count, config);
            let weight = match idf {
                Some(idf) => tf * idf[index],
                None => tf,
            };
            (index, weight)
        })
        .filter(|&(_, weight)| weight != 0.0)
        .collect();
    entries.sort_unstable_by_key(|&(index, _)| index);

    let mut vector = SparseVector { entries };
    vector.normalize(config.norm);
    vector
}
