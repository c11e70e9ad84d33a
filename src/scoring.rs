//! Linear scoring and probability calibration.
//!
//! Raw scores are `coef · x + intercept` per coefficient row, accumulated
//! over the nonzero entries of the sparse feature vector only. They are then
//! turned into a probability distribution by the artifact's
//! [`DecisionRule`].

use serde::Serialize;

use crate::model::artifact::{DecisionRule, ModelArtifact};
use crate::vectorize::SparseVector;

/// One label with its probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelScore {
    pub label: String,
    pub probability: f64,
}

/// The outcome of classifying one input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Index of the predicted class in the artifact's class list.
    pub class_index: usize,
    /// Predicted label.
    pub label: String,
    /// One probability per class, in the artifact's class order.
    pub probabilities: Vec<f64>,
}

impl Prediction {
    /// Probability of the predicted label.
    pub fn confidence(&self) -> f64 {
        self.probabilities[self.class_index]
    }

    /// Labels paired with their probabilities, most probable first. Equal
    /// probabilities keep class order.
    pub fn ranked(&self, classes: &[String]) -> Vec<LabelScore> {
        let mut scores: Vec<LabelScore> = classes
            .iter()
            .zip(&self.probabilities)
            .map(|(label, &probability)| LabelScore {
                label: label.clone(),
                probability,
            })
            .collect();
        scores.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        scores
    }
}

/// Scores feature vectors against one artifact.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    artifact: &'a ModelArtifact,
}

impl<'a> Scorer<'a> {
    /// Create a scorer for an artifact.
    pub fn new(artifact: &'a ModelArtifact) -> Self {
        Scorer { artifact }
    }

    /// Raw linear scores, one per coefficient row.
    ///
    /// Entries whose index lies outside the artifact's vocabulary have no
    /// coefficients and contribute nothing.
    pub fn decision_function(&self, features: &SparseVector) -> Vec<f64> {
        let n_features = self.artifact.n_features();
        let mut raw = vec![0.0; self.artifact.n_rows()];
        for (feature, weight) in features.iter().filter(|&(feature, _)| feature < n_features) {
            for (acc, coef) in raw.iter_mut().zip(self.artifact.feature_weights(feature)) {
                *acc += coef * weight;
            }
        }
        for (acc, intercept) in raw.iter_mut().zip(self.artifact.intercepts()) {
            *acc += intercept;
        }
        raw
    }

    /// Class probabilities in the artifact's class order.
    pub fn predict_proba(&self, features: &SparseVector) -> Vec<f64> {
        let raw = self.decision_function(features);
        match self.artifact.decision_rule() {
            DecisionRule::Softmax => softmax(&raw),
            DecisionRule::Sigmoid => {
                let positive = sigmoid(raw[0]);
                vec![1.0 - positive, positive]
            }
            DecisionRule::OneVsRest => one_vs_rest(&raw),
        }
    }

    /// Predicted label and the full probability vector.
    pub fn score(&self, features: &SparseVector) -> Prediction {
        let probabilities = self.predict_proba(features);
        let class_index = argmax(&probabilities);
        Prediction {
            class_index,
            label: self.artifact.classes()[class_index].clone(),
            probabilities,
        }
    }
}

/// Score a feature vector against an artifact.
pub fn score(features: &SparseVector, artifact: &ModelArtifact) -> Prediction {
    Scorer::new(artifact).score(features)
}

/// Logistic function.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Softmax with the maximum subtracted first, so large scores cannot
/// overflow.
///
/// ```
/// use linfer::scoring::softmax;
///
/// let p = softmax(&[1000.0, 1000.0, 1000.0]);
/// assert!(p.iter().all(|v| (v - 1.0 / 3.0).abs() < 1e-12));
/// ```
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

fn one_vs_rest(scores: &[f64]) -> Vec<f64> {
    let probabilities: Vec<f64> = scores.iter().map(|&s| sigmoid(s)).collect();
    let sum: f64 = probabilities.iter().sum();
    if sum > 0.0 {
        probabilities.into_iter().map(|p| p / sum).collect()
    } else {
        vec![1.0 / scores.len() as f64; scores.len()]
    }
}

/// Index of the largest value; the earliest one wins ties.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TOLERANCE: f64 = 1e-12;

    fn artifact(doc: serde_json::Value) -> ModelArtifact {
        ModelArtifact::load(doc.to_string().as_bytes()).unwrap()
    }

    fn three_class() -> ModelArtifact {
        artifact(json!({
            "classes": ["neg", "neu", "pos"],
            "coef": [[2.0, -1.0], [0.0, 0.0], [-2.0, 1.0]],
            "intercept": [0.5, 0.0, -0.5],
            "vocabulary": ["bad", "good"],
            "idf": [1.0, 1.0],
            "meta": {"norm": null}
        }))
    }

    #[test]
    fn test_decision_function() {
        let artifact = three_class();
        let scorer = Scorer::new(&artifact);
        let x = SparseVector::from_entries([(0, 1.0), (1, 3.0)]);
        assert_eq!(scorer.decision_function(&x), vec![-0.5, 0.0, 0.5]);
    }

    #[test]
    fn test_zero_vector_uses_intercepts() {
        let artifact = three_class();
        let scorer = Scorer::new(&artifact);
        let x = SparseVector::new();
        assert_eq!(scorer.decision_function(&x), vec![0.5, 0.0, -0.5]);
        assert_eq!(scorer.score(&x).label, "neg");
        assert_eq!(score(&x, &artifact), scorer.score(&x));
    }

    #[test]
    fn test_out_of_range_features_are_ignored() {
        let artifact = artifact(json!({
            "classes": ["no", "yes"],
            "coef": [[3.0]],
            "intercept": [0.25],
            "vocabulary": ["word"],
            "idf": [1.0],
            "meta": {}
        }));
        let scorer = Scorer::new(&artifact);
        let outside = SparseVector::from_entries([(5, 1.0)]);
        assert_eq!(scorer.decision_function(&outside), vec![0.25]);
        assert_eq!(score(&outside, &artifact), score(&SparseVector::new(), &artifact));

        let mixed = SparseVector::from_entries([(0, 1.0), (1, 7.0)]);
        assert_eq!(scorer.decision_function(&mixed), vec![3.25]);
    }

    #[test]
    fn test_softmax_probabilities() {
        let artifact = three_class();
        let prediction = Scorer::new(&artifact).score(&SparseVector::from_entries([(1, 1.0)]));
        assert_eq!(prediction.label, "pos");
        let sum: f64 = prediction.probabilities.iter().sum();
        assert!((sum - 1.0).abs() < TOLERANCE);
        assert!(prediction.probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_softmax_is_stable() {
        let p = softmax(&[1000.0, 1000.0, 1000.0]);
        for value in &p {
            assert!(value.is_finite());
            assert!((value - 1.0 / 3.0).abs() < TOLERANCE);
        }
        let p = softmax(&[-1000.0, 0.0]);
        assert_eq!(p, vec![0.0, 1.0]);
    }

    #[test]
    fn test_sigmoid_binary_zero_model() {
        let artifact = artifact(json!({
            "classes": ["no", "yes"],
            "coef": [[0.0]],
            "intercept": [0.0],
            "vocabulary": ["word"],
            "idf": [1.0],
            "meta": {}
        }));
        let prediction = Scorer::new(&artifact).score(&SparseVector::new());
        assert_eq!(prediction.probabilities, vec![0.5, 0.5]);
        assert_eq!(prediction.label, "no");
    }

    #[test]
    fn test_sigmoid_favors_second_class() {
        let artifact = artifact(json!({
            "classes": ["no", "yes"],
            "coef": [[3.0]],
            "intercept": [0.0],
            "vocabulary": ["word"],
            "idf": [1.0],
            "meta": {}
        }));
        let prediction = Scorer::new(&artifact).score(&SparseVector::from_entries([(0, 1.0)]));
        assert_eq!(prediction.label, "yes");
        assert!((prediction.probabilities[1] - sigmoid(3.0)).abs() < TOLERANCE);
    }

    #[test]
    fn test_sigmoid_extremes_stay_finite() {
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid(-1000.0), 0.0);
    }

    #[test]
    fn test_one_vs_rest_normalizes() {
        let p = one_vs_rest(&[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(p, vec![0.25; 4]);
        let p = one_vs_rest(&[-2000.0, -2000.0]);
        assert_eq!(p, vec![0.5, 0.5]);
    }

    #[test]
    fn test_argmax_ties_pick_first() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), 1);
        assert_eq!(argmax(&[0.5, 0.5]), 0);
    }

    #[test]
    fn test_ranked_orders_by_probability() {
        let prediction = Prediction {
            class_index: 2,
            label: "c".to_string(),
            probabilities: vec![0.2, 0.2, 0.6],
        };
        let classes = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let ranked = prediction.ranked(&classes);
        let labels: Vec<&str> = ranked.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["c", "a", "b"]);
        assert_eq!(prediction.confidence(), 0.6);
    }
}
