//! Artifact validation: every malformed or unsupported artifact is rejected
//! at load time with the matching error kind.

use linfer::model::{ArtifactDocument, ModelArtifact};
use linfer::prelude::*;
use serde_json::{Value, json};

fn valid() -> Value {
    json!({
        "classes": ["neg", "neu", "pos"],
        "coef": [[1.0, -1.0], [0.0, 0.0], [-1.0, 1.0]],
        "intercept": [0.0, 0.1, 0.0],
        "vocabulary": ["bad", "good"],
        "idf": [1.5, 1.2],
        "meta": {"analyzer": "word", "lowercase": true, "norm": "l2", "n_features": 2}
    })
}

fn load(value: &Value) -> Result<Classifier> {
    Classifier::from_bytes(value.to_string().as_bytes())
}

fn assert_artifact_error(value: &Value) {
    match load(value) {
        Err(LinferError::Artifact(_)) => {}
        other => panic!("expected an artifact error, got {other:?}"),
    }
}

fn assert_unsupported(value: &Value) {
    match load(value) {
        Err(LinferError::ConfigUnsupported(_)) => {}
        other => panic!("expected an unsupported configuration error, got {other:?}"),
    }
}

#[test]
fn test_valid_artifact_loads() {
    assert!(load(&valid()).is_ok());
}

#[test]
fn test_not_json() {
    let error = Classifier::from_bytes(b"{ not json").unwrap_err();
    assert!(matches!(error, LinferError::Artifact(_)));
    assert!(error.is_load_error());
}

#[test]
fn test_missing_fields() {
    for field in ["classes", "coef", "intercept", "vocabulary", "idf", "meta"] {
        let mut doc = valid();
        doc.as_object_mut().unwrap().remove(field);
        assert_artifact_error(&doc);
    }
}

#[test]
fn test_shape_mismatches() {
    let mut doc = valid();
    doc["coef"] = json!([[1.0, -1.0], [0.0, 0.0]]);
    assert_artifact_error(&doc);

    let mut doc = valid();
    doc["coef"][1] = json!([0.0, 0.0, 0.0]);
    assert_artifact_error(&doc);

    let mut doc = valid();
    doc["intercept"] = json!([0.0, 0.1]);
    assert_artifact_error(&doc);

    let mut doc = valid();
    doc["idf"] = json!([1.5]);
    assert_artifact_error(&doc);

    let mut doc = valid();
    doc["meta"]["n_features"] = json!(3);
    assert_artifact_error(&doc);
}

#[test]
fn test_class_list_problems() {
    let mut doc = valid();
    doc["classes"] = json!(["only"]);
    doc["coef"] = json!([[1.0, -1.0]]);
    doc["intercept"] = json!([0.0]);
    assert_artifact_error(&doc);

    let mut doc = valid();
    doc["classes"] = json!(["neg", "pos", "neg"]);
    assert_artifact_error(&doc);
}

#[test]
fn test_duplicate_vocabulary_token() {
    let mut doc = valid();
    doc["vocabulary"] = json!(["good", "good"]);
    assert_artifact_error(&doc);
}

#[test]
fn test_non_finite_values() {
    let mut document: ArtifactDocument = serde_json::from_value(valid()).unwrap();
    document.coef[2][1] = f64::NAN;
    assert!(matches!(
        ModelArtifact::from_document(document),
        Err(LinferError::Artifact(_))
    ));

    let mut document: ArtifactDocument = serde_json::from_value(valid()).unwrap();
    document.intercept[0] = f64::INFINITY;
    assert!(matches!(
        ModelArtifact::from_document(document),
        Err(LinferError::Artifact(_))
    ));

    let mut document: ArtifactDocument = serde_json::from_value(valid()).unwrap();
    document.idf = Some(vec![1.0, f64::NEG_INFINITY]);
    assert!(matches!(
        ModelArtifact::from_document(document),
        Err(LinferError::Artifact(_))
    ));
}

#[test]
fn test_unsupported_configurations() {
    let cases = [
        ("analyzer", json!("char")),
        ("analyzer", json!("char_wb")),
        ("strip_accents", json!("unicode")),
        ("stop_words", json!("english")),
        ("norm", json!("max")),
        ("ngram_range", json!([2, 1])),
        ("tokenizer", json!("my_module.tokenize")),
        ("token_pattern", json!("(unclosed")),
        ("token_pattern", json!(r"(\w)(\w)")),
    ];
    for (key, value) in cases {
        let mut doc = valid();
        doc["meta"][key] = value;
        assert_unsupported(&doc);
    }
}

#[test]
fn test_lenient_meta() {
    let mut doc = valid();
    doc["meta"] = json!({});
    assert!(load(&doc).is_ok());

    let mut doc = valid();
    doc["meta"]["token_pattern"] = json!(r"(?u)\\b\\w\\w+\\b");
    doc["meta"]["tokenizer"] = Value::Null;
    doc["meta"]["min_df"] = json!(2);
    let classifier = load(&doc).unwrap();
    assert_eq!(classifier.tokens("Good, not BAD"), vec!["good", "not", "bad"]);
}

#[test]
fn test_missing_file_is_io_error() {
    let error = Classifier::from_path("/nonexistent/linfer/model.json").unwrap_err();
    assert!(matches!(error, LinferError::Io(_)));
    assert!(!error.is_load_error());
}
