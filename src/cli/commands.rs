//! Command implementations for the linfer CLI.

use std::io::{self, BufRead};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::classifier::Classifier;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::scoring::LabelScore;

/// Execute a CLI command.
pub fn execute_command(args: LinferArgs) -> Result<()> {
    match &args.command {
        Command::Classify(classify_args) => classify(classify_args.clone(), &args),
        Command::Inspect(inspect_args) => inspect(inspect_args.clone(), &args),
        Command::Tokenize(tokenize_args) => tokenize(tokenize_args.clone(), &args),
    }
}

/// Load a classifier, naming the file in any error.
fn load_classifier(path: &Path) -> Result<Classifier> {
    let start = Instant::now();
    let classifier = Classifier::from_path(path)
        .with_context(|| format!("failed to load model artifact {}", path.display()))?;
    debug!("loaded {} in {:?}", path.display(), start.elapsed());
    Ok(classifier)
}

/// Classify texts given as arguments, or one text per stdin line.
fn classify(args: ClassifyArgs, cli_args: &LinferArgs) -> Result<()> {
    let classifier = load_classifier(&args.model)?;

    let texts = if args.texts.is_empty() {
        read_lines(io::stdin().lock())?
    } else {
        args.texts
    };

    let start = Instant::now();
    let predictions = classifier.classify_batch(&texts);
    info!("classified {} texts in {:?}", texts.len(), start.elapsed());

    let classes = classifier.classes();
    let results = texts
        .into_iter()
        .zip(predictions)
        .map(|(text, prediction)| ClassificationResult {
            text,
            confidence: prediction.confidence(),
            probabilities: classes
                .iter()
                .zip(&prediction.probabilities)
                .map(|(label, &probability)| LabelScore {
                    label: label.clone(),
                    probability,
                })
                .collect(),
            label: prediction.label,
        })
        .collect();

    output_result(
        "Classification complete",
        &ClassificationResults { results },
        cli_args,
    )?;
    Ok(())
}

/// Summarize an artifact.
fn inspect(args: InspectArgs, cli_args: &LinferArgs) -> Result<()> {
    let classifier = load_classifier(&args.model)?;
    let artifact = classifier.artifact();

    let summary = ArtifactSummary {
        path: args.model.display().to_string(),
        classes: artifact.classes().to_vec(),
        n_features: artifact.n_features(),
        coefficient_rows: artifact.n_rows(),
        decision_rule: artifact.decision_rule().to_string(),
        config: artifact.config().clone(),
        vocabulary: args.vocabulary.then(|| artifact.vocabulary().to_vec()),
    };

    output_result("Artifact summary", &summary, cli_args)?;
    Ok(())
}

/// Show the analyzed tokens of a text and where they land in the vocabulary.
fn tokenize(args: TokenizeArgs, cli_args: &LinferArgs) -> Result<()> {
    let classifier = load_classifier(&args.model)?;
    let artifact = classifier.artifact();

    let tokens: Vec<TokenInfo> = classifier
        .tokens(&args.text)
        .into_iter()
        .map(|token| TokenInfo {
            feature_index: artifact.feature_index(&token),
            token,
        })
        .collect();
    let in_vocabulary = tokens
        .iter()
        .filter(|info| info.feature_index.is_some())
        .count();

    output_result(
        "Tokenization complete",
        &TokenizationResult {
            text: args.text,
            tokens,
            in_vocabulary,
        },
        cli_args,
    )?;
    Ok(())
}

/// Collect input lines, skipping blank ones.
fn read_lines<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line.context("failed to read input")?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_lines_skips_blank() {
        let input = Cursor::new("first line\n\n   \nsecond line\n");
        let lines = read_lines(input).unwrap();
        assert_eq!(lines, vec!["first line", "second line"]);
    }

    #[test]
    fn test_missing_model_names_path() {
        let error = load_classifier(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(format!("{error:#}").contains("/nonexistent/model.json"));
    }
}
