//! Output formatting for CLI commands.

use std::io::{self, Write};

use serde::Serialize;

use crate::cli::args::{LinferArgs, OutputFormat};
use crate::error::Result;
use crate::model::config::VectorizerConfig;
use crate::scoring::LabelScore;

/// Result structure for one classified text.
#[derive(Debug, Serialize)]
pub struct ClassificationResult {
    pub text: String,
    pub label: String,
    pub confidence: f64,
    /// Probabilities in the artifact's class order.
    pub probabilities: Vec<LabelScore>,
}

/// Result structure for a classify run.
#[derive(Debug, Serialize)]
pub struct ClassificationResults {
    pub results: Vec<ClassificationResult>,
}

/// Artifact summary for the inspect command.
#[derive(Debug, Serialize)]
pub struct ArtifactSummary {
    pub path: String,
    pub classes: Vec<String>,
    pub n_features: usize,
    pub coefficient_rows: usize,
    pub decision_rule: String,
    pub config: VectorizerConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<Vec<String>>,
}

/// One analyzed token and its feature index.
#[derive(Debug, Serialize)]
pub struct TokenInfo {
    pub token: String,
    pub feature_index: Option<usize>,
}

/// Result structure for the tokenize command.
#[derive(Debug, Serialize)]
pub struct TokenizationResult {
    pub text: String,
    pub tokens: Vec<TokenInfo>,
    pub in_vocabulary: usize,
}

/// Types with a human-readable rendering.
pub trait HumanOutput {
    /// Write the human-readable form.
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()>;
}

impl HumanOutput for ClassificationResults {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        for (i, result) in self.results.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            writeln!(out, "Text: {}", result.text)?;
            writeln!(
                out,
                "Prediction: {} ({:.1}%)",
                result.label,
                result.confidence * 100.0
            )?;
            let mut ranked = result.probabilities.clone();
            ranked.sort_by(|a, b| b.probability.total_cmp(&a.probability));
            for score in &ranked {
                writeln!(out, "  {:<16} {:>6.2}%", score.label, score.probability * 100.0)?;
            }
        }
        Ok(())
    }
}

impl HumanOutput for ArtifactSummary {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Artifact: {}", self.path)?;
        writeln!(out, "═════════")?;
        writeln!(out, "Classes: {}", self.classes.join(" · "))?;
        writeln!(out, "Features: {}", self.n_features)?;
        writeln!(out, "Coefficient rows: {}", self.coefficient_rows)?;
        writeln!(out, "Decision rule: {}", self.decision_rule)?;
        writeln!(out)?;
        writeln!(out, "Configuration:")?;
        writeln!(out, "──────────────")?;
        writeln!(out, "  lowercase: {}", self.config.lowercase)?;
        writeln!(out, "  token_pattern: {}", self.config.token_pattern)?;
        writeln!(out, "  use_idf: {}", self.config.use_idf)?;
        writeln!(out, "  smooth_idf: {}", self.config.smooth_idf)?;
        writeln!(out, "  norm: {}", self.config.norm)?;
        writeln!(out, "  sublinear_tf: {}", self.config.sublinear_tf)?;
        writeln!(out, "  binary: {}", self.config.binary)?;
        writeln!(
            out,
            "  ngram_range: ({}, {})",
            self.config.ngram_range.0, self.config.ngram_range.1
        )?;
        if let Some(stop_words) = &self.config.stop_words {
            writeln!(out, "  stop_words: {} words", stop_words.len())?;
        }
        if let Some(vocabulary) = &self.vocabulary {
            writeln!(out)?;
            writeln!(out, "Vocabulary:")?;
            writeln!(out, "───────────")?;
            for (index, token) in vocabulary.iter().enumerate() {
                writeln!(out, "  {index:>6}  {token}")?;
            }
        }
        Ok(())
    }
}

impl HumanOutput for TokenizationResult {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Text: {}", self.text)?;
        writeln!(
            out,
            "Tokens: {} ({} in vocabulary)",
            self.tokens.len(),
            self.in_vocabulary
        )?;
        for info in &self.tokens {
            match info.feature_index {
                Some(index) => writeln!(out, "  {:<24} #{index}", info.token)?,
                None => writeln!(out, "  {:<24} (out of vocabulary)", info.token)?,
            }
        }
        Ok(())
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &LinferArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_result(&mut out, message, result, args)
}

/// Write a result in the specified format to any writer.
pub fn write_result<T>(
    out: &mut dyn Write,
    message: &str,
    result: &T,
    args: &LinferArgs,
) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                writeln!(out, "{message}")?;
                writeln!(out)?;
            }
            result.write_human(out)?;
        }
        OutputFormat::Json => {
            let json = if args.pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}
