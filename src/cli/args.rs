//! Command line argument parsing for the linfer CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// linfer - classify text with an exported TF-IDF linear model
#[derive(Parser, Debug, Clone)]
#[command(name = "linfer")]
#[command(about = "Classify text with an exported TF-IDF linear model")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct LinferArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl LinferArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n + 1,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Classify text (arguments, or one text per stdin line)
    Classify(ClassifyArgs),

    /// Show what an artifact contains
    Inspect(InspectArgs),

    /// Show how an artifact tokenizes a text
    Tokenize(TokenizeArgs),
}

/// Arguments for classifying text
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// Path to the model artifact (JSON)
    #[arg(short, long, value_name = "MODEL", env = "LINFER_MODEL")]
    pub model: PathBuf,

    /// Texts to classify; reads stdin line by line when omitted
    #[arg(value_name = "TEXT")]
    pub texts: Vec<String>,
}

/// Arguments for inspecting an artifact
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Path to the model artifact (JSON)
    #[arg(short, long, value_name = "MODEL", env = "LINFER_MODEL")]
    pub model: PathBuf,

    /// Also list the vocabulary
    #[arg(long)]
    pub vocabulary: bool,
}

/// Arguments for tokenizing a text
#[derive(Parser, Debug, Clone)]
pub struct TokenizeArgs {
    /// Path to the model artifact (JSON)
    #[arg(short, long, value_name = "MODEL", env = "LINFER_MODEL")]
    pub model: PathBuf,

    /// Text to tokenize
    #[arg(value_name = "TEXT")]
    pub text: String,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
