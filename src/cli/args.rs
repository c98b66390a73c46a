//! Command line argument parsing for Parlance CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ml::intent_classifier::{ClassifierKind, TrainerConfig};

/// Parlance - hybrid rule-based and statistical intent classification
#[derive(Parser, Debug, Clone)]
#[command(name = "parlance")]
#[command(about = "Classify short utterances into intents with rules and a TF-IDF model")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct ParlanceArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl ParlanceArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model from a labeled corpus
    Train(TrainArgs),

    /// Classify one utterance
    Predict(PredictArgs),

    /// Classify utterances interactively until "exit"
    Chat(ChatArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Training configuration file (JSON); flags override its values
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Corpus file (JSON with a "sentences" array)
    #[arg(long, value_name = "CORPUS_FILE")]
    pub corpus: Option<PathBuf>,

    /// Where to write the model artifact
    #[arg(short, long, value_name = "MODEL_FILE")]
    pub model: Option<PathBuf>,

    /// Classifier type
    #[arg(long)]
    pub classifier: Option<ClassifierKind>,

    /// Fraction of examples held out for evaluation
    #[arg(long)]
    pub test_size: Option<f64>,

    /// Seed for the train/test split
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum optimizer iterations
    #[arg(long)]
    pub max_iter: Option<usize>,
}

impl TrainArgs {
    /// Build the effective training configuration.
    pub fn to_config(&self) -> Result<TrainerConfig> {
        let mut config = match &self.config {
            Some(path) => TrainerConfig::from_file(path)?,
            None => TrainerConfig::default(),
        };

        if let Some(corpus) = &self.corpus {
            config.corpus_path = corpus.clone();
        }
        if let Some(model) = &self.model {
            config.model_path = model.clone();
        }
        if let Some(kind) = self.classifier {
            config.classifier.kind = kind;
        }
        if let Some(test_size) = self.test_size {
            config.test_size = test_size;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(max_iter) = self.max_iter {
            config.classifier.max_iter = max_iter;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Arguments for one-shot prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Model artifact to load
    #[arg(short, long, value_name = "MODEL_FILE", default_value = "chatbot_model.bin")]
    pub model: PathBuf,

    /// Use the keyword rules only; no model is loaded
    #[arg(long)]
    pub rules_only: bool,

    /// Utterance to classify (words are joined with spaces)
    #[arg(value_name = "TEXT", required = true, num_args = 1..)]
    pub text: Vec<String>,
}

impl PredictArgs {
    /// The utterance as one string.
    pub fn utterance(&self) -> String {
        self.text.join(" ")
    }
}

/// Arguments for the interactive loop
#[derive(Parser, Debug, Clone)]
pub struct ChatArgs {
    /// Model artifact to load
    #[arg(short, long, value_name = "MODEL_FILE", default_value = "chatbot_model.bin")]
    pub model: PathBuf,

    /// Use the keyword rules only; no model is loaded
    #[arg(long)]
    pub rules_only: bool,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_command() {
        let args = ParlanceArgs::try_parse_from([
            "parlance",
            "train",
            "--corpus",
            "data/corpus.json",
            "--model",
            "out/model.bin",
            "--classifier",
            "centroid",
            "--seed",
            "7",
        ])
        .unwrap();

        if let Command::Train(train_args) = args.command {
            let config = train_args.to_config().unwrap();
            assert_eq!(config.corpus_path, PathBuf::from("data/corpus.json"));
            assert_eq!(config.model_path, PathBuf::from("out/model.bin"));
            assert_eq!(config.classifier.kind, ClassifierKind::Centroid);
            assert_eq!(config.seed, 7);
            assert_eq!(config.test_size, 0.2);
        } else {
            panic!("Expected Train command");
        }
    }

    #[test]
    fn test_train_rejects_bad_override() {
        let args =
            ParlanceArgs::try_parse_from(["parlance", "train", "--test-size", "1.5"]).unwrap();
        if let Command::Train(train_args) = args.command {
            assert!(train_args.to_config().is_err());
        } else {
            panic!("Expected Train command");
        }
    }

    #[test]
    fn test_predict_command() {
        let args = ParlanceArgs::try_parse_from([
            "parlance",
            "predict",
            "--rules-only",
            "turn",
            "volume",
            "up",
        ])
        .unwrap();

        if let Command::Predict(predict_args) = args.command {
            assert!(predict_args.rules_only);
            assert_eq!(predict_args.utterance(), "turn volume up");
            assert_eq!(predict_args.model, PathBuf::from("chatbot_model.bin"));
        } else {
            panic!("Expected Predict command");
        }
    }

    #[test]
    fn test_predict_requires_text() {
        assert!(ParlanceArgs::try_parse_from(["parlance", "predict"]).is_err());
    }

    #[test]
    fn test_verbosity() {
        let args = ParlanceArgs::try_parse_from(["parlance", "-vv", "chat"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args = ParlanceArgs::try_parse_from(["parlance", "-q", "-vvv", "chat"]).unwrap();
        assert_eq!(args.verbosity(), 0);

        let args = ParlanceArgs::try_parse_from(["parlance", "chat"]).unwrap();
        assert_eq!(args.verbosity(), 1);
    }

    #[test]
    fn test_output_format() {
        let args = ParlanceArgs::try_parse_from(["parlance", "--format", "json", "chat"]).unwrap();
        assert!(matches!(args.output_format, OutputFormat::Json));
    }
}
