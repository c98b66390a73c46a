//! Output formatting for CLI commands.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, ParlanceArgs};
use crate::error::Result;
use crate::ml::intent_classifier::{Resolution, ResolutionSource, TrainingSummary};

/// Reply shown for labels without a canned response.
pub const DEFAULT_RESPONSE: &str = "I understood your intent!";

const RESPONSES: &[(&str, &str)] = &[
    ("yesNode", "Got it! 👍"),
    ("noNode", "Okay, no problem."),
    ("volumeUp", "Turning the volume up 🔊"),
    ("volumeDown", "Turning the volume down 🔉"),
    ("stop", "Stopping the current action."),
    ("totalStop", "All actions stopped."),
    ("listOfGames", "Here are the available games 🎮"),
    ("playOtherGame", "Switching to another game."),
    ("gamesCounter", "Here's how many games you've played."),
    ("timesPlayed", "Here's your play count."),
];

/// Canned reply for an intent label.
pub fn response_for(intent: &str) -> &'static str {
    RESPONSES
        .iter()
        .find(|(label, _)| *label == intent)
        .map(|(_, response)| *response)
        .unwrap_or(DEFAULT_RESPONSE)
}

/// Result structure for a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub text: String,
    pub intent: String,
    pub confidence: Option<f64>,
    pub source: ResolutionSource,
    pub response: String,
}

impl PredictionResult {
    pub fn new(text: &str, resolution: Resolution) -> Self {
        Self {
            text: text.to_string(),
            response: response_for(&resolution.intent).to_string(),
            intent: resolution.intent,
            confidence: resolution.confidence,
            source: resolution.source,
        }
    }
}

/// Render a prediction for humans; the confidence line is omitted when absent.
pub fn format_prediction_human(result: &PredictionResult) -> String {
    match result.confidence {
        Some(confidence) => format!(
            "Predicted Intent: {} (confidence: {confidence:.2})\nBot: {}",
            result.intent, result.response
        ),
        None => format!("Predicted Intent: {}\nBot: {}", result.intent, result.response),
    }
}

/// Serialize any result as JSON.
pub fn format_json<T: Serialize>(result: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    Ok(json)
}

/// Write a prediction in the selected format.
pub fn write_prediction<W: Write>(
    out: &mut W,
    result: &PredictionResult,
    args: &ParlanceArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => writeln!(out, "{}", format_prediction_human(result))?,
        OutputFormat::Json => writeln!(out, "{}", format_json(result, args.pretty)?)?,
    }
    Ok(())
}

/// Print a training summary in the selected format.
pub fn output_training_summary(summary: &TrainingSummary, args: &ParlanceArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            println!("Loaded {} training samples", summary.n_samples);
            if args.verbosity() > 1 {
                println!(
                    "Train/test: {}/{}  vocabulary: {}  iterations: {}",
                    summary.n_train, summary.n_test, summary.vocabulary_size, summary.fit.iterations
                );
            }
            println!();
            println!("Classification Report:");
            println!();
            print!("{}", summary.report);
            if let Some(path) = &summary.model_path {
                println!();
                println!("Model trained and saved as {}", path.display());
            }
        }
        OutputFormat::Json => println!("{}", format_json(summary, args.pretty)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_response_lookup() {
        assert_eq!(response_for("stop"), "Stopping the current action.");
        assert_eq!(response_for("timesPlayed"), "Here's your play count.");
        assert_eq!(response_for("somethingElse"), DEFAULT_RESPONSE);
    }

    #[test]
    fn test_human_format_with_and_without_confidence() {
        let rule = PredictionResult::new("yeah", Resolution::from_rule("yesNode"));
        assert_eq!(
            format_prediction_human(&rule),
            "Predicted Intent: yesNode (confidence: 1.00)\nBot: Got it! 👍"
        );

        let model = PredictionResult::new("games", Resolution::from_model("listOfGames", None));
        assert_eq!(
            format_prediction_human(&model),
            "Predicted Intent: listOfGames\nBot: Here are the available games 🎮"
        );
    }

    #[test]
    fn test_json_output() {
        let args = ParlanceArgs::try_parse_from(["parlance", "-f", "json", "chat"]).unwrap();
        let result = PredictionResult::new("nah", Resolution::from_rule("noNode"));
        let mut buf = Vec::new();
        write_prediction(&mut buf, &result, &args).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["intent"], "noNode");
        assert_eq!(value["confidence"], 1.0);
        assert_eq!(value["source"], "rule");
    }
}
