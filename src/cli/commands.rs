//! Command implementations for Parlance CLI.

use std::io::{self, BufRead, Write};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::Result;
use crate::ml::intent_classifier::{IntentResolver, Trainer};

/// Input that ends the chat loop (compared after trimming and lowercasing).
pub const EXIT_COMMAND: &str = "exit";

/// Execute a CLI command.
pub fn execute_command(args: ParlanceArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train_model(train_args, &args),
        Command::Predict(predict_args) => predict(predict_args, &args),
        Command::Chat(chat_args) => chat(chat_args, &args),
    }
}

/// Train and persist a model.
fn train_model(train_args: &TrainArgs, args: &ParlanceArgs) -> Result<()> {
    let config = train_args.to_config()?;
    if args.verbosity() > 1 {
        println!("Training from: {}", config.corpus_path.display());
    }
    let summary = Trainer::new(config)?.run()?;
    output_training_summary(&summary, args)
}

fn build_resolver(model: &std::path::Path, rules_only: bool) -> Result<IntentResolver> {
    if rules_only {
        log::info!("Running with rules only");
        Ok(IntentResolver::rules_only())
    } else {
        IntentResolver::from_artifact(model)
    }
}

/// Classify one utterance.
fn predict(predict_args: &PredictArgs, args: &ParlanceArgs) -> Result<()> {
    let resolver = build_resolver(&predict_args.model, predict_args.rules_only)?;
    let text = predict_args.utterance();
    let result = PredictionResult::new(&text, resolver.resolve(&text)?);
    write_prediction(&mut io::stdout().lock(), &result, args)
}

/// Interactive loop over stdin.
fn chat(chat_args: &ChatArgs, args: &ParlanceArgs) -> Result<()> {
    let resolver = build_resolver(&chat_args.model, chat_args.rules_only)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let handled = run_chat(&resolver, stdin.lock(), stdout.lock(), args)?;
    log::debug!("Chat session handled {handled} utterances");
    Ok(())
}

/// Read utterances from `input` until `exit` or end of input, writing one
/// prediction per line to `output`. Returns the number of utterances handled.
pub fn run_chat<R: BufRead, W: Write>(
    resolver: &IntentResolver,
    input: R,
    mut output: W,
    args: &ParlanceArgs,
) -> Result<usize> {
    let human = matches!(args.output_format, OutputFormat::Human);
    if human {
        writeln!(output, "Intent Predictor with Confidence (type '{EXIT_COMMAND}' to quit)")?;
    }

    let mut handled = 0;
    let mut lines = input.lines();
    loop {
        if human {
            write!(output, "You: ")?;
            output.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.trim().to_lowercase() == EXIT_COMMAND {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let result = PredictionResult::new(&line, resolver.resolve(&line)?);
        write_prediction(&mut output, &result, args)?;
        handled += 1;
    }

    if human {
        writeln!(output)?;
        writeln!(output, "Bye 👋")?;
    }
    Ok(handled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> ParlanceArgs {
        let mut argv = vec!["parlance"];
        argv.extend_from_slice(extra);
        argv.push("chat");
        ParlanceArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_chat_stops_at_exit() {
        let resolver = IntentResolver::rules_only();
        let input = "turn volume up\nnah\n  EXIT \nyeah\n";
        let mut output = Vec::new();
        let handled = run_chat(&resolver, input.as_bytes(), &mut output, &args(&[])).unwrap();

        assert_eq!(handled, 2);
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Predicted Intent: volumeUp (confidence: 1.00)"));
        assert!(text.contains("Predicted Intent: noNode (confidence: 1.00)"));
        assert!(!text.contains("yesNode"));
        assert!(text.contains("Bye"));
    }

    #[test]
    fn test_chat_command_without_model_is_load_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let model = dir.path().join("missing.bin");
        let argv = ["parlance", "chat", "--model", model.to_str().unwrap()];
        let result = execute_command(ParlanceArgs::try_parse_from(argv).unwrap());
        assert!(matches!(result, Err(crate::error::ParlanceError::Load(_))));
    }

    #[test]
    fn test_chat_ends_at_eof_and_skips_blank_lines() {
        let resolver = IntentResolver::rules_only();
        let input = "\n   \nshow me the games list";
        let mut output = Vec::new();
        let handled =
            run_chat(&resolver, input.as_bytes(), &mut output, &args(&["-f", "json"])).unwrap();

        assert_eq!(handled, 1);
        let text = String::from_utf8(output).unwrap();
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["intent"], "unknown");
        assert!(value["confidence"].is_null());
        assert_eq!(value["response"], DEFAULT_RESPONSE);
    }
}
