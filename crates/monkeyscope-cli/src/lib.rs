//! CLI logic for the Monkeyscope tool.
//!
//! Reads a Monkey source file, obtains tokenize or parse results for it from
//! a recorded response or the configured analyzer program, and writes the
//! highlighted tokens or the syntax tree graph as SVG or JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command, Format, Input};

use std::{fs, io};

use log::info;
use serde::Serialize;

use monkeyscope::{
    MonkeyscopeError, Visualizer,
    backend::{Analyzer, CommandAnalyzer, RecordedAnalyzer},
    config::AppConfig,
};

/// Run the Monkeyscope CLI application
///
/// # Errors
///
/// Returns `MonkeyscopeError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - A missing analyzer backend when no recorded response is given
/// - Analyzer failures and malformed responses
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), MonkeyscopeError> {
    let input = args.command.input();
    info!(
        source_path = input.source,
        output_path = args.output,
        format = args.format.to_string();
        "Processing source"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let analyzer = select_analyzer(&args.command, &app_config)?;
    let source = fs::read_to_string(&input.source)?;

    let visualizer = Visualizer::new(app_config);
    let output = match &args.command {
        Command::Tokens(_) => {
            let tokens = visualizer.tokenize(analyzer.as_ref(), &source)?;
            let alignment = visualizer.align(&source, &tokens);
            match args.format {
                Format::Svg => visualizer.render_tokens_svg(&tokens, &alignment)?,
                Format::Json => to_json(&alignment)?,
            }
        }
        Command::Ast(_) => {
            let tree = visualizer.parse(analyzer.as_ref(), &source)?;
            let graph = visualizer.build_graph(&tree);
            match args.format {
                Format::Svg => visualizer.render_graph_svg(&graph)?,
                Format::Json => to_json(&graph)?,
            }
        }
    };

    fs::write(&args.output, output)?;

    info!(output_file = args.output; "Output written successfully");

    Ok(())
}

/// Picks the recorded response when one is given, the configured analyzer
/// program otherwise.
fn select_analyzer(
    command: &Command,
    config: &AppConfig,
) -> Result<Box<dyn Analyzer>, MonkeyscopeError> {
    if let Some(response) = &command.input().response {
        let recorded = match command {
            Command::Tokens(_) => RecordedAnalyzer::new().with_tokenize_response(response),
            Command::Ast(_) => RecordedAnalyzer::new().with_parse_response(response),
        };
        return Ok(Box::new(recorded));
    }

    match config.backend() {
        Some(backend) => Ok(Box::new(CommandAnalyzer::new(backend))),
        None => Err(MonkeyscopeError::NoAnalyzer),
    }
}

fn to_json(model: &impl Serialize) -> Result<String, MonkeyscopeError> {
    serde_json::to_string_pretty(model).map_err(|err| MonkeyscopeError::Io(io::Error::from(err)))
}
