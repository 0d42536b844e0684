//! Command-line argument definitions for the Monkeyscope CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. The subcommand picks the view to produce; the global
//! options control output, configuration file selection and logging.

use std::fmt;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for the Monkeyscope tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the output file
    #[arg(short, long, default_value = "out.svg", global = true)]
    pub output: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Svg, global = true)]
    pub format: Format,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

/// The view to produce.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Highlight the tokens of a Monkey source file
    Tokens(Input),

    /// Lay out the syntax tree of a Monkey source file
    Ast(Input),
}

impl Command {
    pub fn input(&self) -> &Input {
        match self {
            Self::Tokens(input) | Self::Ast(input) => input,
        }
    }
}

/// Source file and optional recorded analyzer response.
#[derive(clap::Args, Debug)]
pub struct Input {
    /// Path to the Monkey source file
    pub source: String,

    /// Recorded analyzer response to use instead of the configured backend
    #[arg(long)]
    pub response: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Svg,
    Json,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Svg => f.write_str("svg"),
            Self::Json => f.write_str("json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tokens_command() {
        let args = Args::try_parse_from([
            "monkeyscope",
            "tokens",
            "add.mk",
            "--response",
            "add.tokens.json",
            "--format",
            "json",
        ])
        .unwrap();

        assert!(matches!(args.command, Command::Tokens(_)));
        assert_eq!(args.command.input().source, "add.mk");
        assert_eq!(
            args.command.input().response.as_deref(),
            Some("add.tokens.json")
        );
        assert_eq!(args.format, Format::Json);
        assert_eq!(args.output, "out.svg");
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args =
            Args::try_parse_from(["monkeyscope", "ast", "add.mk", "-o", "tree.svg", "-c", "x.toml"])
                .unwrap();

        assert!(matches!(args.command, Command::Ast(_)));
        assert_eq!(args.output, "tree.svg");
        assert_eq!(args.config.as_deref(), Some("x.toml"));
        assert_eq!(args.format, Format::Svg);
    }

    #[test]
    fn test_missing_subcommand() {
        assert!(Args::try_parse_from(["monkeyscope"]).is_err());
    }
}
