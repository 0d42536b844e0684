//! Monkeyscope CLI entry point.

use std::{process::ExitCode, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info, warn};
use miette::GraphicalReportHandler;

use monkeyscope::MonkeyscopeError;
use monkeyscope_cli::{Args, error_adapter::to_reportables};

fn main() -> ExitCode {
    // Panics are reported through miette like every other failure
    miette::set_panic_hook();

    let args = Args::parse();
    init_logger(&args.log_level);
    debug!(args:?; "Parsed arguments");

    match monkeyscope_cli::run(&args) {
        Ok(()) => {
            info!(output_file = args.output; "Completed successfully");
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

/// Starts `env_logger` at `level`, falling back to `warn` for unknown names.
fn init_logger(level: &str) {
    let parsed = LevelFilter::from_str(level);

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(*parsed.as_ref().unwrap_or(&LevelFilter::Warn))
        .init();

    match parsed {
        Ok(log_level) => info!(log_level:?; "Starting Monkeyscope"),
        Err(_) => warn!(requested = level; "Unknown log level, using 'warn'"),
    }
}

/// Logs one rendered report per diagnostic of `err`.
fn report(err: &MonkeyscopeError) {
    let handler = GraphicalReportHandler::new();
    let reportables = to_reportables(err);

    for reportable in &reportables {
        let mut rendered = String::new();
        if let Err(fmt_err) = handler.render_report(&mut rendered, reportable) {
            // Fall back to the plain message
            error!(fmt_err:err; "{reportable}");
            continue;
        }
        error!("{rendered}");
    }

    if reportables.len() > 1 {
        error!(problems = reportables.len(); "Monkeyscope failed");
    }
}
