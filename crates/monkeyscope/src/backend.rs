//! Analyzer backends producing tokenize and parse responses.
//!
//! An [`Analyzer`] answers the two requests Monkeyscope needs from a Monkey
//! language service. It returns the raw JSON response; decoding is left to
//! [`monkeyscope_ingest`] so that diagnostics can point into the response
//! text.
//!
//! - [`RecordedAnalyzer`] replays responses captured earlier in files.
//! - [`CommandAnalyzer`] runs a local program once per request.

use std::{
    fmt, fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
};

use log::{debug, info};
use thiserror::Error;

use crate::config::BackendConfig;

/// A request made to an analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Tokenize,
    Parse,
}

impl Action {
    /// Returns the name passed to analyzer programs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tokenize => "tokenize",
            Self::Parse => "parse",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while obtaining a response from an analyzer.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("no recorded {action} response was provided")]
    NoRecording { action: Action },

    #[error("failed to read recorded response `{}`: {source}", path.display())]
    Recording { path: PathBuf, source: io::Error },

    #[error("failed to run analyzer `{program}`: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("analyzer `{program}` failed to {action} ({status}): {stderr}")]
    Failed {
        program: String,
        action: Action,
        status: String,
        stderr: String,
    },

    #[error("analyzer `{program}` printed a {action} response that is not UTF-8")]
    InvalidOutput { program: String, action: Action },
}

/// A service that tokenizes and parses Monkey source text.
pub trait Analyzer {
    /// Returns the raw tokenize response for `source`.
    fn tokenize(&self, source: &str) -> Result<String, AnalyzerError>;

    /// Returns the raw parse response for `source`.
    fn parse(&self, source: &str) -> Result<String, AnalyzerError>;
}

/// Replays tokenize and parse responses recorded in files.
///
/// The source text is ignored; the recording is assumed to belong to it.
#[derive(Debug, Clone, Default)]
pub struct RecordedAnalyzer {
    tokenize: Option<PathBuf>,
    parse: Option<PathBuf>,
}

impl RecordedAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokenize_response(mut self, path: impl Into<PathBuf>) -> Self {
        self.tokenize = Some(path.into());
        self
    }

    pub fn with_parse_response(mut self, path: impl Into<PathBuf>) -> Self {
        self.parse = Some(path.into());
        self
    }

    fn replay(path: Option<&Path>, action: Action) -> Result<String, AnalyzerError> {
        let path = path.ok_or(AnalyzerError::NoRecording { action })?;
        info!(path = path.display().to_string(), action = action.as_str(); "Replaying recorded response");

        fs::read_to_string(path).map_err(|source| AnalyzerError::Recording {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Analyzer for RecordedAnalyzer {
    fn tokenize(&self, _source: &str) -> Result<String, AnalyzerError> {
        Self::replay(self.tokenize.as_deref(), Action::Tokenize)
    }

    fn parse(&self, _source: &str) -> Result<String, AnalyzerError> {
        Self::replay(self.parse.as_deref(), Action::Parse)
    }
}

/// Runs `program [args..] <action>` with the source on stdin and reads the
/// response from stdout.
#[derive(Debug, Clone)]
pub struct CommandAnalyzer {
    program: String,
    args: Vec<String>,
}

impl CommandAnalyzer {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            program: config.program().to_string(),
            args: config.args().to_vec(),
        }
    }

    fn run(&self, source: &str, action: Action) -> Result<String, AnalyzerError> {
        info!(program = self.program.as_str(), action = action.as_str(); "Running analyzer");
        let spawn_error = |source: io::Error| AnalyzerError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(action.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        // Feed stdin from a separate thread so a program that answers before
        // reading all of its input cannot block on a full stdout pipe.
        let stdin = child.stdin.take();
        let output = thread::scope(|scope| {
            if let Some(mut stdin) = stdin {
                scope.spawn(move || {
                    if let Err(err) = stdin.write_all(source.as_bytes()) {
                        debug!(err:err; "Analyzer closed stdin early");
                    }
                });
            }
            child.wait_with_output()
        })
        .map_err(spawn_error)?;

        if !output.status.success() {
            return Err(AnalyzerError::Failed {
                program: self.program.clone(),
                action,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!(bytes = output.stdout.len(); "Analyzer responded");
        String::from_utf8(output.stdout).map_err(|_| AnalyzerError::InvalidOutput {
            program: self.program.clone(),
            action,
        })
    }
}

impl Analyzer for CommandAnalyzer {
    fn tokenize(&self, source: &str) -> Result<String, AnalyzerError> {
        self.run(source, Action::Tokenize)
    }

    fn parse(&self, source: &str) -> Result<String, AnalyzerError> {
        self.run(source, Action::Parse)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn test_recorded_analyzer_replays_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"tokens": []}}"#).unwrap();

        let analyzer = RecordedAnalyzer::new().with_tokenize_response(file.path());
        assert_eq!(analyzer.tokenize("ignored").unwrap(), r#"{"tokens": []}"#);
        assert!(matches!(
            analyzer.parse("ignored"),
            Err(AnalyzerError::NoRecording {
                action: Action::Parse
            })
        ));
    }

    #[test]
    fn test_recorded_analyzer_missing_file() {
        let analyzer = RecordedAnalyzer::new().with_parse_response("/nonexistent/parse.json");
        let err = analyzer.parse("").unwrap_err();

        assert!(matches!(err, AnalyzerError::Recording { .. }));
        assert!(err.to_string().contains("/nonexistent/parse.json"));
    }

    #[test]
    fn test_missing_program() {
        let analyzer = CommandAnalyzer::new(&BackendConfig::new(
            "monkeyscope-test-no-such-program",
            Vec::new(),
        ));
        assert!(matches!(
            analyzer.tokenize("let x = 1;"),
            Err(AnalyzerError::Spawn { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_analyzer_echoes_action_and_source() {
        // `sh -c <script> <name> <action>`: the action arrives as `$1`.
        let config = BackendConfig::new(
            "sh",
            vec![
                "-c".to_string(),
                r#"printf '{"action": "%s", "source": "%s"}' "$1" "$(cat)""#.to_string(),
                "analyzer".to_string(),
            ],
        );
        let analyzer = CommandAnalyzer::new(&config);

        assert_eq!(
            analyzer.parse("let x = 1;").unwrap(),
            r#"{"action": "parse", "source": "let x = 1;"}"#
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_command_analyzer_failure_carries_stderr() {
        let config = BackendConfig::new(
            "sh",
            vec![
                "-c".to_string(),
                "echo 'unexpected token' >&2; exit 3".to_string(),
            ],
        );
        let err = CommandAnalyzer::new(&config).tokenize("").unwrap_err();

        let AnalyzerError::Failed { action, stderr, .. } = &err else {
            panic!("expected a failed run, got {err:?}");
        };
        assert_eq!(*action, Action::Tokenize);
        assert_eq!(stderr, "unexpected token");
    }
}
