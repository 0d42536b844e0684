//! Error types for Monkeyscope operations.
//!
//! This module provides the main error type [`MonkeyscopeError`] which wraps
//! the error conditions of every stage: obtaining responses, decoding them
//! and exporting the result.

use std::io;

use thiserror::Error;

use monkeyscope_ingest::ParseError;

use crate::{backend::AnalyzerError, export::ExportError};

/// The main error type for Monkeyscope operations.
///
/// # Diagnostic Variants
///
/// The `Ingest` variant keeps the response text its diagnostics point into,
/// so that reporters can show the labeled spans in context.
#[derive(Debug, Error)]
pub enum MonkeyscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Ingest { err: ParseError, src: String },

    #[error("Analyzer error: {0}")]
    Analyzer(#[from] AnalyzerError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Neither a recorded response nor an analyzer program is available.
    #[error("No analyzer available: no recorded response was given and no backend is configured")]
    NoAnalyzer,
}

impl MonkeyscopeError {
    /// Create a new `Ingest` error with the response text it was decoded from.
    pub fn new_ingest_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Ingest {
            err,
            src: src.into(),
        }
    }
}
