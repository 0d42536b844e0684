//! Export of display models to output formats.
//!
//! ```text
//! Tokenize response --decode--> Tokens --align--> Alignment --+
//!                                                             +--> export (this module)
//! Parse response --decode--> SyntaxTree --layout--> AstGraph -+
//! ```
//!
//! # Available Backends
//!
//! - [`svg`]: SVG documents via [`svg::SvgExporter`]
//!
//! JSON output needs no backend: [`AstGraph`](monkeyscope_core::graph::AstGraph)
//! and [`Alignment`](crate::Alignment) serialize directly.

pub mod svg;

use thiserror::Error;

/// Errors that can occur while exporting a display model.
///
/// Converted into [`MonkeyscopeError::Export`](crate::MonkeyscopeError::Export)
/// at the crate boundary.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The configured style cannot be applied.
    #[error("Invalid style: {0}")]
    Style(String),

    /// A token span refers to a token that is not in the token list.
    #[error("display span refers to token #{index}, but only {count} tokens were given")]
    UnknownToken { index: usize, count: usize },
}
