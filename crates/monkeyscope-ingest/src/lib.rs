//! Monkeyscope Ingest
//!
//! Decodes the responses of an external Monkey language service into the
//! typed inputs of the Monkeyscope transforms:
//!
//! - [`decode_tokens`] reads a tokenize response into a list of
//!   [`Token`](monkeyscope_core::token::Token)s.
//! - [`decode_syntax_tree`] reads a parse response into a [`SyntaxTree`].
//! - [`syntax_tree_from_value`] decodes an already parsed JSON tree.
//!
//! Problems are reported as [`ParseError`]s carrying one or more
//! [`Diagnostic`](error::Diagnostic)s with error codes and labeled byte
//! spans into the response text.
//!
//! # Example
//!
//! ```
//! use monkeyscope_ingest::{DecodeOptions, decode_syntax_tree};
//!
//! let tree = decode_syntax_tree(
//!     r#"{"ast": {"type": "Program", "statements": []}}"#,
//!     DecodeOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(tree.node(tree.root()).label(), "Program");
//! ```

mod decode;
pub mod error;
mod response;
mod span;
pub mod syntax;

pub use decode::{DecodeOptions, syntax_tree_from_value};
pub use error::ParseError;
pub use response::{decode_syntax_tree, decode_tokens};
pub use span::Span;
pub use syntax::SyntaxTree;
