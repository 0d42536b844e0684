//! Error and diagnostic system for decoding upstream analysis responses.
//!
//! Every problem is a [`Diagnostic`] with a stable [`ErrorCode`] and labels
//! pointing into the response text. Decoding passes collect diagnostics and
//! fail with a [`ParseError`] carrying all of them.
//!
//! # Example
//!
//! ```
//! # use monkeyscope_ingest::error::{Diagnostic, ErrorCode};
//! # use monkeyscope_ingest::Span;
//!
//! let diag = Diagnostic::error("token #2 is missing `literal`")
//!     .with_code(ErrorCode::E003)
//!     .with_label(Span::new(40..72), "this entry")
//!     .with_help("every token needs `type`, `literal` and `position`");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod parse_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use parse_error::ParseError;
