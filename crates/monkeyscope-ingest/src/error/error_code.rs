//! Error codes for the Monkeyscope diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Response document errors
//! - `E1xx` - Errors reported by the upstream analyzer
//! - `E2xx` - Syntax tree errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Response Document Errors (E0xx)
    // =========================================================================
    /// Malformed JSON.
    ///
    /// The response is not a syntactically valid JSON document.
    E001,

    /// Unexpected response shape.
    ///
    /// The document is valid JSON but does not have the fields of a
    /// tokenize or parse response.
    E002,

    /// Invalid token entry.
    ///
    /// An element of the `tokens` array lacks `type`, `literal` or
    /// `position`, or one of them has the wrong JSON type.
    E003,

    // =========================================================================
    // Upstream Errors (E1xx)
    // =========================================================================
    /// Upstream analyzer error.
    ///
    /// The tokenizer or parser reported a failure in the `error` field.
    /// The message is passed through verbatim.
    E100,

    // =========================================================================
    // Syntax Tree Errors (E2xx)
    // =========================================================================
    /// Root is not a syntax node.
    ///
    /// The `ast` field is missing, null, or not a JSON object.
    E200,

    /// Syntax tree too deep.
    ///
    /// The tree nests deeper than the configured maximum depth.
    E201,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E100 => "E100",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "malformed JSON",
            ErrorCode::E002 => "unexpected response shape",
            ErrorCode::E003 => "invalid token entry",
            ErrorCode::E100 => "upstream analyzer error",
            ErrorCode::E200 => "root is not a syntax node",
            ErrorCode::E201 => "syntax tree too deep",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
