//! Diagnostics raised while decoding a response, with labeled spans into
//! the response text.

use std::fmt;

use crate::{error::ErrorCode, span::Span};

/// Whether a diagnostic rejects the response or only part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The response cannot be visualized.
    Error,
    /// The response was accepted with some input ignored, e.g. a child entry
    /// that is not a syntax node.
    Warning,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        *self == Self::Error
    }

    pub fn is_warning(&self) -> bool {
        *self == Self::Warning
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
        })
    }
}

/// A message pinned to a byte range of the response.
///
/// The primary label marks the offending bytes; secondary labels give
/// context such as the enclosing token entry.
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    primary: bool,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            primary: true,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            primary: false,
            ..Self::primary(span, message)
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }
}

/// One problem found in an upstream response.
///
/// Rendered by the CLI as, for example:
///
/// ```text
/// error[E001]: tokenize response is not valid JSON: expected value
///   |
/// 1 | {"tokens": [oops]}
///   |             ^ here
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// ```
    /// # use monkeyscope_ingest::error::{Diagnostic, ErrorCode};
    /// let diag = Diagnostic::error("syntax tree is nested deeper than 100 levels")
    ///     .with_code(ErrorCode::E201)
    ///     .with_help("raise `layout.max_depth` to render deeper trees");
    /// assert!(diag.severity().is_error());
    /// assert_eq!(diag.code(), Some(ErrorCode::E201));
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, message.into())
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, message.into())
    }

    fn with_severity(severity: Severity, message: String) -> Self {
        Self {
            severity,
            code: None,
            message,
            labels: Vec::new(),
            help: None,
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Labels in the order they were attached.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn with_code(self, code: ErrorCode) -> Self {
        Self {
            code: Some(code),
            ..self
        }
    }

    /// Attaches a primary label.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_help(self, help: impl Into<String>) -> Self {
        Self {
            help: Some(help.into()),
            ..self
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{}[{code}]: {}", self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_diagnostic_is_bare() {
        let diag = Diagnostic::error("bad response");

        assert_eq!(diag.severity(), Severity::Error);
        assert_eq!(diag.message(), "bad response");
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_labels_keep_order_and_kind() {
        let diag = Diagnostic::error("invalid token entry at index 0")
            .with_code(ErrorCode::E003)
            .with_label(Span::new(12..40), "missing field `literal`")
            .with_secondary_label(Span::new(0..50), "in this token entry")
            .with_help("add the field");

        let labels = diag.labels();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].is_primary());
        assert_eq!(labels[0].span().start(), 12);
        assert_eq!(labels[0].message(), "missing field `literal`");
        assert!(!labels[1].is_primary());
        assert_eq!(diag.help(), Some("add the field"));
    }

    #[test]
    fn test_display() {
        let coded = Diagnostic::error("unexpected EOF").with_code(ErrorCode::E001);
        assert_eq!(coded.to_string(), "error[E001]: unexpected EOF");

        let warning = Diagnostic::warning("skipped child");
        assert!(warning.severity().is_warning());
        assert_eq!(warning.to_string(), "warning: skipped child");
    }
}
