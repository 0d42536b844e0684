//! Display spans: the highlighted-text model produced by token alignment.
//!
//! A sequence of [`DisplaySpan`]s partitions a source text. Concatenating the
//! span texts in order reproduces the source exactly, and every
//! [`SpanKind::Token`] span refers back to the token it highlights.

use serde::Serialize;

/// Classification of a display span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpanKind {
    /// Source text not covered by any token (whitespace, skipped text).
    Plain,
    /// Source text matched to a token literal.
    Token,
}

/// A contiguous run of source text, either plain or belonging to one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySpan {
    kind: SpanKind,
    text: String,
    start: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    token_index: Option<usize>,
}

impl DisplaySpan {
    /// Creates a plain span starting at byte offset `start`.
    pub fn plain(start: usize, text: impl Into<String>) -> Self {
        Self {
            kind: SpanKind::Plain,
            text: text.into(),
            start,
            token_index: None,
        }
    }

    /// Creates a token span for the token at `token_index`.
    pub fn token(start: usize, text: impl Into<String>, token_index: usize) -> Self {
        Self {
            kind: SpanKind::Token,
            text: text.into(),
            start,
            token_index: Some(token_index),
        }
    }

    pub fn kind(&self) -> SpanKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offset of the first character of this span in the source.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset one past the last character of this span.
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    /// Index of the highlighted token, `None` for plain spans.
    pub fn token_index(&self) -> Option<usize> {
        self.token_index
    }

    pub fn is_token(&self) -> bool {
        self.kind == SpanKind::Token
    }
}

/// Concatenates the span texts in order.
///
/// For a well-formed alignment this returns the original source.
///
/// ```
/// # use monkeyscope_core::highlight::{DisplaySpan, concat_spans};
/// let spans = [
///     DisplaySpan::token(0, "a", 0),
///     DisplaySpan::plain(1, " "),
///     DisplaySpan::token(2, "a", 1),
/// ];
/// assert_eq!(concat_spans(&spans), "a a");
/// ```
pub fn concat_spans(spans: &[DisplaySpan]) -> String {
    spans.iter().map(DisplaySpan::text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_span() {
        let span = DisplaySpan::plain(3, "  ");
        assert_eq!(span.kind(), SpanKind::Plain);
        assert_eq!(span.token_index(), None);
        assert_eq!(span.start(), 3);
        assert_eq!(span.end(), 5);
        assert!(!span.is_token());
    }

    #[test]
    fn test_token_span() {
        let span = DisplaySpan::token(4, "five", 1);
        assert_eq!(span.kind(), SpanKind::Token);
        assert_eq!(span.token_index(), Some(1));
        assert_eq!(span.text(), "five");
        assert!(span.is_token());
    }

    #[test]
    fn test_span_end_counts_bytes() {
        let span = DisplaySpan::plain(0, "é");
        assert_eq!(span.end(), 2);
    }

    #[test]
    fn test_serialized_shape() {
        let token = serde_json::to_value(DisplaySpan::token(0, "let", 0)).unwrap();
        assert_eq!(
            token,
            serde_json::json!({"kind": "TOKEN", "text": "let", "start": 0, "tokenIndex": 0})
        );

        let plain = serde_json::to_value(DisplaySpan::plain(3, " ")).unwrap();
        assert_eq!(
            plain,
            serde_json::json!({"kind": "PLAIN", "text": " ", "start": 3})
        );
    }
}
