//! Accumulation of diagnostics across a decoding pass.

use crate::error::{Diagnostic, ParseError};

/// Gathers diagnostics so that a pass over a response reports every bad
/// token entry or skipped child, not only the first.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Fails with every collected diagnostic if any of them is an error,
    /// otherwise hands back the warnings.
    pub fn finish(self) -> Result<Vec<Diagnostic>, ParseError> {
        if self
            .diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity().is_error())
        {
            return Err(ParseError::new(self.diagnostics));
        }
        Ok(self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_collected() {
        assert!(DiagnosticCollector::new().finish().unwrap().is_empty());
    }

    #[test]
    fn test_warnings_only() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("`Body` of `FunctionLiteral` skipped"));
        collector.emit(Diagnostic::warning("`Left` of `InfixExpression` skipped"));

        assert_eq!(collector.finish().unwrap().len(), 2);
    }

    #[test]
    fn test_one_error_fails_with_everything() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("`Name` of `LetStatement` skipped"));
        collector.emit(Diagnostic::error("invalid token entry at index 3"));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 2);
        assert!(err.diagnostics()[0].severity().is_warning());
    }
}
