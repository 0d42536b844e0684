//! Lexical tokens reported by the Monkey tokenizer and their highlighting classes.
//!
//! A [`Token`] is produced outside of Monkeyscope. Its `position` is only a
//! claim: upstream tokenizers have been observed to report offsets that
//! ignore whitespace, so consumers must treat it as a hint.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// A lexical unit with a type tag, literal text, and claimed byte offset.
///
/// Serializes with the field names used by the tokenize response:
/// `{"type": "IDENT", "literal": "x", "position": 4}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    token_type: String,
    literal: String,
    position: usize,
}

impl Token {
    pub fn new(token_type: impl Into<String>, literal: impl Into<String>, position: usize) -> Self {
        Self {
            token_type: token_type.into(),
            literal: literal.into(),
            position,
        }
    }

    /// Returns the token type tag, e.g. `IDENT` or `==`.
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Returns the literal text of the token.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Returns the claimed zero-based byte offset of the literal in the source.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the highlighting class of this token.
    pub fn category(&self) -> TokenCategory {
        TokenCategory::of(&self.token_type)
    }

    /// Returns a human readable name for the token type.
    ///
    /// ```
    /// # use monkeyscope_core::token::Token;
    /// assert_eq!(Token::new("IDENT", "x", 4).display_name(), "Identifier");
    /// assert_eq!(Token::new("==", "==", 6).display_name(), "==");
    /// ```
    pub fn display_name(&self) -> &str {
        match self.token_type.as_str() {
            "IDENT" => "Identifier",
            "INT" => "Integer",
            "STRING" => "String",
            "LET" => "Let Keyword",
            "FN" => "Function Keyword",
            "IF" => "If Keyword",
            "ELSE" => "Else Keyword",
            "RETURN" => "Return Keyword",
            "TRUE" => "Boolean True",
            "FALSE" => "Boolean False",
            "EOF" => "End of File",
            "ILLEGAL" => "Illegal Token",
            other => other,
        }
    }
}

/// Highlighting class of a token type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenCategory {
    Keyword,
    Identifier,
    Integer,
    String,
    Operator,
    Delimiter,
    Punctuation,
    EndOfFile,
    Illegal,
    Other,
}

impl TokenCategory {
    /// Classifies a token type tag.
    pub fn of(token_type: &str) -> Self {
        match token_type {
            "LET" | "IF" | "ELSE" | "RETURN" | "FN" | "TRUE" | "FALSE" => Self::Keyword,
            "IDENT" => Self::Identifier,
            "INT" => Self::Integer,
            "STRING" => Self::String,
            "+" | "-" | "*" | "/" | "=" | "==" | "!=" | "<" | ">" | "!" => Self::Operator,
            "(" | ")" | "{" | "}" | "[" | "]" => Self::Delimiter,
            ";" | "," => Self::Punctuation,
            "EOF" => Self::EndOfFile,
            "ILLEGAL" => Self::Illegal,
            _ => Self::Other,
        }
    }

    /// Returns the highlight color for this category.
    pub fn color(self) -> Color {
        let hex = match self {
            Self::Keyword => "#8b5cf6",
            Self::Identifier => "#06b6d4",
            Self::Integer => "#10b981",
            Self::String => "#f59e0b",
            Self::Operator => "#ef4444",
            Self::Delimiter => "#ec4899",
            Self::Punctuation => "#6b7280",
            Self::EndOfFile => "#64748b",
            Self::Illegal => "#dc2626",
            Self::Other => "#94a3b8",
        };
        Color::new(hex).expect("category colors are valid CSS colors")
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Keyword => "Keywords",
            Self::Identifier => "Identifiers",
            Self::Integer => "Numbers",
            Self::String => "Strings",
            Self::Operator => "Operators",
            Self::Delimiter => "Delimiters",
            Self::Punctuation => "Punctuation",
            Self::EndOfFile => "End of File",
            Self::Illegal => "Errors",
            Self::Other => "Other",
        };
        write!(f, "{name}")
    }
}
