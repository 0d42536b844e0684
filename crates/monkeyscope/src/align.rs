//! Realignment of tokens with the source text they were read from.
//!
//! Upstream tokenizers report a claimed offset for every token, but those
//! offsets cannot be trusted: some count only literal lengths and drift
//! further with every whitespace run. The [`TokenAligner`] therefore locates
//! each literal itself and produces display spans that partition the source
//! exactly, whatever the offsets say.
//!
//! Tokens are processed in list order against a cursor that only moves
//! forward. For each token the aligner tries, in order:
//!
//! 1. the declared offset, if the literal is found there at or after the
//!    cursor (only with [`AlignStrategy::DeclaredFirst`]);
//! 2. the first occurrence of the literal at or after the cursor;
//! 3. a window around the declared offset, to tell a literal that exists but
//!    lies behind the cursor apart from one that does not exist at all.
//!
//! A token that cannot be placed is left out of the spans and reported as an
//! [`AlignmentNote`]; aligning never fails.

use std::fmt;

use log::{debug, info, warn};
use serde::Serialize;

use monkeyscope_core::{highlight::DisplaySpan, token::Token};

use crate::config::{AlignConfig, AlignStrategy};

/// A non-fatal observation made while aligning one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum AlignmentNote {
    /// The token was placed at `actual` although it declared `declared`.
    Drifted {
        token_index: usize,
        declared: usize,
        actual: usize,
    },
    /// The literal was not found anywhere it could be placed.
    Unmatched { token_index: usize, literal: String },
    /// The literal was only found starting at `found_at`, before the cursor,
    /// where it would overlap text already emitted.
    BehindCursor {
        token_index: usize,
        found_at: usize,
        cursor: usize,
    },
    /// The literal is empty and covers no text.
    EmptyLiteral { token_index: usize },
}

impl AlignmentNote {
    /// Returns the index of the token this note is about.
    pub fn token_index(&self) -> usize {
        match self {
            Self::Drifted { token_index, .. }
            | Self::Unmatched { token_index, .. }
            | Self::BehindCursor { token_index, .. }
            | Self::EmptyLiteral { token_index } => *token_index,
        }
    }

    /// Returns `true` if the token was left out of the spans.
    pub fn is_dropped(&self) -> bool {
        !matches!(self, Self::Drifted { .. })
    }
}

impl fmt::Display for AlignmentNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drifted {
                token_index,
                declared,
                actual,
            } => write!(
                f,
                "token #{token_index} declared offset {declared} but was found at {actual}"
            ),
            Self::Unmatched {
                token_index,
                literal,
            } => write!(f, "token #{token_index} `{literal}` was not found in the source"),
            Self::BehindCursor {
                token_index,
                found_at,
                cursor,
            } => write!(
                f,
                "token #{token_index} was only found at {found_at}, behind the cursor at {cursor}"
            ),
            Self::EmptyLiteral { token_index } => {
                write!(f, "token #{token_index} has an empty literal")
            }
        }
    }
}

/// Display spans of a source text together with the notes gathered while
/// producing them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Alignment {
    spans: Vec<DisplaySpan>,
    notes: Vec<AlignmentNote>,
}

impl Alignment {
    /// Spans in source order; their texts concatenate to the source.
    pub fn spans(&self) -> &[DisplaySpan] {
        &self.spans
    }

    pub fn notes(&self) -> &[AlignmentNote] {
        &self.notes
    }

    /// Returns the indices of the tokens that were left out of the spans.
    pub fn dropped_tokens(&self) -> Vec<usize> {
        self.notes
            .iter()
            .filter(|note| note.is_dropped())
            .map(AlignmentNote::token_index)
            .collect()
    }

    pub fn into_spans(self) -> Vec<DisplaySpan> {
        self.spans
    }
}

/// Aligns token lists with their source text.
#[derive(Debug, Clone, Default)]
pub struct TokenAligner {
    config: AlignConfig,
}

impl TokenAligner {
    pub fn new(config: AlignConfig) -> Self {
        Self { config }
    }

    /// Partitions `source` into plain and token spans.
    ///
    /// The returned spans are gap free, in increasing source order, and list
    /// tokens in the order they were given. An empty source yields no spans;
    /// an empty token list yields a single plain span of the whole source.
    pub fn align(&self, source: &str, tokens: &[Token]) -> Alignment {
        let mut state = AlignState::new(source);

        for (index, token) in tokens.iter().enumerate() {
            self.place(&mut state, index, token);
        }
        state.finish_plain();

        let AlignState { spans, notes, .. } = state;
        info!(
            spans_count = spans.len(),
            tokens_count = tokens.len(),
            notes_count = notes.len();
            "Tokens aligned"
        );

        Alignment { spans, notes }
    }

    fn place(&self, state: &mut AlignState<'_>, index: usize, token: &Token) {
        let literal = token.literal();
        let declared = token.position();

        if literal.is_empty() {
            debug!(token_index = index, token_type = token.token_type(); "Skipping empty literal");
            state.notes.push(AlignmentNote::EmptyLiteral { token_index: index });
            return;
        }

        let found = self
            .at_declared(state, literal, declared)
            .or_else(|| state.search_forward(literal));

        let Some(start) = found else {
            let note = match self.search_window(state.source, literal, declared) {
                Some(found_at) => {
                    warn!(token_index = index, found_at, cursor = state.cursor; "Token found only behind the cursor");
                    AlignmentNote::BehindCursor {
                        token_index: index,
                        found_at,
                        cursor: state.cursor,
                    }
                }
                None => {
                    warn!(token_index = index, literal; "Token not found in source");
                    AlignmentNote::Unmatched {
                        token_index: index,
                        literal: literal.to_string(),
                    }
                }
            };
            state.notes.push(note);
            return;
        };

        if start != declared {
            debug!(token_index = index, declared, actual = start; "Token offset drifted");
            state.notes.push(AlignmentNote::Drifted {
                token_index: index,
                declared,
                actual: start,
            });
        }
        state.emit_token(start, literal, index);
    }

    fn at_declared(&self, state: &AlignState<'_>, literal: &str, declared: usize) -> Option<usize> {
        if self.config.strategy() != AlignStrategy::DeclaredFirst || declared < state.cursor {
            return None;
        }
        let end = declared.checked_add(literal.len())?;
        (state.source.get(declared..end) == Some(literal)).then_some(declared)
    }

    /// Searches around `declared`, widened to char boundaries.
    fn search_window(&self, source: &str, literal: &str, declared: usize) -> Option<usize> {
        let radius = self.config.fallback_window();
        let mut low = declared.saturating_sub(radius).min(source.len());
        let mut high = declared
            .saturating_add(literal.len())
            .saturating_add(radius)
            .min(source.len());

        while !source.is_char_boundary(low) {
            low -= 1;
        }
        while !source.is_char_boundary(high) {
            high += 1;
        }

        source[low..high].find(literal).map(|rel| low + rel)
    }
}

struct AlignState<'a> {
    source: &'a str,
    cursor: usize,
    spans: Vec<DisplaySpan>,
    notes: Vec<AlignmentNote>,
}

impl<'a> AlignState<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            cursor: 0,
            spans: Vec::new(),
            notes: Vec::new(),
        }
    }

    fn search_forward(&self, literal: &str) -> Option<usize> {
        self.source[self.cursor..]
            .find(literal)
            .map(|rel| self.cursor + rel)
    }

    fn emit_token(&mut self, start: usize, literal: &str, index: usize) {
        debug_assert!(start >= self.cursor);
        if start > self.cursor {
            self.spans.push(DisplaySpan::plain(
                self.cursor,
                &self.source[self.cursor..start],
            ));
        }
        self.spans.push(DisplaySpan::token(start, literal, index));
        self.cursor = start + literal.len();
    }

    fn finish_plain(&mut self) {
        if self.cursor < self.source.len() {
            self.spans
                .push(DisplaySpan::plain(self.cursor, &self.source[self.cursor..]));
            self.cursor = self.source.len();
        }
    }
}

/// Aligns `tokens` with `source` using the default configuration and
/// returns only the spans.
///
/// ```
/// # use monkeyscope::align;
/// # use monkeyscope::token::Token;
/// # use monkeyscope::highlight::concat_spans;
/// let tokens = [Token::new("IDENT", "a", 0), Token::new("IDENT", "a", 2)];
/// let spans = align("a a", &tokens);
///
/// assert_eq!(spans.len(), 3);
/// assert_eq!(spans[2].token_index(), Some(1));
/// assert_eq!(concat_spans(&spans), "a a");
/// ```
pub fn align(source: &str, tokens: &[Token]) -> Vec<DisplaySpan> {
    TokenAligner::default().align(source, tokens).into_spans()
}

#[cfg(test)]
mod tests {
    use monkeyscope_core::highlight::{SpanKind, concat_spans};
    use proptest::prelude::*;

    use super::*;

    fn cursor_aligner() -> TokenAligner {
        TokenAligner::new(AlignConfig::new(AlignStrategy::Cursor, 20))
    }

    fn tok(token_type: &str, literal: &str, position: usize) -> Token {
        Token::new(token_type, literal, position)
    }

    fn texts(alignment: &Alignment) -> Vec<(SpanKind, &str)> {
        alignment
            .spans()
            .iter()
            .map(|span| (span.kind(), span.text()))
            .collect()
    }

    #[test]
    fn test_empty_source() {
        let alignment = TokenAligner::default().align("", &[]);
        assert!(alignment.spans().is_empty());
        assert!(alignment.notes().is_empty());
    }

    #[test]
    fn test_empty_token_list() {
        let alignment = TokenAligner::default().align("let x = 5;", &[]);
        assert_eq!(alignment.spans(), &[DisplaySpan::plain(0, "let x = 5;")]);
    }

    #[test]
    fn test_duplicate_literals() {
        let tokens = [tok("IDENT", "a", 0), tok("IDENT", "a", 2)];

        for aligner in [TokenAligner::default(), cursor_aligner()] {
            let alignment = aligner.align("a a", &tokens);
            assert_eq!(
                alignment.spans(),
                &[
                    DisplaySpan::token(0, "a", 0),
                    DisplaySpan::plain(1, " "),
                    DisplaySpan::token(2, "a", 1),
                ]
            );
            assert!(alignment.notes().is_empty());
        }
    }

    #[test]
    fn test_declared_offset_wins_over_earlier_occurrence() {
        // The first `a` is part of `ab`; the token declares the standalone one.
        let tokens = [tok("IDENT", "a", 3)];

        let declared = TokenAligner::default().align("ab a", &tokens);
        assert_eq!(
            texts(&declared),
            vec![(SpanKind::Plain, "ab "), (SpanKind::Token, "a")]
        );

        let cursor = cursor_aligner().align("ab a", &tokens);
        assert_eq!(
            texts(&cursor),
            vec![(SpanKind::Token, "a"), (SpanKind::Plain, "b a")]
        );
        assert_eq!(
            cursor.notes(),
            &[AlignmentNote::Drifted {
                token_index: 0,
                declared: 3,
                actual: 0
            }]
        );
    }

    #[test]
    fn test_drifting_offsets_fall_back_to_search() {
        // Offsets that only count literal lengths.
        let tokens = [
            tok("LET", "let", 0),
            tok("IDENT", "x", 3),
            tok("=", "=", 4),
            tok("INT", "5", 5),
            tok(";", ";", 6),
        ];

        let alignment = TokenAligner::default().align("let x = 5;", &tokens);
        assert_eq!(
            texts(&alignment),
            vec![
                (SpanKind::Token, "let"),
                (SpanKind::Plain, " "),
                (SpanKind::Token, "x"),
                (SpanKind::Plain, " "),
                (SpanKind::Token, "="),
                (SpanKind::Plain, " "),
                (SpanKind::Token, "5"),
                (SpanKind::Token, ";"),
            ]
        );
        assert_eq!(alignment.notes().len(), 4);
        assert_eq!(
            alignment.notes()[0],
            AlignmentNote::Drifted {
                token_index: 1,
                declared: 3,
                actual: 4
            }
        );
        assert!(alignment.dropped_tokens().is_empty());
    }

    #[test]
    fn test_absent_literal_is_dropped() {
        let tokens = [tok("IDENT", "x", 0), tok("IDENT", "zzz", 2), tok("INT", "1", 4)];
        let alignment = TokenAligner::default().align("x + 1", &tokens);

        assert_eq!(concat_spans(alignment.spans()), "x + 1");
        let indices: Vec<_> = alignment
            .spans()
            .iter()
            .filter_map(DisplaySpan::token_index)
            .collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(
            alignment.notes(),
            &[AlignmentNote::Unmatched {
                token_index: 1,
                literal: "zzz".to_string()
            }]
        );
        assert_eq!(alignment.dropped_tokens(), vec![1]);
    }

    #[test]
    fn test_literal_behind_cursor_is_reported() {
        let tokens = [tok("IDENT", "ab", 0), tok("IDENT", "b", 1)];
        let alignment = TokenAligner::default().align("ab", &tokens);

        assert_eq!(alignment.spans(), &[DisplaySpan::token(0, "ab", 0)]);
        assert_eq!(
            alignment.notes(),
            &[AlignmentNote::BehindCursor {
                token_index: 1,
                found_at: 1,
                cursor: 2
            }]
        );
    }

    #[test]
    fn test_literal_outside_window_is_unmatched() {
        let source = format!("b{}ab", " ".repeat(40));
        let tokens = [tok("IDENT", "ab", 41), tok("IDENT", "b", 0)];
        let alignment = TokenAligner::default().align(&source, &tokens);

        // `b` exists at 0 and 42, both behind the cursor; only 0 is in the window.
        assert_eq!(
            alignment.notes(),
            &[AlignmentNote::BehindCursor {
                token_index: 1,
                found_at: 0,
                cursor: 43
            }]
        );

        let tokens = [tok("IDENT", "ab", 41), tok("IDENT", "b", 100)];
        let alignment = TokenAligner::default().align(&source, &tokens);
        assert!(matches!(
            alignment.notes()[0],
            AlignmentNote::Unmatched { token_index: 1, .. }
        ));
    }

    #[test]
    fn test_empty_literal_is_skipped() {
        let tokens = [tok("INT", "5", 0), tok("EOF", "", 1)];
        let alignment = TokenAligner::default().align("5", &tokens);

        assert_eq!(alignment.spans(), &[DisplaySpan::token(0, "5", 0)]);
        assert_eq!(
            alignment.notes(),
            &[AlignmentNote::EmptyLiteral { token_index: 1 }]
        );
    }

    #[test]
    fn test_multibyte_source() {
        let source = "let s = \"héllo\"; s";
        let tokens = [
            tok("LET", "let", 0),
            tok("IDENT", "s", 2),
            tok("STRING", "héllo", 9),
            tok(";", ";", 16),
            tok("IDENT", "s", 17),
        ];

        let alignment = TokenAligner::default().align(source, &tokens);
        assert_eq!(concat_spans(alignment.spans()), source);
        assert_eq!(alignment.spans().last().map(DisplaySpan::start), Some(18));
    }

    #[test]
    fn test_window_bounds_snap_to_char_boundaries() {
        let aligner = TokenAligner::new(AlignConfig::new(AlignStrategy::Cursor, 0));

        // The window would start in the middle of the second `é`.
        let alignment = aligner.align("ééx", &[tok("IDENT", "x", 4), tok("IDENT", "é", 3)]);
        assert_eq!(
            alignment.notes(),
            &[AlignmentNote::BehindCursor {
                token_index: 1,
                found_at: 2,
                cursor: 5
            }]
        );

        // The window would end in the middle of the first `é`.
        let alignment = aligner.align("xéé", &[tok("IDENT", "éé", 1), tok("IDENT", "é", 0)]);
        assert_eq!(
            alignment.notes(),
            &[AlignmentNote::BehindCursor {
                token_index: 1,
                found_at: 1,
                cursor: 5
            }]
        );
    }

    #[test]
    fn test_note_serialization() {
        let note = AlignmentNote::BehindCursor {
            token_index: 2,
            found_at: 1,
            cursor: 4,
        };
        assert_eq!(
            serde_json::to_value(&note).unwrap(),
            serde_json::json!({"kind": "behind-cursor", "tokenIndex": 2, "foundAt": 1, "cursor": 4})
        );
        assert_eq!(
            note.to_string(),
            "token #2 was only found at 1, behind the cursor at 4"
        );
    }

    fn source_strategy() -> impl Strategy<Value = String> {
        prop::string::string_regex("[a-c é=;\n]{0,24}").unwrap()
    }

    fn token_strategy() -> impl Strategy<Value = Token> {
        (
            prop::string::string_regex("[a-cé=;]{0,3}").unwrap(),
            0usize..40,
        )
            .prop_map(|(literal, position)| Token::new("IDENT", literal, position))
    }

    fn strategy_strategy() -> impl Strategy<Value = AlignStrategy> {
        prop_oneof![Just(AlignStrategy::DeclaredFirst), Just(AlignStrategy::Cursor)]
    }

    fn check_partition(
        source: &str,
        tokens: &[Token],
        strategy: AlignStrategy,
        window: usize,
    ) -> Result<(), TestCaseError> {
        let alignment = TokenAligner::new(AlignConfig::new(strategy, window)).align(source, tokens);

        prop_assert_eq!(concat_spans(alignment.spans()), source);

        let mut expected_start = 0;
        let mut last_token = None;
        for span in alignment.spans() {
            prop_assert_eq!(span.start(), expected_start);
            prop_assert!(!span.text().is_empty());
            expected_start = span.end();

            if let Some(index) = span.token_index() {
                prop_assert_eq!(span.text(), tokens[index].literal());
                prop_assert!(last_token.is_none_or(|last| last < index));
                last_token = Some(index);
            }
        }

        // Every token is either placed or reported as dropped.
        let placed = alignment.spans().iter().filter(|span| span.is_token()).count();
        prop_assert_eq!(placed + alignment.dropped_tokens().len(), tokens.len());
        Ok(())
    }

    proptest! {
        #[test]
        fn alignment_is_lossless_and_ordered(
            source in source_strategy(),
            tokens in prop::collection::vec(token_strategy(), 0..10),
            strategy in strategy_strategy(),
            window in 0usize..30,
        ) {
            check_partition(&source, &tokens, strategy, window)?;
        }

        #[test]
        fn tokens_read_from_source_are_all_placed(source in source_strategy()) {
            // One token per non-space char at its true byte offset.
            let tokens: Vec<Token> = source
                .char_indices()
                .filter(|(_, c)| !c.is_whitespace())
                .map(|(offset, c)| Token::new("IDENT", c.to_string(), offset))
                .collect();

            let alignment = TokenAligner::default().align(&source, &tokens);
            prop_assert!(alignment.notes().is_empty());
            check_partition(&source, &tokens, AlignStrategy::DeclaredFirst, 20)?;
        }
    }
}
