//! Decoding of tokenize and parse responses.
//!
//! Both responses are JSON objects that carry either a payload or an
//! `error` string. Token entries and the tree root are kept as borrowed raw
//! JSON first, so that diagnostics can point at the exact bytes of the
//! offending entry in the response document.

use log::{debug, info};
use serde::Deserialize;
use serde_json::{Value, error::Category, value::RawValue};

use monkeyscope_core::token::Token;

use crate::{
    decode::{self, DecodeOptions},
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    syntax::SyntaxTree,
};

#[derive(Deserialize)]
struct TokenizeResponse<'a> {
    #[serde(default, borrow)]
    tokens: Option<Vec<&'a RawValue>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct ParseResponse<'a> {
    #[serde(default, borrow)]
    ast: Option<&'a RawValue>,
    #[serde(default)]
    error: Option<String>,
}

/// Decodes a tokenize response into its token list.
///
/// A missing or `null` token list decodes to an empty list.
///
/// # Errors
///
/// Returns every problem found: `E001` for malformed JSON, `E002` for a
/// response that is not shaped like a tokenize response, `E003` for each
/// token entry that cannot be read, and `E100` when the response reports an
/// upstream error.
pub fn decode_tokens(text: &str) -> Result<Vec<Token>, ParseError> {
    let response: TokenizeResponse = serde_json::from_str(text)
        .map_err(|err| json_diagnostic(text, "tokenize", &err, Span::default()))?;
    upstream_error(response.error)?;

    let entries = response.tokens.unwrap_or_default();
    let mut collector = DiagnosticCollector::new();
    let mut tokens = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let entry_span = span_within(text, entry.get());
        match serde_json::from_str::<Token>(entry.get()) {
            Ok(token) => tokens.push(token),
            Err(err) => {
                let local = Span::at_line_column(entry.get(), err.line(), err.column());
                let at = Span::new(
                    entry_span.start() + local.start()..entry_span.start() + local.end(),
                );
                collector.emit(
                    Diagnostic::error(format!("invalid token entry at index {index}"))
                        .with_code(ErrorCode::E003)
                        .with_label(at, strip_location(&err))
                        .with_secondary_label(entry_span, "in this token entry")
                        .with_help(
                            "token entries need a string `type`, a string `literal` and a \
                             non-negative integer `position`",
                        ),
                );
            }
        }
    }

    collector.finish()?;
    info!(tokens_count = tokens.len(); "Tokenize response decoded");

    Ok(tokens)
}

/// Decodes a parse response into a [`SyntaxTree`].
///
/// # Errors
///
/// Besides the response-level errors of [`decode_tokens`] (`E001`, `E002`,
/// `E100`), returns `E200` when the response has no tree or its root is not
/// a JSON object, and `E201` when the tree exceeds `options.max_depth()`.
pub fn decode_syntax_tree(text: &str, options: DecodeOptions) -> Result<SyntaxTree, ParseError> {
    let response: ParseResponse = serde_json::from_str(text)
        .map_err(|err| json_diagnostic(text, "parse", &err, Span::default()))?;
    upstream_error(response.error)?;

    let Some(raw_root) = response.ast else {
        return Err(Diagnostic::error("parse response carries no syntax tree")
            .with_code(ErrorCode::E200)
            .with_help("a parse response needs an `ast` object or an `error` string")
            .into());
    };

    let root_span = span_within(text, raw_root.get());
    check_nesting(raw_root.get(), root_span, options)?;
    let root = read_unbounded(raw_root.get())
        .map_err(|err| json_diagnostic(raw_root.get(), "parse", &err, root_span))?;

    if !root.is_object() {
        return Err(Diagnostic::error(format!(
            "syntax tree root must be a JSON object, found {}",
            decode::json_kind(&root)
        ))
        .with_code(ErrorCode::E200)
        .with_label(root_span, "expected an object with a `type` field")
        .into());
    }

    let tree = decode::syntax_tree_from_value(&root, options)?;
    info!(nodes_count = tree.len(); "Parse response decoded");

    Ok(tree)
}

/// Rejects a tree whose JSON nesting cannot belong to a syntax tree within
/// `options.max_depth()` levels.
///
/// A syntax node sits at most two JSON levels below its parent (an object
/// inside a list field), and its own fields add at most one more level.
/// Checking the raw text first keeps the reader and the decoder from ever
/// descending further than the configured depth allows.
fn check_nesting(raw: &str, base: Span, options: DecodeOptions) -> Result<(), Diagnostic> {
    let limit = options.max_depth().saturating_mul(2).saturating_add(1);
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in raw.bytes().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                if depth > limit {
                    let at = base.start() + offset;
                    return Err(Diagnostic::error(format!(
                        "syntax tree is nested deeper than {} levels",
                        options.max_depth()
                    ))
                    .with_code(ErrorCode::E201)
                    .with_label(Span::new(at..at + 1), "nesting exceeds the limit here")
                    .with_help(
                        "raise `layout.max_depth` in the configuration to accept deeper trees",
                    ));
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    Ok(())
}

/// Reads a JSON value without `serde_json`'s fixed nesting limit, growing
/// the stack as needed. Depth is bounded by [`check_nesting`] instead.
fn read_unbounded(raw: &str) -> Result<Value, serde_json::Error> {
    let mut reader = serde_json::Deserializer::from_str(raw);
    reader.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut reader))?;
    reader.end()?;
    Ok(value)
}

fn upstream_error(error: Option<String>) -> Result<(), Diagnostic> {
    match error {
        Some(message) if !message.is_empty() => {
            debug!(message = message.as_str(); "Upstream reported an error");
            Err(Diagnostic::error(message).with_code(ErrorCode::E100))
        }
        _ => Ok(()),
    }
}

/// Builds the diagnostic for a failed `serde_json` read of `text`, whose
/// first byte sits at `base` in the full response document.
fn json_diagnostic(text: &str, what: &str, err: &serde_json::Error, base: Span) -> Diagnostic {
    let local = Span::at_line_column(text, err.line(), err.column());
    let at = Span::new(base.start() + local.start()..base.start() + local.end());

    match err.classify() {
        Category::Data => Diagnostic::error(format!("unexpected {what} response shape"))
            .with_code(ErrorCode::E002)
            .with_label(at, strip_location(err))
            .with_help(format!(
                "a {what} response is a JSON object with a payload field and an optional \
                 `error` string"
            )),
        Category::Syntax | Category::Eof | Category::Io => {
            Diagnostic::error(format!("malformed JSON in {what} response"))
                .with_code(ErrorCode::E001)
                .with_label(at, strip_location(err))
        }
    }
}

/// Returns the message of a `serde_json` error without its position suffix.
fn strip_location(err: &serde_json::Error) -> String {
    let message = err.to_string();
    match message.rsplit_once(" at line ") {
        Some((head, _)) => head.to_string(),
        None => message,
    }
}

/// Locates `part`, a subslice borrowed from `text`, within `text`.
fn span_within(text: &str, part: &str) -> Span {
    let start = (part.as_ptr() as usize)
        .checked_sub(text.as_ptr() as usize)
        .filter(|offset| offset + part.len() <= text.len())
        .unwrap_or_default();
    Span::new(start..start + part.len())
}
