//! Conversion of untyped syntax tree JSON into a [`SyntaxTree`].
//!
//! Each JSON object is matched on its `type` field. Known constructs read
//! exactly the child fields their variant declares; anything else falls back
//! to probing the generic child fields in a fixed order. Children are decoded
//! in visiting order so that arena indices follow pre-order.

use log::{debug, trace, warn};
use serde_json::{Map, Value};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    syntax::{GenericSlots, NodeIndex, SyntaxKind, SyntaxNode, SyntaxTree},
};

/// Options for decoding a syntax tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    max_depth: usize,
}

impl DecodeOptions {
    /// Default number of tree levels accepted before decoding fails.
    pub const DEFAULT_MAX_DEPTH: usize = 100;

    /// Creates options accepting trees up to `max_depth` levels deep
    /// (a lone root is one level).
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_DEPTH)
    }
}

/// Decodes the syntax tree rooted at `root`.
///
/// # Errors
///
/// - [`ErrorCode::E200`] if `root` is not a JSON object.
/// - [`ErrorCode::E201`] if the tree is deeper than the configured maximum.
pub fn syntax_tree_from_value(
    root: &Value,
    options: DecodeOptions,
) -> Result<SyntaxTree, ParseError> {
    let Value::Object(fields) = root else {
        return Err(Diagnostic::error(format!(
            "syntax tree root must be a JSON object, found {}",
            json_kind(root)
        ))
        .with_code(ErrorCode::E200)
        .into());
    };

    let mut decoder = TreeDecoder::new(options);
    decoder.node(fields, 1)?;

    let TreeDecoder {
        nodes, collector, ..
    } = decoder;
    let warnings = collector.finish()?;
    debug!(nodes_count = nodes.len(), warnings_count = warnings.len(); "Syntax tree decoded");

    Ok(SyntaxTree::new(nodes, warnings))
}

struct TreeDecoder {
    options: DecodeOptions,
    nodes: Vec<SyntaxNode>,
    collector: DiagnosticCollector,
}

impl TreeDecoder {
    fn new(options: DecodeOptions) -> Self {
        Self {
            options,
            nodes: Vec::new(),
            collector: DiagnosticCollector::new(),
        }
    }

    fn node(&mut self, fields: &Map<String, Value>, depth: usize) -> Result<NodeIndex, Diagnostic> {
        if depth > self.options.max_depth() {
            return Err(Diagnostic::error(format!(
                "syntax tree is nested deeper than {} levels",
                self.options.max_depth()
            ))
            .with_code(ErrorCode::E201)
            .with_help("raise `layout.max_depth` in the configuration to accept deeper trees"));
        }

        // Reserve the slot before visiting children so indices follow pre-order.
        let index = NodeIndex::new(self.nodes.len());
        let type_name = fields.get("type").and_then(Value::as_str).map(String::from);
        self.nodes.push(SyntaxNode::new(
            type_name.clone(),
            SyntaxKind::Generic(GenericSlots::default()),
        ));

        let owner = type_name.as_deref().unwrap_or("Unknown");
        let child_depth = depth + 1;
        let kind = match type_name.as_deref() {
            Some("Program") => SyntaxKind::Program {
                statements: self.list(fields, owner, "statements", child_depth)?,
            },
            Some("BlockStatement") => SyntaxKind::BlockStatement {
                statements: self.list(fields, owner, "statements", child_depth)?,
            },
            Some("LetStatement") => SyntaxKind::LetStatement {
                name: self.child(fields, owner, "Name", child_depth)?,
                value: self.child(fields, owner, "Value", child_depth)?,
            },
            Some("ReturnStatement") => SyntaxKind::ReturnStatement {
                return_value: self.child(fields, owner, "ReturnValue", child_depth)?,
            },
            Some("ExpressionStatement") => SyntaxKind::ExpressionStatement {
                expression: self.child(fields, owner, "Expression", child_depth)?,
            },
            Some("PrefixExpression") => SyntaxKind::PrefixExpression {
                right: self.child(fields, owner, "Right", child_depth)?,
            },
            Some("InfixExpression") => SyntaxKind::InfixExpression {
                left: self.child(fields, owner, "Left", child_depth)?,
                right: self.child(fields, owner, "Right", child_depth)?,
            },
            Some("IfExpression") => SyntaxKind::IfExpression {
                condition: self.child(fields, owner, "Condition", child_depth)?,
                consequence: self.child(fields, owner, "Consequence", child_depth)?,
                alternative: self.child(fields, owner, "Alternative", child_depth)?,
            },
            Some("FunctionLiteral") => SyntaxKind::FunctionLiteral {
                parameters: self.list(fields, owner, "Parameters", child_depth)?,
                body: self.child(fields, owner, "Body", child_depth)?,
            },
            Some("CallExpression") => SyntaxKind::CallExpression {
                function: self.child(fields, owner, "Function", child_depth)?,
                arguments: self.list(fields, owner, "Arguments", child_depth)?,
            },
            Some("Identifier") => SyntaxKind::Identifier,
            Some("IntegerLiteral") => SyntaxKind::IntegerLiteral,
            Some("Boolean") => SyntaxKind::Boolean,
            Some("StringLiteral") => SyntaxKind::StringLiteral,
            _ => SyntaxKind::Generic(self.generic_slots(fields, owner, child_depth)?),
        };
        trace!(index = index.index(), node_type = owner; "Decoded syntax node");

        self.nodes[index.index()] = SyntaxNode::new(type_name, kind)
            .with_value(fields.get("Value").and_then(scalar_text))
            .with_token_literal(
                fields
                    .get("Token")
                    .and_then(|token| token.get("Literal"))
                    .and_then(non_empty_str),
            )
            .with_operator(fields.get("Operator").and_then(non_empty_str))
            .with_text(fields.get("string").and_then(non_empty_str));

        Ok(index)
    }

    fn generic_slots(
        &mut self,
        fields: &Map<String, Value>,
        owner: &str,
        depth: usize,
    ) -> Result<GenericSlots, Diagnostic> {
        Ok(GenericSlots {
            statements: self.list(fields, owner, "statements", depth)?,
            name: self.child(fields, owner, "Name", depth)?,
            value: self.child(fields, owner, "Value", depth)?,
            left: self.child(fields, owner, "Left", depth)?,
            right: self.child(fields, owner, "Right", depth)?,
            expression: self.child(fields, owner, "Expression", depth)?,
            condition: self.child(fields, owner, "Condition", depth)?,
            consequence: self.child(fields, owner, "Consequence", depth)?,
            alternative: self.child(fields, owner, "Alternative", depth)?,
            parameters: self.list(fields, owner, "Parameters", depth)?,
            body: self.child(fields, owner, "Body", depth)?,
        })
    }

    /// Decodes a single child slot. Absent and `null` fields are empty slots.
    fn child(
        &mut self,
        fields: &Map<String, Value>,
        owner: &str,
        field: &str,
        depth: usize,
    ) -> Result<Option<NodeIndex>, Diagnostic> {
        match fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(child)) => self.node(child, depth).map(Some),
            // A scalar `Value` is the node's display value, not a child.
            Some(value) if field == "Value" && scalar_text(value).is_some() => Ok(None),
            Some(other) => {
                self.skip(owner, field, other);
                Ok(None)
            }
        }
    }

    /// Decodes a list slot, skipping entries that are not syntax nodes.
    fn list(
        &mut self,
        fields: &Map<String, Value>,
        owner: &str,
        field: &str,
        depth: usize,
    ) -> Result<Vec<NodeIndex>, Diagnostic> {
        match fields.get(field) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => {
                let mut children = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(child) => children.push(self.node(child, depth)?),
                        other => self.skip(owner, field, other),
                    }
                }
                Ok(children)
            }
            Some(other) => {
                self.skip(owner, field, other);
                Ok(Vec::new())
            }
        }
    }

    fn skip(&mut self, owner: &str, field: &str, value: &Value) {
        warn!(node_type = owner, field; "Skipping child that is not a syntax node");
        self.collector.emit(
            Diagnostic::warning(format!(
                "`{field}` of `{owner}` holds {} where a syntax node was expected; it was skipped",
                json_kind(value)
            ))
            .with_code(ErrorCode::E002),
        );
    }
}

/// Renders a scalar JSON value as display text. Objects, arrays and `null`
/// have no display text.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|text| !text.is_empty())
        .map(String::from)
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
