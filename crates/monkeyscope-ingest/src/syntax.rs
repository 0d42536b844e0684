//! Typed syntax tree arena.
//!
//! Parse responses describe the Monkey syntax tree as untyped JSON objects
//! whose fields depend on the construct. Decoding turns each object into a
//! [`SyntaxNode`] with a [`SyntaxKind`] variant that names its child slots
//! explicitly. Nodes live in a [`SyntaxTree`] arena and refer to their
//! children by [`NodeIndex`].
//!
//! The arena is filled in pre-order: a node's index is always smaller than
//! the indices of its descendants, and siblings appear in visiting order.
//! Back references therefore cannot be expressed, and walking the tree from
//! [`SyntaxTree::root`] always terminates.

use crate::error::Diagnostic;

/// Position of a node in its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena position, which is also the pre-order rank.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Child slots of a node whose type is not one of the known constructs.
///
/// Every slot of the generic field probe is kept, so an unfamiliar node
/// still shows whatever familiar children it carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericSlots {
    pub statements: Vec<NodeIndex>,
    pub name: Option<NodeIndex>,
    pub value: Option<NodeIndex>,
    pub left: Option<NodeIndex>,
    pub right: Option<NodeIndex>,
    pub expression: Option<NodeIndex>,
    pub condition: Option<NodeIndex>,
    pub consequence: Option<NodeIndex>,
    pub alternative: Option<NodeIndex>,
    pub parameters: Vec<NodeIndex>,
    pub body: Option<NodeIndex>,
}

impl GenericSlots {
    /// Returns `true` if no slot holds a child.
    pub fn is_empty(&self) -> bool {
        self.children().is_empty()
    }

    fn children(&self) -> Vec<NodeIndex> {
        let mut children = self.statements.clone();
        children.extend(
            [
                self.name,
                self.value,
                self.left,
                self.right,
                self.expression,
                self.condition,
                self.consequence,
                self.alternative,
            ]
            .into_iter()
            .flatten(),
        );
        children.extend(self.parameters.iter().copied());
        children.extend(self.body);
        children
    }
}

/// The construct a node represents, with its typed child slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxKind {
    Program {
        statements: Vec<NodeIndex>,
    },
    BlockStatement {
        statements: Vec<NodeIndex>,
    },
    LetStatement {
        name: Option<NodeIndex>,
        value: Option<NodeIndex>,
    },
    ReturnStatement {
        return_value: Option<NodeIndex>,
    },
    ExpressionStatement {
        expression: Option<NodeIndex>,
    },
    PrefixExpression {
        right: Option<NodeIndex>,
    },
    InfixExpression {
        left: Option<NodeIndex>,
        right: Option<NodeIndex>,
    },
    IfExpression {
        condition: Option<NodeIndex>,
        consequence: Option<NodeIndex>,
        alternative: Option<NodeIndex>,
    },
    FunctionLiteral {
        parameters: Vec<NodeIndex>,
        body: Option<NodeIndex>,
    },
    CallExpression {
        function: Option<NodeIndex>,
        arguments: Vec<NodeIndex>,
    },
    Identifier,
    IntegerLiteral,
    Boolean,
    StringLiteral,
    /// Any other node, including nodes without a `type` field.
    Generic(GenericSlots),
}

impl SyntaxKind {
    /// Returns the children in visiting order.
    pub fn children(&self) -> Vec<NodeIndex> {
        match self {
            Self::Program { statements } | Self::BlockStatement { statements } => {
                statements.clone()
            }
            Self::LetStatement { name, value } => name.iter().chain(value).copied().collect(),
            Self::ReturnStatement { return_value: child }
            | Self::ExpressionStatement { expression: child }
            | Self::PrefixExpression { right: child } => child.iter().copied().collect(),
            Self::InfixExpression { left, right } => left.iter().chain(right).copied().collect(),
            Self::IfExpression {
                condition,
                consequence,
                alternative,
            } => condition
                .iter()
                .chain(consequence)
                .chain(alternative)
                .copied()
                .collect(),
            Self::FunctionLiteral { parameters, body } => {
                parameters.iter().chain(body).copied().collect()
            }
            Self::CallExpression {
                function,
                arguments,
            } => function.iter().chain(arguments).copied().collect(),
            Self::Identifier | Self::IntegerLiteral | Self::Boolean | Self::StringLiteral => {
                Vec::new()
            }
            Self::Generic(slots) => slots.children(),
        }
    }
}

/// One decoded syntax tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    type_name: Option<String>,
    kind: SyntaxKind,
    value: Option<String>,
    token_literal: Option<String>,
    operator: Option<String>,
    text: Option<String>,
}

impl SyntaxNode {
    pub(crate) fn new(type_name: Option<String>, kind: SyntaxKind) -> Self {
        Self {
            type_name,
            kind,
            value: None,
            token_literal: None,
            operator: None,
            text: None,
        }
    }

    pub(crate) fn with_value(mut self, value: Option<String>) -> Self {
        self.value = value;
        self
    }

    pub(crate) fn with_token_literal(mut self, literal: Option<String>) -> Self {
        self.token_literal = literal;
        self
    }

    pub(crate) fn with_operator(mut self, operator: Option<String>) -> Self {
        self.operator = operator;
        self
    }

    pub(crate) fn with_text(mut self, text: Option<String>) -> Self {
        self.text = text;
        self
    }

    /// Returns the node's `type`, or `Unknown` when the node had none.
    pub fn label(&self) -> &str {
        self.type_name.as_deref().unwrap_or("Unknown")
    }

    pub fn kind(&self) -> &SyntaxKind {
        &self.kind
    }

    /// Returns the short value shown for this node.
    ///
    /// The first present of: the scalar `Value`, the token literal, the
    /// operator, the node's string form. Empty if none is present.
    pub fn display_value(&self) -> &str {
        self.value
            .as_deref()
            .or(self.token_literal.as_deref())
            .or(self.operator.as_deref())
            .or(self.text.as_deref())
            .unwrap_or_default()
    }
}

/// Arena of decoded syntax nodes; index 0 is the root.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    warnings: Vec<Diagnostic>,
}

impl SyntaxTree {
    pub(crate) fn new(nodes: Vec<SyntaxNode>, warnings: Vec<Diagnostic>) -> Self {
        debug_assert!(!nodes.is_empty(), "a syntax tree always has a root");
        Self { nodes, warnings }
    }

    pub fn root(&self) -> NodeIndex {
        NodeIndex(0)
    }

    /// Returns the node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` was not produced by this tree.
    pub fn node(&self, index: NodeIndex) -> &SyntaxNode {
        &self.nodes[index.0]
    }

    /// Returns the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &SyntaxNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeIndex(index), node))
    }

    /// Warnings about input that was skipped while decoding.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }
}
