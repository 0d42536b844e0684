//! Positioned graph layout of a syntax tree.
//!
//! The [`AstGraphBuilder`] walks a [`SyntaxTree`] in pre-order, assigning
//! `node-<n>` ids on first visit and placing each child relative to its
//! parent. Placement follows fixed per-construct rules rather than a general
//! tree layout: children start one lead offset to the left of the parent and
//! one level below it, slot children such as `Left` and `Right` advance a
//! shared cursor, and list children fan out with a fixed step.

use log::{info, trace};

use monkeyscope_core::{
    geometry::Point,
    graph::{AstGraph, GraphEdge, GraphNode},
};
use monkeyscope_ingest::syntax::{GenericSlots, NodeIndex, SyntaxKind, SyntaxTree};

use crate::config::LayoutConfig;

/// Builds positioned graphs from syntax trees.
#[derive(Debug, Clone, Default)]
pub struct AstGraphBuilder {
    config: LayoutConfig,
}

impl AstGraphBuilder {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Lays out `tree` with its root at the configured origin.
    ///
    /// The graph has one node per tree node, listed in pre-order, and one
    /// edge per parent/child relation. Ids depend only on the tree shape, so
    /// building the same tree twice yields the same graph.
    pub fn build(&self, tree: &SyntaxTree) -> AstGraph {
        let mut nodes = Vec::with_capacity(tree.len());
        let mut edges = Vec::with_capacity(tree.len().saturating_sub(1));
        let mut stack = vec![Visit {
            index: tree.root(),
            position: self.config.origin(),
            parent_id: None,
        }];

        while let Some(visit) = stack.pop() {
            let id = format!("node-{}", nodes.len());
            let node = tree.node(visit.index);
            trace!(id = id.as_str(), label = node.label(); "Placing node");

            if let Some(parent_id) = &visit.parent_id {
                edges.push(GraphEdge::new(parent_id, &id));
            }

            let children = self.place_children(node.kind(), visit.position);
            // Reversed so the first child is visited next.
            stack.extend(children.into_iter().rev().map(|(index, position)| Visit {
                index,
                position,
                parent_id: Some(id.clone()),
            }));

            nodes.push(GraphNode::new(
                id,
                node.label(),
                node.display_value(),
                visit.position,
            ));
        }

        info!(nodes_count = nodes.len(), edges_count = edges.len(); "Syntax tree laid out");
        AstGraph::new(nodes, edges)
    }

    /// Returns the children of a node with their positions, in visiting order.
    fn place_children(&self, kind: &SyntaxKind, position: Point) -> Vec<(NodeIndex, Point)> {
        let mut placer = ChildPlacer::new(&self.config, position);

        match kind {
            SyntaxKind::Program { statements } | SyntaxKind::BlockStatement { statements } => {
                placer.statements(statements);
            }
            SyntaxKind::LetStatement { name, value } => {
                placer.slot(*name);
                placer.value(*value, name.is_some());
            }
            SyntaxKind::ReturnStatement {
                return_value: child,
            }
            | SyntaxKind::ExpressionStatement { expression: child } => {
                placer.below(*child);
            }
            SyntaxKind::PrefixExpression { right } => placer.last_slot(*right),
            SyntaxKind::InfixExpression { left, right } => {
                placer.slot(*left);
                placer.last_slot(*right);
            }
            SyntaxKind::IfExpression {
                condition,
                consequence,
                alternative,
            } => {
                placer.slot(*condition);
                placer.slot(*consequence);
                placer.last_slot(*alternative);
            }
            SyntaxKind::FunctionLiteral { parameters, body } => {
                placer.parameters(parameters);
                placer.below(*body);
            }
            SyntaxKind::CallExpression {
                function,
                arguments,
            } => {
                placer.slot(*function);
                placer.parameters(arguments);
            }
            SyntaxKind::Identifier
            | SyntaxKind::IntegerLiteral
            | SyntaxKind::Boolean
            | SyntaxKind::StringLiteral => {}
            SyntaxKind::Generic(slots) => placer.generic(slots),
        }

        debug_assert_eq!(placer.placed.len(), kind.children().len());
        placer.placed
    }
}

/// A node waiting on the walk stack.
struct Visit {
    index: NodeIndex,
    position: Point,
    parent_id: Option<String>,
}

/// Child positions of one parent, placed in visiting order.
struct ChildPlacer<'a> {
    config: &'a LayoutConfig,
    parent: Point,
    cursor_x: f32,
    child_y: f32,
    placed: Vec<(NodeIndex, Point)>,
}

impl<'a> ChildPlacer<'a> {
    fn new(config: &'a LayoutConfig, parent: Point) -> Self {
        Self {
            config,
            parent,
            cursor_x: parent.x() - config.lead_offset(),
            child_y: parent.y() + config.level_step(),
            placed: Vec::new(),
        }
    }

    /// Places a child at the cursor, then advances the cursor.
    fn slot(&mut self, child: Option<NodeIndex>) {
        if let Some(child) = child {
            self.placed
                .push((child, Point::new(self.cursor_x, self.child_y)));
            self.cursor_x += self.config.slot_step();
        }
    }

    /// Places a child at the cursor without advancing it.
    fn last_slot(&mut self, child: Option<NodeIndex>) {
        if let Some(child) = child {
            self.placed
                .push((child, Point::new(self.cursor_x, self.child_y)));
        }
    }

    /// Places a child directly below the parent.
    fn below(&mut self, child: Option<NodeIndex>) {
        if let Some(child) = child {
            self.placed
                .push((child, Point::new(self.parent.x(), self.child_y)));
        }
    }

    /// Places a `Value` child beside its `Name`, or below the parent alone.
    fn value(&mut self, child: Option<NodeIndex>, beside_name: bool) {
        if beside_name {
            self.last_slot(child);
        } else {
            self.below(child);
        }
    }

    fn statements(&mut self, children: &[NodeIndex]) {
        self.spread(children, self.config.statement_step());
    }

    fn parameters(&mut self, children: &[NodeIndex]) {
        self.spread(children, self.config.parameter_step());
    }

    fn spread(&mut self, children: &[NodeIndex], step: f32) {
        let (start_x, y) = (self.cursor_x, self.child_y);
        self.placed.extend(
            children
                .iter()
                .enumerate()
                .map(|(i, child)| (*child, Point::new(start_x + step * i as f32, y))),
        );
    }

    /// Places the children of an unrecognized node by probing every known
    /// child field in a fixed order.
    fn generic(&mut self, slots: &GenericSlots) {
        self.statements(&slots.statements);
        self.slot(slots.name);
        self.value(slots.value, slots.name.is_some());
        self.slot(slots.left);
        self.last_slot(slots.right);
        self.below(slots.expression);
        self.slot(slots.condition);
        self.slot(slots.consequence);
        self.last_slot(slots.alternative);
        self.parameters(&slots.parameters);
        self.below(slots.body);
    }
}

/// Lays out `tree` with the default configuration.
pub fn build_graph(tree: &SyntaxTree) -> AstGraph {
    AstGraphBuilder::default().build(tree)
}
