//! Positioned node/edge model of a syntax tree.
//!
//! An [`AstGraph`] is what a diagram renderer consumes: a flat list of
//! [`GraphNode`]s in pre-order with absolute positions, and one
//! [`GraphEdge`] per parent/child relation.

use serde::Serialize;

use crate::{
    color::Color,
    geometry::{Bounds, Point, Size},
};

/// A positioned syntax tree node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    id: String,
    label: String,
    display_value: String,
    position: Point,
}

impl GraphNode {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        display_value: impl Into<String>,
        position: Point,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            display_value: display_value.into(),
            position,
        }
    }

    /// Returns the node id (`node-<n>`, assigned in pre-order).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the syntax node type, or `Unknown`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the short value shown under the label, possibly empty.
    pub fn display_value(&self) -> &str {
        &self.display_value
    }

    /// Returns the top-left corner of the node.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Returns the fill color for this node's label.
    pub fn color(&self) -> Color {
        node_color(&self.label)
    }
}

/// A directed parent to child relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    id: String,
    source_id: String,
    target_id: String,
}

impl GraphEdge {
    /// Creates the edge `source -> target` with id `edge-<source>-<target>`.
    pub fn new(source_id: &str, target_id: &str) -> Self {
        Self {
            id: format!("edge-{source_id}-{target_id}"),
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }
}

/// Nodes and edges of one laid-out syntax tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AstGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

impl AstGraph {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self { nodes, edges }
    }

    /// Nodes in pre-order; the root is first.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    /// Returns the bounds covering every node drawn with `node_size`, or
    /// `None` for an empty graph.
    pub fn bounds(&self, node_size: impl Fn(&GraphNode) -> Size) -> Option<Bounds> {
        self.nodes
            .iter()
            .map(|node| Bounds::new_from_top_left(node.position(), node_size(node)))
            .reduce(Bounds::union)
    }
}

/// Returns the fill color for a syntax node label.
pub fn node_color(label: &str) -> Color {
    let hex = match label {
        "Program" => "#3b82f6",
        "LetStatement" => "#10b981",
        "ReturnStatement" => "#f59e0b",
        "ExpressionStatement" => "#8b5cf6",
        "IfExpression" => "#ef4444",
        "FunctionLiteral" => "#06b6d4",
        "CallExpression" => "#f97316",
        "InfixExpression" => "#84cc16",
        "PrefixExpression" => "#ec4899",
        "Identifier" => "#6b7280",
        "IntegerLiteral" => "#14b8a6",
        "Boolean" => "#a855f7",
        "StringLiteral" => "#22c55e",
        _ => "#64748b",
    };
    Color::new(hex).expect("node palette colors are valid CSS colors")
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn sample_graph() -> AstGraph {
        AstGraph::new(
            vec![
                GraphNode::new("node-0", "Program", "", Point::new(400.0, 50.0)),
                GraphNode::new("node-1", "IntegerLiteral", "5", Point::new(300.0, 150.0)),
            ],
            vec![GraphEdge::new("node-0", "node-1")],
        )
    }

    #[test]
    fn test_edge_id_format() {
        let edge = GraphEdge::new("node-0", "node-3");
        assert_eq!(edge.id(), "edge-node-0-node-3");
        assert_eq!(edge.source_id(), "node-0");
        assert_eq!(edge.target_id(), "node-3");
    }

    #[test]
    fn test_node_lookup() {
        let graph = sample_graph();
        assert_eq!(graph.node("node-1").map(GraphNode::label), Some("IntegerLiteral"));
        assert!(graph.node("node-7").is_none());
    }

    #[test]
    fn test_bounds_cover_all_nodes() {
        let graph = sample_graph();
        let bounds = graph.bounds(|_| Size::new(100.0, 40.0)).unwrap();

        assert_approx_eq!(f32, bounds.min_x(), 300.0);
        assert_approx_eq!(f32, bounds.min_y(), 50.0);
        assert_approx_eq!(f32, bounds.max_x(), 500.0);
        assert_approx_eq!(f32, bounds.max_y(), 190.0);
    }

    #[test]
    fn test_empty_graph_has_no_bounds() {
        assert!(AstGraph::default().bounds(|_| Size::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_unknown_label_uses_fallback_color() {
        assert_eq!(node_color("HashLiteral"), node_color("Unknown"));
        assert_ne!(node_color("Program"), node_color("Unknown"));
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(sample_graph()).unwrap();
        assert_eq!(value["nodes"][1]["displayValue"], "5");
        assert_eq!(value["nodes"][1]["position"]["x"], 300.0);
        assert_eq!(value["edges"][0]["sourceId"], "node-0");
        assert_eq!(value["edges"][0]["targetId"], "node-1");
    }
}
