//! SVG rendering for syntax tree graphs.

use log::debug;
use svg::{Document, node::element as svg_element};

use monkeyscope_core::{
    geometry::Size,
    graph::{AstGraph, GraphNode},
};

use super::SvgExporter;

const NODE_MIN_WIDTH: f32 = 100.0;
const NODE_PADDING: f32 = 12.0;
const EDGE_COLOR: &str = "#94a3b8";

impl SvgExporter {
    /// Renders `graph` as one rounded box per node and one straight line
    /// per edge, from the bottom of the parent to the top of the child.
    pub fn render_graph(&self, graph: &AstGraph) -> Document {
        let content = graph
            .bounds(|node| self.node_size(node))
            .unwrap_or_default();
        let mut doc = self.document(content);

        let mut edges = svg_element::Group::new().set("class", "edges");
        for edge in graph.edges() {
            let (Some(source), Some(target)) =
                (graph.node(edge.source_id()), graph.node(edge.target_id()))
            else {
                debug!(edge_id = edge.id(); "Skipping edge with missing endpoint");
                continue;
            };

            let source_size = self.node_size(source);
            let from = source
                .position()
                .offset(source_size.width() / 2.0, source_size.height());
            let to = target
                .position()
                .offset(self.node_size(target).width() / 2.0, 0.0);

            edges = edges.add(
                svg_element::Line::new()
                    .set("id", edge.id())
                    .set("x1", from.x())
                    .set("y1", from.y())
                    .set("x2", to.x())
                    .set("y2", to.y())
                    .set("stroke", EDGE_COLOR)
                    .set("stroke-width", 1.5),
            );
        }
        doc = doc.add(edges);

        let nodes = graph
            .nodes()
            .iter()
            .fold(svg_element::Group::new().set("class", "nodes"), |group, node| {
                group.add(self.render_node(node))
            });

        doc.add(nodes)
    }

    fn render_node(&self, node: &GraphNode) -> svg_element::Group {
        let size = self.node_size(node);
        let position = node.position();
        let center_x = position.x() + size.width() / 2.0;
        let color = node.color();

        let mut group = svg_element::Group::new().set("id", node.id()).add(
            svg_element::Rectangle::new()
                .set("x", position.x())
                .set("y", position.y())
                .set("width", size.width())
                .set("height", size.height())
                .set("rx", 6.0)
                .set("fill", color)
                .set("fill-opacity", 0.9)
                .set("stroke", color)
                .set("stroke-width", 1.0),
        );

        group = group.add(
            self.text(node.label(), center_x, position.y() + NODE_PADDING + self.font_size / 2.0)
                .set("text-anchor", "middle")
                .set("dominant-baseline", "central")
                .set("font-weight", "bold")
                .set("fill", "white"),
        );

        if !node.display_value().is_empty() {
            group = group.add(
                self.text(
                    node.display_value(),
                    center_x,
                    position.y() + NODE_PADDING + self.line_height() + self.font_size / 2.0,
                )
                .set("text-anchor", "middle")
                .set("dominant-baseline", "central")
                .set("fill", "white"),
            );
        }

        group
    }

    /// Estimates the box size of a node from the length of its texts.
    pub(super) fn node_size(&self, node: &GraphNode) -> Size {
        let chars = node
            .label()
            .chars()
            .count()
            .max(node.display_value().chars().count());
        let width = (chars as f32 * self.char_width() + 2.0 * NODE_PADDING).max(NODE_MIN_WIDTH);

        let mut height = 2.0 * NODE_PADDING + self.font_size;
        if !node.display_value().is_empty() {
            height += self.line_height();
        }

        Size::new(width, height)
    }
}
