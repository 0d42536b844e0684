//! Property tests for the shape of laid-out syntax trees.

use std::collections::HashMap;

use petgraph::{
    Direction,
    algo::is_cyclic_directed,
    graph::{DiGraph, NodeIndex},
    visit::Dfs,
};
use proptest::prelude::*;
use serde_json::{Value, json};

use monkeyscope::{build_graph, graph::AstGraph};
use monkeyscope_ingest::{DecodeOptions, syntax_tree_from_value};

/// Generates syntax trees made of known and unknown constructs, returning
/// the JSON tree together with its node count.
fn tree_strategy() -> impl Strategy<Value = (Value, usize)> {
    let leaf = prop_oneof![
        (0i64..100).prop_map(|n| (json!({"type": "IntegerLiteral", "Value": n}), 1)),
        "[a-z]{1,4}".prop_map(|name| (json!({"type": "Identifier", "Value": name}), 1)),
        any::<bool>().prop_map(|b| (json!({"type": "Boolean", "Value": b}), 1)),
        Just((json!({"type": "HashLiteral"}), 1)),
    ];

    leaf.prop_recursive(6, 64, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(|children| {
                let count = 1 + children.iter().map(|(_, n)| n).sum::<usize>();
                let statements: Vec<Value> = children.into_iter().map(|(v, _)| v).collect();
                (json!({"type": "BlockStatement", "statements": statements}), count)
            }),
            (inner.clone(), inner.clone()).prop_map(|((left, l), (right, r))| {
                (
                    json!({"type": "InfixExpression", "Operator": "+", "Left": left, "Right": right}),
                    1 + l + r,
                )
            }),
            (inner.clone(), prop::collection::vec(inner.clone(), 0..3)).prop_map(
                |((function, f), arguments)| {
                    let count = 1 + f + arguments.iter().map(|(_, n)| n).sum::<usize>();
                    let arguments: Vec<Value> = arguments.into_iter().map(|(v, _)| v).collect();
                    (
                        json!({"type": "CallExpression", "Function": function, "Arguments": arguments}),
                        count,
                    )
                }
            ),
            (inner.clone(), inner).prop_map(|((name, n), (value, v))| {
                (
                    json!({"type": "Mystery", "Name": name, "Body": value}),
                    1 + n + v,
                )
            }),
        ]
    })
}

fn to_petgraph(graph: &AstGraph) -> (DiGraph<&str, ()>, HashMap<&str, NodeIndex>) {
    let mut petgraph = DiGraph::new();
    let mut indices = HashMap::new();
    for node in graph.nodes() {
        indices.insert(node.id(), petgraph.add_node(node.id()));
    }
    for edge in graph.edges() {
        petgraph.add_edge(indices[edge.source_id()], indices[edge.target_id()], ());
    }
    (petgraph, indices)
}

fn check_tree_shape(value: &Value, expected_nodes: usize) -> Result<(), TestCaseError> {
    let tree = syntax_tree_from_value(value, DecodeOptions::default())
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    let graph = build_graph(&tree);

    prop_assert_eq!(graph.nodes().len(), expected_nodes);
    prop_assert_eq!(graph.edges().len(), expected_nodes - 1);

    for (n, node) in graph.nodes().iter().enumerate() {
        prop_assert_eq!(node.id(), format!("node-{n}"));
    }

    let (petgraph, indices) = to_petgraph(&graph);
    prop_assert!(!is_cyclic_directed(&petgraph));

    let root = indices["node-0"];
    prop_assert_eq!(petgraph.neighbors_directed(root, Direction::Incoming).count(), 0);
    for (id, index) in &indices {
        if *id != "node-0" {
            prop_assert_eq!(
                petgraph.neighbors_directed(*index, Direction::Incoming).count(),
                1
            );
        }
    }

    let mut reached = 0;
    let mut dfs = Dfs::new(&petgraph, root);
    while dfs.next(&petgraph).is_some() {
        reached += 1;
    }
    prop_assert_eq!(reached, expected_nodes);

    // Every child sits one level below its parent.
    for edge in graph.edges() {
        let parent = graph.node(edge.source_id()).unwrap().position();
        let child = graph.node(edge.target_id()).unwrap().position();
        prop_assert!((child.y() - parent.y() - 100.0).abs() < 1e-3);
    }

    // Building twice gives the same graph.
    prop_assert_eq!(build_graph(&tree), graph);
    Ok(())
}

proptest! {
    #[test]
    fn graph_is_a_tree_rooted_at_node_zero((value, count) in tree_strategy()) {
        check_tree_shape(&value, count)?;
    }
}
