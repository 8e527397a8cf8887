//! The shared graph model produced by the builders and consumed by
//! rendering.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use super::status::Status;

/// One node in a graph, unique by identifier.
#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub id: String,

    /// The single resolved status for this node.
    pub status: Status,

    /// Distance from the topology root at first visit; 0 for service
    /// graphs.
    pub depth: usize,

    /// CMDB attributes carried through for rendering (labels, tooltips).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl GraphNode {
    /// A bare node with no CMDB attributes.
    pub fn new(id: impl Into<String>, status: Status, depth: usize) -> Self {
        Self {
            id: id.into(),
            status,
            depth,
            attributes: BTreeMap::new(),
        }
    }
}

/// A directed edge between two node identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

/// A finished graph: insertion-ordered nodes unique by id, plus
/// deduplicated directed edges.
///
/// Instances are built from scratch on every refresh and handed to the
/// rendering consumer as immutable values; there is no incremental
/// mutation across refreshes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphModel {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    #[serde(skip)]
    edge_keys: HashSet<(String, String)>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. The first insertion for an id wins; later ones are
    /// ignored and return false.
    pub fn add_node(&mut self, node: GraphNode) -> bool {
        if self.index.contains_key(&node.id) {
            return false;
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Insert a directed edge.
    ///
    /// Duplicate (source, target) pairs and self-referential edges are
    /// rejected and return false.
    pub fn add_edge(&mut self, source: &str, target: &str) -> bool {
        if source == target {
            return false;
        }
        let key = (source.to_string(), target.to_string());
        if !self.edge_keys.insert(key) {
            return false;
        }
        self.edges.push(GraphEdge {
            source: source.to_string(),
            target: target.to_string(),
        });
        true
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Look up a node by identifier.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Tree depth in levels: one more than the deepest node, 0 when empty.
    ///
    /// Rendering uses this as a sizing hint.
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth + 1).max().unwrap_or(0)
    }

    /// Count of nodes per status, for summary displays.
    pub fn status_counts(&self) -> BTreeMap<Status, usize> {
        let mut counts = BTreeMap::new();
        for node in &self.nodes {
            *counts.entry(node.status).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_dedup_first_wins() {
        let mut graph = GraphModel::new();
        assert!(graph.add_node(GraphNode::new("a", Status::Ok, 0)));
        assert!(!graph.add_node(GraphNode::new("a", Status::Error, 3)));

        assert_eq!(graph.len(), 1);
        let node = graph.node("a").unwrap();
        assert_eq!(node.status, Status::Ok);
        assert_eq!(node.depth, 0);
    }

    #[test]
    fn test_edge_dedup() {
        let mut graph = GraphModel::new();
        graph.add_node(GraphNode::new("a", Status::Ok, 0));
        graph.add_node(GraphNode::new("b", Status::Ok, 1));

        assert!(graph.add_edge("a", "b"));
        assert!(!graph.add_edge("a", "b"));
        assert!(graph.add_edge("b", "a"));

        assert_eq!(graph.edges().len(), 2);
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut graph = GraphModel::new();
        graph.add_node(GraphNode::new("a", Status::Ok, 0));

        assert!(!graph.add_edge("a", "a"));
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_depth() {
        let mut graph = GraphModel::new();
        assert_eq!(graph.depth(), 0);

        graph.add_node(GraphNode::new("a", Status::Ok, 0));
        graph.add_node(GraphNode::new("b", Status::Ok, 1));
        graph.add_node(GraphNode::new("c", Status::Ok, 2));
        assert_eq!(graph.depth(), 3);
    }

    #[test]
    fn test_status_counts() {
        let mut graph = GraphModel::new();
        graph.add_node(GraphNode::new("a", Status::Ok, 0));
        graph.add_node(GraphNode::new("b", Status::Error, 1));
        graph.add_node(GraphNode::new("c", Status::Error, 1));

        let counts = graph.status_counts();
        assert_eq!(counts[&Status::Ok], 1);
        assert_eq!(counts[&Status::Error], 2);
        assert!(!counts.contains_key(&Status::Warning));
    }
}
