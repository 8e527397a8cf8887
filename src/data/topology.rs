//! Dependency topology construction from CMDB adjacency.

use std::collections::HashSet;

use super::graph::{GraphModel, GraphNode};
use super::status::StatusResolver;
use crate::source::CmdbSnapshot;

impl GraphModel {
    /// Build the dependency tree rooted at `root`.
    ///
    /// Depth-first over `depends_on` lists in declaration order. The first
    /// visit of an identifier wins: a dependency that has already been
    /// visited is not re-expanded and contributes no further edge, which
    /// keeps the result a strict tree over the visited set and terminates
    /// cycles and diamond dependencies.
    ///
    /// Identifiers without a CMDB record become leaves with the resolver's
    /// default status; a root absent from the CMDB still yields a one-node
    /// tree. Construction never fails.
    pub fn dependency_topology(
        cmdb: &CmdbSnapshot,
        root: &str,
        resolver: &StatusResolver,
    ) -> Self {
        let mut graph = GraphModel::new();
        let mut visited = HashSet::new();
        walk(cmdb, resolver, &mut graph, &mut visited, root, 0);
        graph
    }
}

fn walk(
    cmdb: &CmdbSnapshot,
    resolver: &StatusResolver,
    graph: &mut GraphModel,
    visited: &mut HashSet<String>,
    id: &str,
    depth: usize,
) {
    visited.insert(id.to_string());

    let record = cmdb.get(id);
    graph.add_node(GraphNode {
        id: id.to_string(),
        status: resolver.resolve(id, record),
        depth,
        attributes: record.map(|r| r.attributes.clone()).unwrap_or_default(),
    });

    // An identifier with no record is a leaf
    let Some(record) = record else { return };

    for dep in &record.depends_on {
        if visited.contains(dep) {
            continue;
        }
        graph.add_edge(id, dep);
        walk(cmdb, resolver, graph, visited, dep, depth + 1);
    }
}

/// Identifiers reachable from `root` through `depends_on` edges, in
/// depth-first visit order (root first).
pub fn reachable(cmdb: &CmdbSnapshot, root: &str) -> Vec<String> {
    let resolver = StatusResolver::new();
    GraphModel::dependency_topology(cmdb, root, &resolver)
        .nodes()
        .iter()
        .map(|n| n.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Status;
    use crate::source::ConfigItem;

    fn item(deps: &[&str], rag: Option<&str>) -> ConfigItem {
        ConfigItem {
            depends_on: deps.iter().map(|d| d.to_string()).collect(),
            rag: rag.map(|r| r.to_string()),
            ..Default::default()
        }
    }

    fn cmdb(entries: &[(&str, ConfigItem)]) -> CmdbSnapshot {
        entries
            .iter()
            .map(|(id, item)| (id.to_string(), item.clone()))
            .collect()
    }

    #[test]
    fn test_simple_tree() {
        let cmdb = cmdb(&[
            ("web01", item(&["app01", "db01"], Some("green"))),
            ("app01", item(&["db01"], Some("amber"))),
            ("db01", item(&[], Some("red"))),
        ]);
        let resolver = StatusResolver::new();

        let graph = GraphModel::dependency_topology(&cmdb, "web01", &resolver);

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.node("web01").unwrap().status, Status::Ok);
        assert_eq!(graph.node("app01").unwrap().status, Status::Warning);
        assert_eq!(graph.node("db01").unwrap().status, Status::Error);
        assert_eq!(graph.depth(), 3);
    }

    #[test]
    fn test_cycle_terminates() {
        let cmdb = cmdb(&[
            ("a", item(&["b"], None)),
            ("b", item(&["a"], None)),
        ]);
        let resolver = StatusResolver::new();

        let graph = GraphModel::dependency_topology(&cmdb, "a", &resolver);

        let ids: Vec<&str> = graph.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.edges()[0].source, "a");
        assert_eq!(graph.edges()[0].target, "b");
    }

    #[test]
    fn test_self_dependency_ignored() {
        let cmdb = cmdb(&[("a", item(&["a", "b"], None)), ("b", item(&[], None))]);
        let resolver = StatusResolver::new();

        let graph = GraphModel::dependency_topology(&cmdb, "a", &resolver);

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.edges()[0].target, "b");
    }

    #[test]
    fn test_diamond_first_visit_wins() {
        // a -> b, a -> c, and both b and c depend on d; d's subtree is
        // expanded under b (the first path) only
        let cmdb = cmdb(&[
            ("a", item(&["b", "c"], None)),
            ("b", item(&["d"], None)),
            ("c", item(&["d"], None)),
            ("d", item(&[], None)),
        ]);
        let resolver = StatusResolver::new();

        let graph = GraphModel::dependency_topology(&cmdb, "a", &resolver);

        assert_eq!(graph.len(), 4);
        assert_eq!(graph.node("d").unwrap().depth, 2);
        let edges: Vec<(&str, &str)> = graph
            .edges()
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(edges, vec![("a", "b"), ("b", "d"), ("a", "c")]);
    }

    #[test]
    fn test_tree_edge_count() {
        // A tree over the visited set has exactly len - 1 edges
        let cmdb = cmdb(&[
            ("a", item(&["b", "c"], None)),
            ("b", item(&["c", "a"], None)),
            ("c", item(&["a"], None)),
        ]);
        let resolver = StatusResolver::new();

        let graph = GraphModel::dependency_topology(&cmdb, "a", &resolver);
        assert_eq!(graph.edges().len(), graph.len() - 1);
    }

    #[test]
    fn test_missing_root_yields_leaf() {
        let cmdb = CmdbSnapshot::new();
        let resolver = StatusResolver::new();

        let graph = GraphModel::dependency_topology(&cmdb, "ghost", &resolver);

        assert_eq!(graph.len(), 1);
        let node = graph.node("ghost").unwrap();
        assert_eq!(node.status, Status::Unknown);
        assert_eq!(node.depth, 0);
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_unknown_dependency_becomes_leaf() {
        let cmdb = cmdb(&[("web01", item(&["mystery"], Some("green")))]);
        let resolver = StatusResolver::new();

        let graph = GraphModel::dependency_topology(&cmdb, "web01", &resolver);

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.node("mystery").unwrap().status, Status::Unknown);
        assert_eq!(graph.edges().len(), 1);
    }

    #[test]
    fn test_visit_order_follows_declaration_order() {
        let cmdb = cmdb(&[
            ("root", item(&["z", "a", "m"], None)),
            ("z", item(&[], None)),
            ("a", item(&[], None)),
            ("m", item(&[], None)),
        ]);
        let resolver = StatusResolver::new();

        let graph = GraphModel::dependency_topology(&cmdb, "root", &resolver);
        let ids: Vec<&str> = graph.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["root", "z", "a", "m"]);
    }

    #[test]
    fn test_impacted_node_in_topology() {
        let cmdb = cmdb(&[
            ("web01", item(&["db01"], Some("green"))),
            ("db01", item(&[], Some("green"))),
        ]);
        let alerts = vec![crate::source::Alert {
            ci: "db01".to_string(),
            ..Default::default()
        }];
        let resolver = StatusResolver::from_alerts(&alerts);

        let graph = GraphModel::dependency_topology(&cmdb, "web01", &resolver);
        assert_eq!(graph.node("web01").unwrap().status, Status::Ok);
        assert_eq!(graph.node("db01").unwrap().status, Status::Error);
    }

    #[test]
    fn test_reachable() {
        let cmdb = cmdb(&[
            ("a", item(&["b"], None)),
            ("b", item(&["c", "a"], None)),
            ("c", item(&[], None)),
            ("x", item(&["y"], None)),
        ]);

        assert_eq!(reachable(&cmdb, "a"), vec!["a", "b", "c"]);
        assert_eq!(reachable(&cmdb, "x"), vec!["x", "y"]);
    }
}
