//! Node Builder
//!
//! Turns a call hierarchy into a deduplicated [`CallGraph`]. Records that
//! resolve to the same identity (same file, name and range) become one shared
//! node, so repeated call targets and recursive calls are expanded once.

use crate::domain::graph::{Attributes, CallGraph, ClusterInfo, ClusterRef, GraphNode, NodeId};
use crate::domain::hierarchy::{HierarchyRecord, Range};
use crate::ports::IdGenerator;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Placeholder substituted for the workspace root in cluster labels.
pub const WORKSPACE_PLACEHOLDER: &str = "${workspace}";

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Prefix replaced by `${workspace}` in cluster labels.
    pub workspace_root: Option<String>,
    /// Attach the record range as a JSON `range` attribute.
    pub include_range: bool,
    /// Nodes at this depth (root = 0) are not expanded.
    pub max_depth: Option<usize>,
    /// Stop creating nodes once the graph holds this many. The root always
    /// counts and is always built, so `Some(0)` behaves like `Some(1)` and
    /// marks the graph truncated.
    pub max_nodes: Option<usize>,
}

/// One pending expansion: `record`'s children not yet attached to `node`.
struct Frame<'a> {
    node: NodeId,
    record: &'a HierarchyRecord,
    next_child: usize,
    depth: usize,
}

pub struct GraphBuilder<G: IdGenerator> {
    options: BuildOptions,
    ids: G,
}

impl<G: IdGenerator> GraphBuilder<G> {
    pub fn new(options: BuildOptions, ids: G) -> Self {
        Self { options, ids }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Build the graph rooted at `root`.
    ///
    /// Walks depth-first in hierarchy order. A child whose identity was
    /// already built, anywhere in the graph, is linked to the existing node
    /// and not expanded again.
    pub fn build<'a>(&mut self, root: &'a HierarchyRecord) -> CallGraph<'a> {
        let mut graph = CallGraph::empty();
        let mut seen: HashMap<String, NodeId> = HashMap::new();

        let root_node = self.to_node(&mut graph, root);
        let root_id = graph.push(root_node);
        seen.insert(graph[root_id].identity.clone(), root_id);

        let mut stack = Vec::new();
        if self.expands(0) {
            stack.push(Frame {
                node: root_id,
                record: root,
                next_child: 0,
                depth: 0,
            });
        } else if !root.children.is_empty() {
            graph.truncated = true;
        }

        while let Some(frame) = stack.last_mut() {
            let record: &'a HierarchyRecord = frame.record;
            let Some(child) = record.children.get(frame.next_child) else {
                stack.pop();
                continue;
            };
            frame.next_child += 1;
            let parent = frame.node;
            let depth = frame.depth + 1;

            let identity = child.identity();
            if let Some(&existing) = seen.get(&identity) {
                graph.add_child(parent, existing);
                continue;
            }

            if self.at_node_limit(&graph) {
                graph.truncated = true;
                continue;
            }

            let node = self.to_node(&mut graph, child);
            let id = graph.push(node);
            seen.insert(identity, id);
            graph.add_child(parent, id);

            if self.expands(depth) {
                stack.push(Frame {
                    node: id,
                    record: child,
                    next_child: 0,
                    depth,
                });
            } else if !child.children.is_empty() {
                graph.truncated = true;
            }
        }

        if graph.truncated {
            warn!(
                nodes = graph.node_count(),
                max_depth = ?self.options.max_depth,
                max_nodes = ?self.options.max_nodes,
                "call hierarchy truncated"
            );
        }
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            clusters = graph.clusters.len(),
            "built call graph"
        );

        graph
    }

    fn expands(&self, depth: usize) -> bool {
        self.options.max_depth.map_or(true, |max| depth < max)
    }

    fn at_node_limit(&self, graph: &CallGraph<'_>) -> bool {
        self.options
            .max_nodes
            .is_some_and(|max| graph.node_count() >= max)
    }

    fn to_node<'a>(&mut self, graph: &mut CallGraph<'a>, record: &'a HierarchyRecord) -> GraphNode<'a> {
        let mut attributes = Attributes::new()
            .with("label", record.name.as_str())
            .with("id", self.ids.next_id());
        if self.options.include_range {
            attributes.insert("range", range_json(&record.range));
        }
        if let Some(detail) = &record.detail {
            attributes.insert("tooltip", detail.as_str());
        }

        let cluster = self.cluster_for(graph, &record.uri);
        GraphNode::new(record.identity(), attributes, cluster, record)
    }

    /// Registers the file's cluster on first sight. Records without a uri
    /// are left unclustered.
    fn cluster_for(&mut self, graph: &mut CallGraph<'_>, uri: &str) -> Option<ClusterRef> {
        if uri.is_empty() {
            return None;
        }
        let label = self.display_label(uri);
        if !graph.clusters.contains_key(uri) {
            let attributes = Attributes::new()
                .with("label", label.as_str())
                .with("id", self.ids.next_id());
            graph.clusters.insert(
                uri.to_string(),
                ClusterInfo {
                    label: label.clone(),
                    attributes,
                },
            );
        }
        Some(ClusterRef {
            key: uri.to_string(),
            label,
        })
    }

    fn display_label(&self, uri: &str) -> String {
        match self.options.workspace_root.as_deref() {
            Some(root) if !root.is_empty() => match uri.strip_prefix(root) {
                Some(rest) => format!("{}{}", WORKSPACE_PLACEHOLDER, rest),
                None => uri.to_string(),
            },
            _ => uri.to_string(),
        }
    }
}

// Same shape editors use when serializing a range: [start, end].
fn range_json(range: &Range) -> String {
    serde_json::json!([
        { "line": range.start.line, "character": range.start.character },
        { "line": range.end.line, "character": range.end.character },
    ])
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::SequentialIds;

    fn rec(uri: &str, name: &str, line: u32) -> HierarchyRecord {
        HierarchyRecord::new(uri, name, Range::new(line, 0, line + 2, 1))
    }

    fn builder() -> GraphBuilder<SequentialIds> {
        GraphBuilder::new(BuildOptions::default(), SequentialIds::default())
    }

    #[test]
    fn test_shared_callee_is_built_once() {
        let d = rec("file:///d.rs", "d", 0);
        let root = rec("file:///a.rs", "a", 0).with_children(vec![
            rec("file:///a.rs", "b", 10).with_children(vec![d.clone()]),
            rec("file:///a.rs", "c", 20).with_children(vec![d.clone()]),
        ]);

        let graph = builder().build(&root);
        assert_eq!(graph.node_count(), 4);

        let root_node = &graph[graph.root()];
        let b = root_node.children[0];
        let c = root_node.children[1];
        assert_eq!(graph[b].children, graph[c].children);
        assert_eq!(graph[graph[b].children[0]].identity, d.identity());
    }

    #[test]
    fn test_self_call_links_back_to_itself() {
        let root = rec("file:///a.rs", "a", 0).with_children(vec![rec("file:///a.rs", "a", 0)]);
        let graph = builder().build(&root);

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph[graph.root()].children, vec![graph.root()]);
    }

    #[test]
    fn test_mutual_recursion_terminates() {
        // a -> b -> a -> b ... as an editor would expand it a few levels deep.
        let mut tail = rec("file:///a.rs", "b", 10);
        for i in 0..20 {
            let name = if i % 2 == 0 { "a" } else { "b" };
            let line = if i % 2 == 0 { 0 } else { 10 };
            tail = rec("file:///a.rs", name, line).with_children(vec![tail]);
        }
        let graph = builder().build(&tail);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_later_sibling_matches_node_built_in_earlier_subtree() {
        let shared = rec("file:///s.rs", "shared", 5);
        let root = rec("file:///a.rs", "a", 0).with_children(vec![
            rec("file:///a.rs", "b", 10).with_children(vec![shared.clone()]),
            shared.clone(),
        ]);
        let graph = builder().build(&root);

        assert_eq!(graph.node_count(), 3);
        let root_node = &graph[graph.root()];
        assert_eq!(graph[root_node.children[0]].children[0], root_node.children[1]);
    }

    #[test]
    fn test_node_attributes_and_cluster() {
        let root = rec("file:///ws/src/main.rs", "main", 3).with_detail("fn main()");
        let options = BuildOptions {
            workspace_root: Some("file:///ws".to_string()),
            include_range: true,
            ..Default::default()
        };
        let graph = GraphBuilder::new(options, SequentialIds::default()).build(&root);
        let node = &graph[graph.root()];

        let keys: Vec<&str> = node.attributes.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["label", "id", "range", "tooltip"]);
        assert_eq!(node.label(), Some("main"));
        assert_eq!(node.element_id(), Some("n1"));
        let range: serde_json::Value = serde_json::from_str(node.attributes.get("range").unwrap()).unwrap();
        assert_eq!(
            range,
            serde_json::json!([{ "line": 3, "character": 0 }, { "line": 5, "character": 1 }])
        );
        assert_eq!(node.attributes.get("tooltip"), Some("fn main()"));

        let cluster = node.cluster.as_ref().unwrap();
        assert_eq!(cluster.key, "file:///ws/src/main.rs");
        assert_eq!(cluster.label, "${workspace}/src/main.rs");

        let info = graph.cluster("file:///ws/src/main.rs").unwrap();
        assert_eq!(info.attributes.get("id"), Some("n2"));
        assert_eq!(info.attributes.get("label"), Some("${workspace}/src/main.rs"));
    }

    #[test]
    fn test_uri_outside_workspace_keeps_full_label() {
        let root = rec("file:///elsewhere/lib.rs", "f", 0);
        let options = BuildOptions {
            workspace_root: Some("file:///ws".to_string()),
            ..Default::default()
        };
        let graph = GraphBuilder::new(options, SequentialIds::default()).build(&root);
        let cluster = graph[graph.root()].cluster.as_ref().unwrap();
        assert_eq!(cluster.label, "file:///elsewhere/lib.rs");
    }

    #[test]
    fn test_empty_uri_has_no_cluster() {
        let root = rec("", "anon", 0);
        let graph = builder().build(&root);
        assert!(graph[graph.root()].cluster.is_none());
        assert_eq!(graph.clusters().count(), 0);
    }

    #[test]
    fn test_cluster_created_once_per_file() {
        let root = rec("file:///a.rs", "a", 0).with_children(vec![
            rec("file:///a.rs", "b", 10),
            rec("file:///b.rs", "c", 0),
            rec("file:///a.rs", "d", 20),
        ]);
        let graph = builder().build(&root);
        let keys: Vec<&str> = graph.clusters().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["file:///a.rs", "file:///b.rs"]);
    }

    #[test]
    fn test_max_depth_stops_expansion() {
        let root = rec("file:///a.rs", "a", 0).with_children(vec![
            rec("file:///a.rs", "b", 10).with_children(vec![rec("file:///a.rs", "c", 20)]),
        ]);
        let options = BuildOptions {
            max_depth: Some(1),
            ..Default::default()
        };
        let graph = GraphBuilder::new(options, SequentialIds::default()).build(&root);

        assert_eq!(graph.node_count(), 2);
        assert!(graph.is_truncated());
    }

    #[test]
    fn test_max_nodes_stops_creation() {
        let root = rec("file:///a.rs", "a", 0).with_children(vec![
            rec("file:///a.rs", "b", 10),
            rec("file:///a.rs", "c", 20),
            rec("file:///a.rs", "a", 0),
        ]);
        let options = BuildOptions {
            max_nodes: Some(2),
            ..Default::default()
        };
        let graph = GraphBuilder::new(options, SequentialIds::default()).build(&root);

        assert_eq!(graph.node_count(), 2);
        assert!(graph.is_truncated());
        // Links to nodes that already exist are still recorded.
        assert_eq!(graph[graph.root()].children.len(), 2);
    }

    #[test]
    fn test_zero_node_limit_keeps_root() {
        let root = rec("file:///a.rs", "a", 0).with_children(vec![rec("file:///a.rs", "b", 10)]);
        let options = BuildOptions {
            max_nodes: Some(0),
            ..Default::default()
        };
        let graph = GraphBuilder::new(options, SequentialIds::default()).build(&root);

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph[graph.root()].label(), Some("a"));
        assert!(graph[graph.root()].children.is_empty());
        assert!(graph.is_truncated());
    }

    #[test]
    fn test_untruncated_build() {
        let root = rec("file:///a.rs", "a", 0).with_children(vec![rec("file:///a.rs", "b", 10)]);
        let graph = builder().build(&root);
        assert!(!graph.is_truncated());
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let mut tail = rec("file:///a.rs", "leaf", 0);
        for i in 1..50_000 {
            tail = rec("file:///a.rs", "f", i * 3).with_children(vec![tail]);
        }
        let graph = builder().build(&tail);
        assert_eq!(graph.node_count(), 50_000);
    }
}
