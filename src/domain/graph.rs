// Call graph structures built from a call hierarchy.
// Nodes live in an arena and refer to each other by NodeId, so a node can be
// shared by several parents or point back at itself.

use crate::domain::hierarchy::HierarchyRecord;
use indexmap::IndexMap;
use std::ops::Index;

/// Insertion-ordered string attributes of a node, cluster or graph.
///
/// Equality ignores order, iteration follows insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(IndexMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `key`. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn extend(&mut self, other: &Attributes) {
        for (k, v) in other.iter() {
            self.insert(k, v);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Index of a node inside its CallGraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which cluster a node is drawn in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClusterRef {
    /// Resource identifier of the owning file.
    pub key: String,
    /// Key with the workspace root replaced by `${workspace}`.
    pub label: String,
}

/// Cluster header data, created the first time a file is seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterInfo {
    pub label: String,
    /// Emitted as the cluster's option lines (`label`, `id`).
    pub attributes: Attributes,
}

/// A node in the call graph.
#[derive(Debug, Clone)]
pub struct GraphNode<'a> {
    /// Serialized node name and dedup key.
    pub identity: String,
    pub attributes: Attributes,
    pub cluster: Option<ClusterRef>,
    /// Outgoing edges, in hierarchy order.
    pub children: Vec<NodeId>,
    record: &'a HierarchyRecord,
}

impl<'a> GraphNode<'a> {
    pub(crate) fn new(
        identity: String,
        attributes: Attributes,
        cluster: Option<ClusterRef>,
        record: &'a HierarchyRecord,
    ) -> Self {
        Self {
            identity,
            attributes,
            cluster,
            children: Vec::new(),
            record,
        }
    }

    /// The record this node was built from.
    pub fn record(&self) -> &'a HierarchyRecord {
        self.record
    }

    /// The generated unique id attribute.
    pub fn element_id(&self) -> Option<&str> {
        self.attributes.get("id")
    }

    pub fn label(&self) -> Option<&str> {
        self.attributes.get("label")
    }
}

// Equality ignores children and the source record.
impl PartialEq for GraphNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
            && self.attributes == other.attributes
            && self.cluster == other.cluster
    }
}

impl Eq for GraphNode<'_> {}

/// The deduplicated call graph. Node 0 is the root.
#[derive(Debug, Clone)]
pub struct CallGraph<'a> {
    pub(crate) nodes: Vec<GraphNode<'a>>,
    pub(crate) clusters: IndexMap<String, ClusterInfo>,
    pub(crate) truncated: bool,
}

impl<'a> CallGraph<'a> {
    pub(crate) fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            clusters: IndexMap::new(),
            truncated: false,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> Option<&GraphNode<'a>> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &GraphNode<'a>)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &GraphNode<'a>> {
        self[id].children.iter().map(move |c| &self[*c])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.children.len()).sum()
    }

    pub fn clusters(&self) -> impl Iterator<Item = (&str, &ClusterInfo)> {
        self.clusters.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn cluster(&self, key: &str) -> Option<&ClusterInfo> {
        self.clusters.get(key)
    }

    /// True when a depth or node-count guard stopped the build early.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub(crate) fn push(&mut self, node: GraphNode<'a>) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
    }
}

impl<'a> Index<NodeId> for CallGraph<'a> {
    type Output = GraphNode<'a>;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}
