//! Graph Serializer
//!
//! Renders a [`CallGraph`] as Graphviz DOT. Serialization runs in two passes:
//! [`Plan`] decides which statements and cluster members to emit, then
//! [`DotWriter`] renders the plan. The writer never generates ids, so the same
//! graph always renders to the same bytes.

use crate::domain::graph::{Attributes, CallGraph, GraphNode, NodeId};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Escape a string for use inside a quoted DOT field.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// `s` escaped and wrapped in double quotes.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", escape(s))
}

fn is_plain_id(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn attr_key(key: &str) -> String {
    if is_plain_id(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn attr_line(key: &str, value: &str) -> String {
    format!("{}={}", attr_key(key), quote(value))
}

/// `[k1="v1", k2="v2"]`, or nothing for an empty map.
fn attr_list(attrs: &Attributes) -> String {
    if attrs.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = attrs.iter().map(|(k, v)| attr_line(k, v)).collect();
    format!(" [{}]", parts.join(", "))
}

/// `"<identity>" [attrs]`
pub fn declaration(node: &GraphNode<'_>) -> String {
    format!("{}{}", quote(&node.identity), attr_list(&node.attributes))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement {
    /// A node without children, declared on its own line.
    Node(NodeId),
    /// A node with its child list: `{node} -> {child child ...}`.
    Edges(NodeId),
}

impl Statement {
    pub fn subject(self) -> NodeId {
        match self {
            Statement::Node(id) | Statement::Edges(id) => id,
        }
    }
}

/// What a document will contain: body statements in emission order and
/// the members planned for each cluster.
#[derive(Debug, Default)]
pub struct Plan {
    statements: Vec<Statement>,
    clusters: IndexMap<String, Vec<NodeId>>,
    declared: HashSet<NodeId>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_graph(graph: &CallGraph<'_>) -> Self {
        let mut plan = Self::new();
        plan.add_node(graph, graph.root());
        plan
    }

    /// Plans `id` and everything reachable from it, pre-order. Nodes that are
    /// already planned are referenced by edges but never declared again.
    pub fn add_node(&mut self, graph: &CallGraph<'_>, id: NodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if !self.declared.insert(id) {
                continue;
            }
            let node = &graph[id];
            if let Some(cluster) = &node.cluster {
                self.clusters.entry(cluster.key.clone()).or_default().push(id);
            }
            if node.children.is_empty() {
                self.statements.push(Statement::Node(id));
            } else {
                self.statements.push(Statement::Edges(id));
            }
            for child in node.children.iter().rev() {
                if !self.declared.contains(child) {
                    stack.push(*child);
                }
            }
        }
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn cluster_members(&self, key: &str) -> Option<&[NodeId]> {
        self.clusters.get(key).map(Vec::as_slice)
    }

    pub fn is_declared(&self, id: NodeId) -> bool {
        self.declared.contains(&id)
    }
}

/// DOT document options and renderer.
#[derive(Debug, Clone, Default)]
pub struct DotWriter {
    title: Option<String>,
    graph_attributes: Attributes,
}

impl DotWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Adds global options, emitted as header lines in insertion order.
    pub fn set_graph_attributes(&mut self, attrs: &Attributes) {
        self.graph_attributes.extend(attrs);
    }

    pub fn graph_attributes(&self) -> &Attributes {
        &self.graph_attributes
    }

    pub fn serialize(&self, graph: &CallGraph<'_>) -> String {
        self.render(graph, &Plan::for_graph(graph))
    }

    /// Header, cluster blocks, body, terminator. Cluster blocks follow the
    /// order the graph created its clusters.
    pub fn render(&self, graph: &CallGraph<'_>, plan: &Plan) -> String {
        let mut out = String::new();

        match &self.title {
            Some(title) => out.push_str(&format!("digraph {} {{\n", quote(title))),
            None => out.push_str("digraph {\n"),
        }
        for (key, value) in self.graph_attributes.iter() {
            out.push_str(&format!("    {}\n", attr_line(key, value)));
        }

        for (key, info) in graph.clusters() {
            let members = match plan.cluster_members(key) {
                Some(members) if !members.is_empty() => members,
                _ => continue,
            };
            out.push_str(&format!("    subgraph {} {{\n", quote(&format!("cluster_{}", key))));
            for (k, v) in info.attributes.iter() {
                out.push_str(&format!("        {}\n", attr_line(k, v)));
            }
            let names: Vec<String> = members.iter().map(|id| quote(&graph[*id].identity)).collect();
            out.push_str(&format!("        {}\n", names.join(" ")));
            out.push_str("    }\n");
        }

        for statement in &plan.statements {
            match *statement {
                Statement::Node(id) => {
                    out.push_str(&format!("    {}\n", declaration(&graph[id])));
                }
                Statement::Edges(id) => {
                    let children: Vec<String> = graph.children(id).map(declaration).collect();
                    out.push_str(&format!(
                        "    {{{}}} -> {{{}}}\n",
                        declaration(&graph[id]),
                        children.join(" ")
                    ));
                }
            }
        }

        out.push_str("}\n");
        out
    }
}
