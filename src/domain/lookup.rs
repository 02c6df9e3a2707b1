// Node lookup over a built call graph.
// Used to map a clicked element in a rendered graph back to source.

use crate::domain::graph::{CallGraph, GraphNode};
use crate::domain::hierarchy::Position;
use std::collections::HashSet;

/// Pre-order depth-first search from the root; the first node matching
/// `predicate` wins. Shared nodes and self-references are visited once.
pub fn find<'g, 'a, P>(graph: &'g CallGraph<'a>, mut predicate: P) -> Option<&'g GraphNode<'a>>
where
    P: FnMut(&GraphNode<'a>) -> bool,
{
    let mut visited = HashSet::new();
    let mut stack = vec![graph.root()];
    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        let node = graph.get(id)?;
        if predicate(node) {
            return Some(node);
        }
        stack.extend(node.children.iter().rev().copied());
    }
    None
}

/// Node whose generated `id` attribute equals `element_id`.
pub fn find_by_element_id<'g, 'a>(graph: &'g CallGraph<'a>, element_id: &str) -> Option<&'g GraphNode<'a>> {
    find(graph, |n| n.element_id() == Some(element_id))
}

/// First node whose source record lies in `uri` and spans `pos`.
pub fn find_at_position<'g, 'a>(
    graph: &'g CallGraph<'a>,
    uri: &str,
    pos: Position,
) -> Option<&'g GraphNode<'a>> {
    find(graph, |n| n.record().uri == uri && n.record().range.contains(pos))
}
