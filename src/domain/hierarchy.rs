//! Call Hierarchy Input
//!
//! Pre-resolved caller/callee records as handed over by the code navigation
//! layer. The core only reads these.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Zero-based line/character position inside a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Source range of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start_line: u32, start_char: u32, end_line: u32, end_char: u32) -> Self {
        Self {
            start: Position::new(start_line, start_char),
            end: Position::new(end_line, end_char),
        }
    }

    /// Whether `pos` falls inside this range (end inclusive).
    pub fn contains(&self, pos: Position) -> bool {
        let after_start = (pos.line, pos.character) >= (self.start.line, self.start.character);
        let before_end = (pos.line, pos.character) <= (self.end.line, self.end.character);
        after_start && before_end
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.start.line, self.start.character, self.end.line, self.end.character
        )
    }
}

/// One symbol of the hierarchy together with its direct callees (or callers,
/// depending on which direction the navigation layer expanded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyRecord {
    /// Resource identifier of the owning file.
    pub uri: String,
    /// Display name of the symbol.
    pub name: String,
    pub range: Range,
    /// Extra detail shown by editors next to the name (e.g. a signature).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default)]
    pub children: Vec<HierarchyRecord>,
}

impl HierarchyRecord {
    pub fn new(uri: impl Into<String>, name: impl Into<String>, range: Range) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            range,
            detail: None,
            children: Vec::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_children(mut self, children: Vec<HierarchyRecord>) -> Self {
        self.children = children;
        self
    }

    /// `<uri>#<name>@<start line>:<start char>:<end line>:<end char>`
    pub fn identity(&self) -> String {
        format!("{}#{}@{}", self.uri, self.name, self.range)
    }
}

// Children are unlinked onto a heap stack so a deep chain drops without
// recursing once per level.
impl Drop for HierarchyRecord {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut record) = pending.pop() {
            pending.append(&mut record.children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_format() {
        let record = HierarchyRecord::new("file:///ws/src/lib.rs", "parse", Range::new(3, 4, 10, 1));
        assert_eq!(record.identity(), "file:///ws/src/lib.rs#parse@3:4:10:1");
    }

    #[test]
    fn test_deserialize_without_children() {
        let json = r#"{
            "uri": "file:///a.rs",
            "name": "main",
            "range": { "start": { "line": 0, "character": 0 }, "end": { "line": 2, "character": 1 } }
        }"#;
        let record: HierarchyRecord = serde_json::from_str(json).unwrap();
        assert!(record.children.is_empty());
        assert!(record.detail.is_none());
        assert_eq!(record.range, Range::new(0, 0, 2, 1));
    }

    #[test]
    fn test_range_contains() {
        let range = Range::new(2, 4, 5, 0);
        assert!(range.contains(Position::new(2, 4)));
        assert!(range.contains(Position::new(3, 100)));
        assert!(range.contains(Position::new(5, 0)));
        assert!(!range.contains(Position::new(2, 3)));
        assert!(!range.contains(Position::new(5, 1)));
    }

    #[test]
    fn test_deep_tree_drops() {
        let mut tail = HierarchyRecord::new("file:///a.rs", "leaf", Range::default());
        for line in 1..100_000 {
            tail = HierarchyRecord::new("file:///a.rs", "f", Range::new(line, 0, line, 1))
                .with_children(vec![tail]);
        }
        drop(tail);
    }
}
