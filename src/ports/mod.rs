use crate::domain::hierarchy::HierarchyRecord;
use std::path::Path;

/// Supplies the fully materialized call hierarchy.
pub trait HierarchySource {
    fn load(&self) -> anyhow::Result<HierarchyRecord>;
}

/// Writes rendered DOT text somewhere.
pub trait OutputExporter {
    fn export(&self, dot: &str, path: &Path) -> anyhow::Result<()>;
}

/// Produces the unique `id` attributes that let a viewer map rendered
/// elements back to graph nodes.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}
