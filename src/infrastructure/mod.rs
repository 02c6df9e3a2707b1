// Infrastructure implementations of the ports.

pub mod dot_exporter;
pub mod ids;
pub mod json_source;

pub use dot_exporter::DotFileExporter;
pub use ids::{ConfiguredIds, SequentialIds, UuidIds};
pub use json_source::JsonHierarchySource;
