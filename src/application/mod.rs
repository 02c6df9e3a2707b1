use crate::config::Settings;
use crate::domain::builder::GraphBuilder;
use crate::domain::dot::DotWriter;
use crate::domain::hierarchy::HierarchyRecord;
use crate::infrastructure::{ConfiguredIds, SequentialIds, UuidIds};
use crate::ports::{HierarchySource, IdGenerator, OutputExporter};
use anyhow::Result;
use std::path::Path;
use tracing::{debug, info};

/// Build and serialize `root` with `settings`. Pure apart from id generation.
pub fn generate_dot(root: &HierarchyRecord, settings: &Settings) -> String {
    let mut builder = GraphBuilder::new(settings.build_options(), ConfiguredIds::new(settings.stable_ids));
    let graph = builder.build(root);

    let graph_id = if settings.stable_ids {
        SequentialIds::with_prefix("g").next_id()
    } else {
        UuidIds.next_id()
    };
    let mut writer = match &settings.title {
        Some(title) => DotWriter::new().with_title(title.as_str()),
        None => DotWriter::new(),
    };
    writer.set_graph_attributes(&settings.graph_attributes(graph_id));

    let dot = writer.serialize(&graph);
    debug!(nodes = graph.node_count(), bytes = dot.len(), "serialized call graph");
    dot
}

pub struct GenerateUsecase<'a> {
    pub source: &'a dyn HierarchySource,
    pub exporter: &'a dyn OutputExporter,
    pub settings: &'a Settings,
}

impl<'a> GenerateUsecase<'a> {
    /// Load, build, serialize, and export to `output` when given.
    /// Returns the DOT text either way.
    pub fn run(&self, output: Option<&Path>) -> Result<String> {
        let root = self.source.load()?;
        info!(root = %root.name, uri = %root.uri, "generating call graph");

        let dot = generate_dot(&root, self.settings);
        if let Some(path) = output {
            self.exporter.export(&dot, path)?;
        }
        Ok(dot)
    }
}
