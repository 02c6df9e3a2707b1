/// Configuration for a generate run.
///
/// Loaded from an optional TOML file, then overridden by command-line flags.

use crate::domain::builder::BuildOptions;
use crate::domain::graph::Attributes;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_RANKDIR: &str = "LR";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Name of the digraph.
    pub title: Option<String>,
    /// Layout direction; `LR` when unset.
    pub rankdir: Option<String>,
    /// Prefix replaced by `${workspace}` in cluster labels.
    pub workspace_root: Option<String>,
    pub include_range: bool,
    pub max_depth: Option<usize>,
    pub max_nodes: Option<usize>,
    /// Sequential ids instead of random uuids.
    pub stable_ids: bool,
    /// Extra global graph options, emitted after `rankdir` and `id`.
    pub graph_attributes: IndexMap<String, String>,
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid settings TOML")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Failed to load {}", path.display()))
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            workspace_root: self.workspace_root.clone(),
            include_range: self.include_range,
            max_depth: self.max_depth,
            max_nodes: self.max_nodes,
        }
    }

    /// `rankdir`, then the graph `id`, then configured extras.
    pub fn graph_attributes(&self, graph_id: String) -> Attributes {
        let mut attrs = Attributes::new()
            .with("rankdir", self.rankdir.as_deref().unwrap_or(DEFAULT_RANKDIR))
            .with("id", graph_id);
        for (key, value) in &self.graph_attributes {
            attrs.insert(key.as_str(), value.as_str());
        }
        attrs
    }
}
