use crate::domain::hierarchy::HierarchyRecord;
use crate::ports::HierarchySource;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Reads a call hierarchy serialized as JSON. A path of `-` reads stdin.
pub struct JsonHierarchySource {
    path: PathBuf,
}

impl JsonHierarchySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a hierarchy from JSON text.
    ///
    /// Nesting depth is unbounded: each level costs two JSON levels (the
    /// record and its `children` array), and the stack grows on the heap as
    /// needed.
    pub fn parse(json: &str) -> Result<HierarchyRecord> {
        Self::parse_unbounded(json).context("Invalid call hierarchy JSON")
    }

    fn parse_unbounded(json: &str) -> serde_json::Result<HierarchyRecord> {
        let mut de = serde_json::Deserializer::from_str(json);
        de.disable_recursion_limit();
        let record = HierarchyRecord::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Ok(record)
    }

    fn read_input(&self) -> Result<String> {
        if self.path.as_os_str() == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read call hierarchy from stdin")?;
            return Ok(buf);
        }
        fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read call hierarchy {}", self.path.display()))
    }
}

impl HierarchySource for JsonHierarchySource {
    fn load(&self) -> Result<HierarchyRecord> {
        let content = self.read_input()?;
        Self::parse(&content).with_context(|| format!("Failed to load {}", self.path.display()))
    }
}
