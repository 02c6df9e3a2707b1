use crate::ports::OutputExporter;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Writes DOT text to a file, creating missing parent directories.
pub struct DotFileExporter;

impl OutputExporter for DotFileExporter {
    fn export(&self, dot: &str, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, dot).with_context(|| format!("Failed to write {}", path.display()))?;
        info!("generate dot file: {}", path.display());
        Ok(())
    }
}
