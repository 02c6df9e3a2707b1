// Command-line entry point for callgraph_dot.

use anyhow::Result;
use callgraph_dot::application::GenerateUsecase;
use callgraph_dot::config::Settings;
use callgraph_dot::infrastructure::{DotFileExporter, JsonHierarchySource};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Render a call hierarchy (JSON) as a Graphviz DOT call graph, one cluster
/// per source file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Call hierarchy JSON file (`-` for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Output DOT file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Settings TOML file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Digraph name
    #[arg(long)]
    title: Option<String>,

    /// Layout direction (LR, TB, RL, BT)
    #[arg(long)]
    rankdir: Option<String>,

    /// Prefix replaced by ${workspace} in cluster labels
    #[arg(long)]
    workspace_root: Option<String>,

    /// Attach each symbol's range as a `range` attribute
    #[arg(long)]
    include_range: bool,

    /// Do not expand nodes at this depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Stop adding nodes after this many
    #[arg(long)]
    max_nodes: Option<usize>,

    /// Sequential element ids so repeated runs produce identical files
    #[arg(long)]
    stable_ids: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if self.title.is_some() {
            settings.title = self.title.clone();
        }
        if self.rankdir.is_some() {
            settings.rankdir = self.rankdir.clone();
        }
        if self.workspace_root.is_some() {
            settings.workspace_root = self.workspace_root.clone();
        }
        if self.max_depth.is_some() {
            settings.max_depth = self.max_depth;
        }
        if self.max_nodes.is_some() {
            settings.max_nodes = self.max_nodes;
        }
        settings.include_range |= self.include_range;
        settings.stable_ids |= self.stable_ids;
        Ok(settings)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so DOT on stdout can be piped.
    let filter = match cli.verbose {
        0 => EnvFilter::new("callgraph_dot=info"),
        1 => EnvFilter::new("callgraph_dot=debug"),
        _ => EnvFilter::new("callgraph_dot=trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let settings = cli.settings()?;
    let source = JsonHierarchySource::new(&cli.input);
    let usecase = GenerateUsecase {
        source: &source,
        exporter: &DotFileExporter,
        settings: &settings,
    };

    let dot = usecase.run(cli.output.as_deref())?;
    if cli.output.is_none() {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(dot.as_bytes())?;
        stdout.flush()?;
    }
    Ok(())
}
