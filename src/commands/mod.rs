//! # CLI Command Implementations
//!
//! One module per `graphmize` subcommand. Each defines an `Args` struct
//! derived with `clap` and an `execute` function running the command.
//!
//! The helpers below are shared by the commands that build a graph: they
//! resolve the search directory from flags and settings, and build the graph
//! from the real filesystem with user-facing errors.

pub mod completions;
pub mod export;
pub mod tree;

use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use graphmize::filesystem::OsFileSystem;
use graphmize::graph::{build_all, Graph};
use graphmize::output::OutputConfig;
use graphmize::path::resolve_source;
use graphmize::settings::Settings;
use graphmize::suggestions;

/// State shared by every command once global flags are resolved
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub settings: Settings,
    pub output: OutputConfig,
}

/// Directory to search: `--source`, then the settings file, then the current
/// directory. Relative values are resolved against the current directory.
pub fn source_dir(flag: Option<&str>, settings: &Settings) -> Result<PathBuf> {
    let source = flag.or(settings.source.as_deref()).unwrap_or_default();
    let current_dir = std::env::current_dir()
        .map_err(|e| anyhow::anyhow!("Cannot get current directory: {}", e))?;

    let dir = resolve_source(source, &current_dir);
    if !dir.is_dir() {
        return Err(suggestions::source_not_found(&dir));
    }
    Ok(dir)
}

/// Build the graph for `dir` from the real filesystem.
pub fn build_graph(dir: &std::path::Path) -> Result<Graph> {
    debug!("Building graph for {}", dir.display());
    let graph = build_all(&OsFileSystem, dir).map_err(|e| suggestions::build_failed(dir, &e))?;
    debug!("Graph has {} nodes", graph.node_count());
    Ok(graph)
}
