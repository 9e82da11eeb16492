//! # Export Command Implementation
//!
//! Implements `graphmize export`, which prints the dependency graph in a
//! structured form. Every node carries `apiVersion`, `kind`, `label`,
//! `children` and `patches` (keyed by patch sequence id). Shared bases are
//! repeated under every overlay that references them.

use anyhow::Result;
use clap::{Args, ValueEnum};
use std::io::{self, Write};

use graphmize::graph::Graph;

use super::{build_graph, source_dir, CommandContext};

/// Structured output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Json,
    Yaml,
}

/// Print the dependency graph as JSON or YAML
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Directory to search (defaults to the current directory)
    #[arg(short, long, value_name = "DIR", env = "GRAPHMIZE_SOURCE")]
    pub source: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the `export` command.
pub fn execute(args: ExportArgs, context: &CommandContext) -> Result<()> {
    let dir = source_dir(args.source.as_deref(), &context.settings)?;
    let graph = build_graph(&dir)?;

    let document = serialize(&graph, args.format, args.pretty)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(document.as_bytes())?;
    Ok(())
}

fn serialize(graph: &Graph, format: ExportFormat, pretty: bool) -> Result<String> {
    let mut document = match format {
        ExportFormat::Json => graph.to_json(pretty)?,
        ExportFormat::Yaml => graph.to_yaml()?,
    };
    if !document.ends_with('\n') {
        document.push('\n');
    }
    Ok(document)
}
