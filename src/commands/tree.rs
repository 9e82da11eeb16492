//! # Tree Command Implementation
//!
//! Implements `graphmize tree`, which builds the dependency graph of every
//! kustomization below the search directory and prints it as a tree.
//!
//! - **Search directory**: `--source`, `GRAPHMIZE_SOURCE`, the `source`
//!   setting, or the current directory
//! - **Depth control**: `--depth` (or the `depth` setting) limits how many
//!   levels below the root are printed
//! - **Patches**: listed under the node they apply to with a `(p)` suffix
//!
//! This command is read-only.

use anyhow::Result;
use clap::Args;
use std::io::{self, Write};
use std::path::Path;

use graphmize::graph::Graph;
use graphmize::output::OutputConfig;
use graphmize::render::{render, RenderOptions};

use super::{build_graph, source_dir, CommandContext};

/// Print the kustomize dependency tree
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Directory to search (defaults to the current directory)
    #[arg(short, long, value_name = "DIR", env = "GRAPHMIZE_SOURCE")]
    pub source: Option<String>,

    /// Maximum depth to display in the tree.
    ///
    /// If not specified, displays the full tree.
    /// Use 1 to show only the top-level kustomizations, 2 to add their
    /// direct references, etc.
    #[arg(long, value_name = "NUM")]
    pub depth: Option<usize>,
}

/// Execute the `tree` command.
pub fn execute(args: TreeArgs, context: &CommandContext) -> Result<()> {
    let dir = source_dir(args.source.as_deref(), &context.settings)?;
    let graph = build_graph(&dir)?;

    let options = RenderOptions {
        use_color: context.output.use_color,
        depth: args.depth.or(context.settings.depth),
    };

    let stdout = io::stdout();
    write_tree(&dir, &graph, &options, &context.output, stdout.lock())
}

fn write_tree<W: Write>(
    dir: &Path,
    graph: &Graph,
    options: &RenderOptions,
    output: &OutputConfig,
    mut out: W,
) -> Result<()> {
    writeln!(
        out,
        "{}Kustomize graph for: {}",
        output.decorate("🌳 ", ""),
        dir.display()
    )?;
    render(graph, options, &mut out)
        .map_err(|e| anyhow::anyhow!("Failed to display tree: {}", e))?;
    Ok(())
}
