//! # Tree Rendering
//!
//! Prints a [`Graph`] as an indented tree using box-drawing characters:
//!
//! ```text
//! /
//! └── app/sub
//!     ├── app/sub/patch.yaml(p)
//!     └── app/base
//!         └── a.yaml
//!             └── app/sub/patch.yaml(p)
//! ```
//!
//! A node's patches are listed right below it, before its children, with a
//! `(p)` suffix and in cyan when color is enabled. The synthetic root never
//! lists patches. Shared bases are printed once under every overlay that
//! references them.
//!
//! Layout is delegated to `ptree`; this module only adapts graph nodes to
//! [`TreeItem`].

use std::borrow::Cow;
use std::io::{self, Write};

use console::style;
use ptree::print_config::StyleWhen;
use ptree::{PrintConfig, Style, TreeItem};

use crate::graph::{Graph, NodeId, NodeRole};

/// Suffix appended to patch labels
pub const PATCH_MARKER: &str = "(p)";

/// Options controlling how a graph is printed
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Paint patch lines in cyan
    pub use_color: bool,
    /// Maximum depth below the root; `None` prints everything
    pub depth: Option<usize>,
}

#[derive(Clone, Copy)]
enum Entry {
    Node(NodeId),
    Patch(NodeId),
}

/// A graph node or patch as seen by `ptree`
#[derive(Clone)]
struct RenderItem<'a> {
    graph: &'a Graph,
    entry: Entry,
    use_color: bool,
}

impl<'a> RenderItem<'a> {
    fn with_entry(&self, entry: Entry) -> Self {
        Self {
            graph: self.graph,
            entry,
            use_color: self.use_color,
        }
    }
}

impl TreeItem for RenderItem<'_> {
    type Child = Self;

    fn write_self<W: io::Write>(&self, f: &mut W, _style: &Style) -> io::Result<()> {
        match self.entry {
            Entry::Node(id) => write!(f, "{}", self.graph[id].label),
            Entry::Patch(id) => {
                let line = format!("{}{}", self.graph[id].label, PATCH_MARKER);
                if self.use_color {
                    write!(f, "{}", style(line).cyan().force_styling(true))
                } else {
                    write!(f, "{}", line)
                }
            }
        }
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        let Entry::Node(id) = self.entry else {
            return Cow::Owned(Vec::new());
        };
        let node = &self.graph[id];

        let mut items = Vec::with_capacity(node.patches.len() + node.children.len());
        if node.role != NodeRole::Root {
            items.extend(
                node.patches
                    .values()
                    .map(|&patch| self.with_entry(Entry::Patch(patch))),
            );
        }
        items.extend(
            node.children
                .iter()
                .map(|&child| self.with_entry(Entry::Node(child))),
        );
        Cow::Owned(items)
    }
}

fn print_config(options: &RenderOptions) -> PrintConfig {
    let depth = options
        .depth
        .map_or(u32::MAX, |depth| u32::try_from(depth).unwrap_or(u32::MAX));
    PrintConfig {
        depth,
        indent: 4,
        padding: 1,
        styled: StyleWhen::Never,
        ..PrintConfig::default()
    }
}

/// Write the tree rendering of `graph` to `out`.
pub fn render<W: Write>(graph: &Graph, options: &RenderOptions, out: W) -> io::Result<()> {
    let item = RenderItem {
        graph,
        entry: Entry::Node(graph.root()),
        use_color: options.use_color,
    };
    ptree::write_tree_with(&item, out, &print_config(options))
}

/// Render `graph` into a string.
pub fn render_to_string(graph: &Graph, options: &RenderOptions) -> io::Result<String> {
    let mut buffer = Vec::new();
    render(graph, options, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
