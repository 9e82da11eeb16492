//! Graph construction
//!
//! [`build_all`] walks the search root, treats every directory holding a
//! kustomization file as a candidate, and expands each candidate
//! depth-first. Directory references are deduplicated through two maps:
//!
//! - `parent_nodes`: directories built but not (yet) referenced by anyone.
//!   Whatever is left here at the end becomes the children of the root.
//! - `child_nodes`: directories attached under at least one overlay.
//!
//! A directory found in `parent_nodes` when an overlay references it moves to
//! `child_nodes`; one already in `child_nodes` is reused as is. Either way it
//! is built exactly once per build.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::{Graph, GraphNode, NodeId, NodeRole, UNKNOWN_RESOURCE_LABEL};
use crate::error::{Error, Result};
use crate::filesystem::FileSystem;
use crate::locator::locate_composition;
use crate::manifest::{is_composition_file, parse_resource, CompositionManifest};
use crate::path::{clean, join_clean, relative_to, to_label};

/// Build the composition graph for every kustomization found under `root`.
pub fn build_all<F: FileSystem + ?Sized>(fs: &F, root: &Path) -> Result<Graph> {
    GraphBuilder::new(fs, root).build()
}

/// Working memory of one build
#[derive(Debug, Default)]
pub(super) struct TraversalState {
    pub(super) parent_nodes: BTreeMap<PathBuf, NodeId>,
    pub(super) child_nodes: HashMap<PathBuf, NodeId>,
    /// Most recently built resource for each logical name
    pub(super) resource_nodes: HashMap<String, NodeId>,
    /// Patches whose resource has not been built yet, by logical name
    pub(super) pending_patches: HashMap<String, BTreeMap<u64, NodeId>>,
    pub(super) patch_sequence: u64,
    /// Directories whose expansion has started but not finished
    pub(super) in_progress: Vec<PathBuf>,
}

/// Builds one [`Graph`]. The builder is consumed by [`GraphBuilder::build`],
/// so its traversal state never outlives the build.
pub struct GraphBuilder<'a, F: FileSystem + ?Sized> {
    pub(super) fs: &'a F,
    pub(super) root: PathBuf,
    pub(super) graph: Graph,
    pub(super) state: TraversalState,
}

impl<'a, F: FileSystem + ?Sized> GraphBuilder<'a, F> {
    /// Create a builder searching below `root`.
    pub fn new(fs: &'a F, root: &Path) -> Self {
        Self {
            fs,
            root: clean(root),
            graph: Graph::new(),
            state: TraversalState::default(),
        }
    }

    /// Run the build and return the finished graph.
    pub fn build(mut self) -> Result<Graph> {
        let candidates = self.discover()?;
        debug!(
            "Found {} kustomization directories under {}",
            candidates.len(),
            self.root.display()
        );

        for dir in candidates {
            if self.state.child_nodes.contains_key(&dir) {
                debug!("Skipping {}: already attached to an overlay", dir.display());
                continue;
            }

            let node = self
                .expand_dir(&dir)
                .map_err(|e| Error::Composition {
                    dir: dir.clone(),
                    source: Box::new(e),
                })?;

            if !self.state.child_nodes.contains_key(&dir) {
                self.state.parent_nodes.insert(dir, node);
            }
        }

        let top_level: Vec<NodeId> = self.state.parent_nodes.values().copied().collect();
        let root = self.graph.root();
        self.graph.node_mut(root).children = top_level;

        let mut unbound: Vec<(u64, NodeId)> = self
            .state
            .pending_patches
            .values()
            .flat_map(|patches| patches.iter().map(|(&seq, &node)| (seq, node)))
            .collect();
        unbound.sort();
        for (_, node) in &unbound {
            warn!(
                "Patch {} does not match any resource",
                self.graph.node(*node).label
            );
        }
        self.graph
            .set_unbound_patches(unbound.into_iter().map(|(_, node)| node).collect());

        Ok(self.graph)
    }

    /// Collect every directory below the root that holds a kustomization
    /// file, in sorted order.
    fn discover(&self) -> Result<BTreeSet<PathBuf>> {
        let mut candidates = BTreeSet::new();
        let root = &self.root;
        self.fs.walk(root, &mut |path, is_dir| {
            if !is_dir && path != root.as_path() && is_composition_file(path) {
                if let Some(dir) = path.parent() {
                    candidates.insert(clean(dir));
                }
            }
            Ok(())
        })?;
        Ok(candidates)
    }

    /// Locate the kustomization file in `dir` and expand it.
    fn expand_dir(&mut self, dir: &Path) -> Result<NodeId> {
        let (_, manifest) = locate_composition(self.fs, dir)?;
        self.expand(dir, &manifest)
    }

    /// Expand one composition: resolve its resources, then bind its patches.
    fn expand(&mut self, dir: &Path, manifest: &CompositionManifest) -> Result<NodeId> {
        debug!("Expanding {}", dir.display());
        self.state.in_progress.push(dir.to_path_buf());
        let result = self.expand_in_progress(dir, manifest);
        self.state.in_progress.pop();
        result
    }

    fn expand_in_progress(&mut self, dir: &Path, manifest: &CompositionManifest) -> Result<NodeId> {
        let mut children = Vec::new();
        for reference in manifest.resource_refs() {
            children.push(self.resolve_reference(dir, reference)?);
        }

        let patches = self.bind_patches(dir, manifest)?;
        let label = self.label_for(dir)?;

        let mut node = GraphNode::new(
            manifest.api_version.as_str(),
            manifest.kind.as_str(),
            label,
            NodeRole::Composition,
        );
        node.children = children;
        node.patches = patches;
        Ok(self.graph.add_node(node))
    }

    fn resolve_reference(&mut self, dir: &Path, reference: &str) -> Result<NodeId> {
        let path = join_clean(dir, reference);

        let exists = match self.fs.exists(&path) {
            Ok(exists) => exists,
            Err(e) => {
                warn!("Cannot check {}: {}", path.display(), e);
                false
            }
        };
        if !exists {
            return Ok(self.add_unknown(dir, reference));
        }

        match self.fs.is_dir(&path) {
            Err(e) => {
                warn!("Cannot inspect {}: {}", path.display(), e);
                Ok(self.add_unknown(dir, reference))
            }
            Ok(true) => self.resolve_directory(path),
            Ok(false) if is_composition_file(&path) => Err(Error::InvalidReference {
                path,
                reference: reference.to_string(),
            }),
            Ok(false) => self.add_resource(&path, reference),
        }
    }

    fn resolve_directory(&mut self, path: PathBuf) -> Result<NodeId> {
        if let Some(start) = self.state.in_progress.iter().position(|dir| *dir == path) {
            let mut cycle: Vec<String> = self.state.in_progress[start..]
                .iter()
                .map(|dir| self.display_label(dir))
                .collect();
            cycle.push(self.display_label(&path));
            return Err(Error::CycleDetected {
                cycle: cycle.join(" -> "),
            });
        }

        if let Some(node) = self.state.parent_nodes.remove(&path) {
            debug!("Attaching {} under an overlay", path.display());
            self.state.child_nodes.insert(path, node);
            return Ok(node);
        }

        if let Some(&node) = self.state.child_nodes.get(&path) {
            debug!("Reusing {}", path.display());
            return Ok(node);
        }

        let node = self
            .expand_dir(&path)
            .map_err(|e| Error::Composition {
                dir: path.clone(),
                source: Box::new(e),
            })?;
        self.state.child_nodes.insert(path, node);
        Ok(node)
    }

    fn add_resource(&mut self, path: &Path, reference: &str) -> Result<NodeId> {
        let content = self.fs.read_file(path)?;
        let manifest = parse_resource(&content, path)?;
        let name = manifest.logical_name().to_string();

        let mut node = GraphNode::new(
            manifest.api_version.as_str(),
            manifest.kind.as_str(),
            reference,
            NodeRole::Resource,
        );
        if let Some(&previous) = self.state.resource_nodes.get(&name) {
            node.patches = self.graph.node(previous).patches.clone();
        }
        if let Some(pending) = self.state.pending_patches.remove(&name) {
            debug!(
                "Binding {} deferred patches to {}",
                pending.len(),
                path.display()
            );
            node.patches.extend(pending);
        }

        let id = self.graph.add_node(node);
        self.state.resource_nodes.insert(name, id);
        Ok(id)
    }

    fn add_unknown(&mut self, dir: &Path, reference: &str) -> NodeId {
        warn!(
            "Unknown resource '{}' referenced from {}",
            reference,
            dir.display()
        );
        self.graph.add_node(GraphNode::new(
            "",
            "",
            UNKNOWN_RESOURCE_LABEL,
            NodeRole::Unknown,
        ))
    }

    /// Path of `path` relative to the search root, as a label.
    pub(super) fn label_for(&self, path: &Path) -> Result<String> {
        Ok(to_label(relative_to(&self.root, path)?))
    }

    fn display_label(&self, path: &Path) -> String {
        self.label_for(path).unwrap_or_else(|_| to_label(path))
    }
}
