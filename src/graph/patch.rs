//! Patch binding
//!
//! Each patch document listed by a kustomization is matched to the resource
//! carrying the same logical name: the `target.name` of its `patches` entry
//! when there is one, else the patch's own `metadata.name`. Patch files that
//! hold an operation list rather than a resource bind only through a target
//! and are skipped with a warning otherwise. Every patch receives the
//! next id of a counter shared by the whole build, so ids are unique and
//! increase in the order patches are encountered.
//!
//! A patch whose resource has not been built yet is deferred: it is kept under
//! its logical name and adopted by the next resource built with that name.
//! Patches still deferred when the build ends are reported by
//! [`Graph::unbound_patches`](super::Graph::unbound_patches).

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, warn};

use super::builder::GraphBuilder;
use super::{GraphNode, NodeId, NodeRole};
use crate::error::Result;
use crate::filesystem::FileSystem;
use crate::manifest::{parse_patch, CompositionManifest};
use crate::path::join_clean;

impl<F: FileSystem + ?Sized> GraphBuilder<'_, F> {
    /// Bind the patches declared by the kustomization in `dir`.
    ///
    /// Returns the patches keyed by sequence id, for the composition node
    /// itself.
    pub(super) fn bind_patches(
        &mut self,
        dir: &Path,
        manifest: &CompositionManifest,
    ) -> Result<BTreeMap<u64, NodeId>> {
        let mut patches = BTreeMap::new();

        for reference in manifest.patch_refs() {
            let path = join_clean(dir, reference.path);
            let content = self.fs.read_file(&path)?;
            let document = parse_patch(&content, &path)?;

            let name = match (reference.target_name(), &document) {
                (Some(target), _) => target,
                (None, Some(patch)) => patch.logical_name(),
                (None, None) => {
                    warn!(
                        "Skipping patch {}: it is not a resource document and its entry names no target",
                        path.display()
                    );
                    continue;
                }
            };
            let (api_version, kind) = match &document {
                Some(patch) => (patch.api_version.as_str(), patch.kind.as_str()),
                None => ("", reference.target_kind()),
            };
            let label = self.label_for(&path)?;

            let id = self.next_patch_id();
            let node = self
                .graph
                .add_node(GraphNode::new(api_version, kind, label, NodeRole::Patch));

            match self.state.resource_nodes.get(name) {
                Some(&resource) => {
                    self.graph.node_mut(resource).patches.insert(id, node);
                }
                None => {
                    debug!(
                        "Deferring patch {} until a resource named '{}' is built",
                        path.display(),
                        name
                    );
                    self.state
                        .pending_patches
                        .entry(name.to_string())
                        .or_default()
                        .insert(id, node);
                }
            }

            patches.insert(id, node);
        }

        Ok(patches)
    }

    fn next_patch_id(&mut self) -> u64 {
        let id = self.state.patch_sequence;
        self.state.patch_sequence += 1;
        id
    }
}
