//! # Composition Graph
//!
//! The graph produced by a build. Nodes live in an arena owned by [`Graph`]
//! and refer to each other by [`NodeId`]. A base directory referenced by
//! several overlays is built once, and its id appears in the `children` of
//! every overlay that references it, so the structure is a DAG even though it
//! is rendered and serialized as a tree.
//!
//! ## Node roles
//!
//! - **Root**: the synthetic top node; its children are the composition
//!   directories no other composition references.
//! - **Composition**: a directory holding a kustomization file. Its `patches`
//!   are the patches declared in that file.
//! - **Resource**: a leaf manifest. Its `patches` are the patches bound to it
//!   by logical name.
//! - **Patch**: a patch document, reachable only through a `patches` map.
//! - **Unknown**: a placeholder for a reference that does not exist.

use std::collections::BTreeMap;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

mod builder;
mod patch;

pub use builder::{build_all, GraphBuilder};

/// Label of the synthetic root node.
pub const ROOT_LABEL: &str = "/";

/// Label given to placeholder nodes for missing references.
pub const UNKNOWN_RESOURCE_LABEL: &str = "Unknown Resource";

/// Identifier of a node inside its [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// What a node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Root,
    Composition,
    Resource,
    Patch,
    Unknown,
}

/// One node of the composition graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub api_version: String,
    pub kind: String,
    /// Path relative to the search root, or the reference string for leaves
    pub label: String,
    pub role: NodeRole,
    pub children: Vec<NodeId>,
    /// Patches keyed by their build-wide sequence id
    pub patches: BTreeMap<u64, NodeId>,
}

impl GraphNode {
    pub(crate) fn new(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        label: impl Into<String>,
        role: NodeRole,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            label: label.into(),
            role,
            children: Vec::new(),
            patches: BTreeMap::new(),
        }
    }
}

/// The result of a build: an arena of nodes plus the synthetic root
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    root: NodeId,
    unbound_patches: Vec<NodeId>,
}

impl Graph {
    pub(crate) fn new() -> Self {
        let root = GraphNode::new("root", "root", ROOT_LABEL, NodeRole::Root);
        Self {
            nodes: vec![root],
            root: NodeId(0),
            unbound_patches: Vec::new(),
        }
    }

    pub(crate) fn add_node(&mut self, node: GraphNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut GraphNode {
        &mut self.nodes[id.0]
    }

    pub(crate) fn set_unbound_patches(&mut self, patches: Vec<NodeId>) {
        self.unbound_patches = patches;
    }

    /// The synthetic root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node. Panics if `id` belongs to another graph.
    pub fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id.0]
    }

    /// Number of distinct nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every node with its id, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &GraphNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// The first node, in creation order, carrying `label`.
    pub fn find_by_label(&self, label: &str) -> Option<NodeId> {
        self.nodes()
            .find(|(_, node)| node.label == label)
            .map(|(id, _)| id)
    }

    /// Patches whose logical name never matched a resource during the build.
    pub fn unbound_patches(&self) -> &[NodeId] {
        &self.unbound_patches
    }

    /// Convert the graph into an owned tree, expanding shared nodes under
    /// every parent that references them.
    pub fn to_document(&self) -> NodeDocument {
        self.document_for(self.root)
    }

    fn document_for(&self, id: NodeId) -> NodeDocument {
        let node = self.node(id);
        NodeDocument {
            api_version: node.api_version.clone(),
            kind: node.kind.clone(),
            label: node.label.clone(),
            children: node
                .children
                .iter()
                .map(|&child| self.document_for(child))
                .collect(),
            patches: node
                .patches
                .iter()
                .map(|(&seq, &patch)| (seq, self.document_for(patch)))
                .collect(),
        }
    }

    /// Serialize the graph as JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let document = self.to_document();
        let result = if pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        };
        result.map_err(|e| Error::Serialization {
            message: e.to_string(),
        })
    }

    /// Serialize the graph as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.to_document()).map_err(|e| Error::Serialization {
            message: e.to_string(),
        })
    }
}

impl Index<NodeId> for Graph {
    type Output = GraphNode;

    fn index(&self, id: NodeId) -> &GraphNode {
        self.node(id)
    }
}

/// Serializable form of a node and everything below it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDocument {
    pub api_version: String,
    pub kind: String,
    pub label: String,
    pub children: Vec<NodeDocument>,
    pub patches: BTreeMap<u64, NodeDocument>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> Graph {
        let mut graph = Graph::new();
        let base_resource = graph.add_node(GraphNode::new(
            "apps/v1",
            "Deployment",
            "a.yaml",
            NodeRole::Resource,
        ));
        let mut base = GraphNode::new(
            "kustomize.config.k8s.io/v1beta1",
            "Kustomization",
            "app/base",
            NodeRole::Composition,
        );
        base.children.push(base_resource);
        let base = graph.add_node(base);

        let patch = graph.add_node(GraphNode::new(
            "apps/v1",
            "Deployment",
            "app/staging/patch.yaml",
            NodeRole::Patch,
        ));
        graph.node_mut(base_resource).patches.insert(0, patch);

        for label in ["app/production", "app/staging"] {
            let mut overlay = GraphNode::new("", "", label, NodeRole::Composition);
            overlay.children.push(base);
            let overlay = graph.add_node(overlay);
            let root = graph.root();
            graph.node_mut(root).children.push(overlay);
        }
        graph
    }

    #[test]
    fn test_new_graph_has_only_root() {
        let graph = Graph::new();
        assert_eq!(graph.node_count(), 1);
        let root = &graph[graph.root()];
        assert_eq!(root.label, ROOT_LABEL);
        assert_eq!(root.role, NodeRole::Root);
        assert!(root.children.is_empty());
        assert!(root.patches.is_empty());
    }

    #[test]
    fn test_shared_node_is_stored_once() {
        let graph = sample_graph();
        let root = &graph[graph.root()];
        let first = graph[root.children[0]].children[0];
        let second = graph[root.children[1]].children[0];
        assert_eq!(first, second);
        assert_eq!(graph.node_count(), 6);
    }

    #[test]
    fn test_document_expands_shared_nodes() {
        let document = sample_graph().to_document();
        assert_eq!(document.children.len(), 2);
        for overlay in &document.children {
            assert_eq!(overlay.children[0].label, "app/base");
            let resource = &overlay.children[0].children[0];
            assert_eq!(resource.patches[&0].label, "app/staging/patch.yaml");
        }
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let graph = sample_graph();
        let json = graph.to_json(false).unwrap();
        assert!(json.contains("\"apiVersion\":\"root\""));
        assert!(json.contains("\"patches\":{\"0\":"));

        let parsed: NodeDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, graph.to_document());
    }

    #[test]
    fn test_yaml_round_trip_is_lossless() {
        let graph = sample_graph();
        let yaml = graph.to_yaml().unwrap();
        let parsed: NodeDocument = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, graph.to_document());
    }

    #[test]
    fn test_find_by_label() {
        let graph = sample_graph();
        let base = graph.find_by_label("app/base").unwrap();
        assert_eq!(graph[base].kind, "Kustomization");
        assert!(graph.find_by_label("app/missing").is_none());
    }
}
