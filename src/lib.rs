//! # Graphmize Library
//!
//! Builds the dependency graph of a tree of kustomize overlays and bases and
//! prints it as an indented tree. The library is used by the `graphmize`
//! command-line tool but works on any [`filesystem::FileSystem`], including
//! the in-memory [`filesystem::MemoryFS`].
//!
//! ## Quick Example
//!
//! ```
//! use graphmize::filesystem::MemoryFS;
//! use graphmize::graph::build_all;
//! use graphmize::render::{render_to_string, RenderOptions};
//! use std::path::Path;
//!
//! let mut fs = MemoryFS::new();
//! fs.add_file_string("app/base/kustomization.yaml", "resources:\n- web.yaml\n").unwrap();
//! fs.add_file_string("app/base/web.yaml", "kind: Deployment\nmetadata:\n  name: web\n").unwrap();
//! fs.add_file_string("app/prod/kustomization.yaml", "resources:\n- ../base\n").unwrap();
//!
//! let graph = build_all(&fs, Path::new("app")).unwrap();
//! let tree = render_to_string(&graph, &RenderOptions::default()).unwrap();
//! assert_eq!(tree, "/\n└── prod\n    └── base\n        └── web.yaml\n");
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifests (`manifest`)**: the composition file (`kustomization.yaml`)
//!   and the resource documents it references.
//! - **Locator (`locator`)**: finds the single composition file of a directory.
//! - **Graph (`graph`)**: an arena of nodes built depth-first from every
//!   composition directory under a search root. Bases shared by several
//!   overlays are built once. Patches are bound to resources by
//!   `metadata.name`.
//! - **Rendering (`render`)**: the box-drawing tree printed by `graphmize tree`.
//!   The graph also serializes to JSON and YAML for `graphmize export`.
//! - **Filesystem (`filesystem`)**: the four operations a build needs, backed
//!   by the real disk or by memory.
//!
//! Directories that nothing references become the top-level entries below the
//! synthetic root. References to missing paths become "Unknown Resource"
//! placeholders instead of failing the build.

pub mod defaults;
pub mod error;
pub mod filesystem;
pub mod graph;
pub mod locator;
pub mod manifest;
pub mod output;
pub mod path;
pub mod render;
pub mod settings;
pub mod suggestions;

#[cfg(test)]
mod path_proptest;
