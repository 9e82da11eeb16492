//! # Manifest Records and Parsing
//!
//! This module defines the two document shapes the graph builder consumes:
//!
//! - **`CompositionManifest`**: a `kustomization.yaml` file listing resource
//!   references (files or directories) and patch references.
//! - **`ResourceManifest`**: any other YAML document. Only its `apiVersion`,
//!   `kind` and `metadata.name` matter here; the name is the logical name used
//!   to match patches to the resource they override.
//!
//! Both records ignore fields they do not know about, since real manifests
//! carry far more than the graph needs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File names recognized as a composition file, in lookup order.
///
/// They are aliases for the same document, so a directory may contain at most
/// one of them.
pub const COMPOSITION_FILE_NAMES: [&str; 3] =
    ["kustomization.yaml", "kustomization.yml", "Kustomization"];

/// Returns true when the final component of `path` is a recognized
/// composition file name.
pub fn is_composition_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| COMPOSITION_FILE_NAMES.contains(&name))
}

/// The `target` selector of a `patches` entry.
///
/// Only `kind` and `name` are read; other selector fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchTarget {
    pub kind: String,
    pub name: String,
}

/// An entry of the `patches` list: either a bare path or a mapping that may
/// carry a `path` (inline patches have none) and a `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatchEntry {
    Path(String),
    Mapping {
        #[serde(default)]
        path: Option<String>,
        #[serde(default)]
        target: Option<PatchTarget>,
    },
}

impl PatchEntry {
    /// The patch file this entry points at, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            PatchEntry::Path(path) => Some(path),
            PatchEntry::Mapping { path, .. } => path.as_deref(),
        }
    }

    fn patch_ref(&self) -> Option<PatchRef<'_>> {
        let target = match self {
            PatchEntry::Path(_) => None,
            PatchEntry::Mapping { target, .. } => target.as_ref(),
        };
        self.path().map(|path| PatchRef { path, target })
    }
}

/// A patch file reference together with the target selector of its entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchRef<'a> {
    pub path: &'a str,
    pub target: Option<&'a PatchTarget>,
}

impl<'a> PatchRef<'a> {
    /// The resource name the entry selects, when it names one.
    pub fn target_name(&self) -> Option<&'a str> {
        self.target
            .map(|target| target.name.as_str())
            .filter(|name| !name.is_empty())
    }

    /// The resource kind the entry selects, or an empty string.
    pub fn target_kind(&self) -> &'a str {
        self.target.map_or("", |target| target.kind.as_str())
    }
}

/// Represents a kustomization file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompositionManifest {
    pub api_version: String,
    pub kind: String,
    /// Relative paths to resource files or composition directories
    pub resources: Vec<String>,
    /// Legacy list of base directories, resolved after `resources`
    pub bases: Vec<String>,
    /// Relative paths to strategic-merge patch documents
    pub patches_strategic_merge: Vec<String>,
    pub patches: Vec<PatchEntry>,
}

impl CompositionManifest {
    /// Every resource reference, in resolution order.
    pub fn resource_refs(&self) -> impl Iterator<Item = &str> {
        self.resources
            .iter()
            .chain(self.bases.iter())
            .map(String::as_str)
    }

    /// Every patch file reference, in binding order.
    pub fn patch_refs(&self) -> impl Iterator<Item = PatchRef<'_>> {
        self.patches_strategic_merge
            .iter()
            .map(|path| PatchRef { path, target: None })
            .chain(self.patches.iter().filter_map(PatchEntry::patch_ref))
    }
}

/// The `metadata` block of a resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub name: String,
}

/// Represents any YAML file except a kustomization file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceManifest {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
}

impl ResourceManifest {
    /// The name used to bind patches to this resource. May be empty.
    pub fn logical_name(&self) -> &str {
        &self.metadata.name
    }
}

fn is_blank(content: &[u8]) -> bool {
    content.iter().all(u8::is_ascii_whitespace)
}

/// Parse a composition manifest read from `path`.
///
/// An empty or comment-only document yields an empty manifest.
pub fn parse_composition(content: &[u8], path: &Path) -> Result<CompositionManifest> {
    if is_blank(content) {
        return Ok(CompositionManifest::default());
    }
    serde_yaml::from_slice::<Option<CompositionManifest>>(content)
        .map(Option::unwrap_or_default)
        .map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Parse a resource manifest read from `path`.
///
/// Files holding several YAML documents contribute their first non-empty
/// document.
pub fn parse_resource(content: &[u8], path: &Path) -> Result<ResourceManifest> {
    if is_blank(content) {
        return Ok(ResourceManifest::default());
    }
    for document in serde_yaml::Deserializer::from_slice(content) {
        let manifest =
            Option::<ResourceManifest>::deserialize(document).map_err(|source| Error::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if let Some(manifest) = manifest {
            return Ok(manifest);
        }
    }
    Ok(ResourceManifest::default())
}

/// Parse a patch document read from `path`.
///
/// Patch files may hold a JSON6902 operation list instead of a resource.
/// Returns `None` when the first non-empty document is not a mapping. Syntax
/// errors are still reported.
pub fn parse_patch(content: &[u8], path: &Path) -> Result<Option<ResourceManifest>> {
    let parse_error = |source| Error::Parse {
        path: path.to_path_buf(),
        source,
    };

    if is_blank(content) {
        return Ok(Some(ResourceManifest::default()));
    }
    for document in serde_yaml::Deserializer::from_slice(content) {
        match serde_yaml::Value::deserialize(document).map_err(parse_error)? {
            serde_yaml::Value::Null => continue,
            value @ serde_yaml::Value::Mapping(_) => {
                return serde_yaml::from_value(value).map(Some).map_err(parse_error);
            }
            _ => return Ok(None),
        }
    }
    Ok(Some(ResourceManifest::default()))
}
