//! Composition file discovery
//!
//! A directory takes part in the graph when it holds exactly one file named
//! after one of [`COMPOSITION_FILE_NAMES`]. Finding none is `NotFound`; finding
//! several is `Ambiguous`, since the names are aliases for the same document.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::filesystem::FileSystem;
use crate::manifest::{parse_composition, CompositionManifest, COMPOSITION_FILE_NAMES};

/// Attempts to read the single composition file in `dir`.
///
/// Returns the path of the file that was found together with its parsed
/// contents.
pub fn locate_composition<F: FileSystem + ?Sized>(
    fs: &F,
    dir: &Path,
) -> Result<(PathBuf, CompositionManifest)> {
    let mut found = Vec::new();
    for name in COMPOSITION_FILE_NAMES {
        let candidate = dir.join(name);
        if fs.exists(&candidate)? && !fs.is_dir(&candidate)? {
            found.push(candidate);
        }
    }

    let path = match found.len() {
        0 => {
            return Err(Error::NotFound {
                dir: dir.to_path_buf(),
            })
        }
        1 => found.remove(0),
        _ => {
            return Err(Error::Ambiguous {
                dir: dir.to_path_buf(),
                found: found
                    .iter()
                    .filter_map(|path| path.file_name())
                    .map(|name| name.to_string_lossy().into_owned())
                    .collect(),
            })
        }
    };

    let content = fs.read_file(&path)?;
    let manifest = parse_composition(&content, &path)?;
    Ok((path, manifest))
}
