//! Path manipulation utilities for graphmize
//!
//! Manifests reference each other with relative paths such as `../base`. All
//! joining here is lexical: `..` is folded against the preceding component
//! without consulting the filesystem, so the same directory always produces
//! the same key no matter which overlay reached it.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding normal component.
///
/// Leading `..` components of a relative path are kept; `..` directly below
/// the filesystem root is discarded. An input that cleans away entirely
/// yields an empty path.
pub fn clean<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}

/// Join `reference` onto `dir` and clean the result.
pub fn join_clean<P: AsRef<Path>, Q: AsRef<Path>>(dir: P, reference: Q) -> PathBuf {
    clean(dir.as_ref().join(reference))
}

/// Express `target` relative to `base`, inserting `..` components where
/// `target` lies outside of `base`.
///
/// Fails when one path is absolute and the other is not, or when `base`
/// climbs above its own starting point so the way back cannot be known.
pub fn relative_to<P: AsRef<Path>, Q: AsRef<Path>>(base: P, target: Q) -> Result<PathBuf> {
    let base = clean(base);
    let target = clean(target);

    if base.is_absolute() != target.is_absolute() {
        return Err(Error::PathResolution {
            message: format!(
                "cannot make {} relative to {}",
                target.display(),
                base.display()
            ),
        });
    }

    let base_parts: Vec<Component<'_>> = base.components().collect();
    let target_parts: Vec<Component<'_>> = target.components().collect();
    let common = base_parts
        .iter()
        .zip(&target_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for part in &base_parts[common..] {
        if *part == Component::ParentDir {
            return Err(Error::PathResolution {
                message: format!(
                    "cannot make {} relative to {}",
                    target.display(),
                    base.display()
                ),
            });
        }
        relative.push("..");
    }
    for part in &target_parts[common..] {
        relative.push(part);
    }

    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    Ok(relative)
}

/// Render a path as a display label with `/` separators on every platform.
pub fn to_label<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    let mut label = String::new();
    for component in path.components() {
        match component {
            Component::RootDir => label.push('/'),
            Component::Prefix(prefix) => label.push_str(&prefix.as_os_str().to_string_lossy()),
            other => {
                if !label.is_empty() && !label.ends_with('/') {
                    label.push('/');
                }
                label.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    label
}

/// Resolve the directory to search from the user's `--source` value.
///
/// An empty source means the current directory, an absolute source is used as
/// is, and a relative source is joined onto the current directory.
pub fn resolve_source<P: AsRef<Path>>(source: &str, current_dir: P) -> PathBuf {
    let current_dir = current_dir.as_ref();
    if source.is_empty() {
        current_dir.to_path_buf()
    } else if Path::new(source).is_absolute() {
        PathBuf::from(source)
    } else {
        join_clean(current_dir, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean() {
        assert_eq!(clean("app/sub/../base"), PathBuf::from("app/base"));
        assert_eq!(clean("./app/./sub"), PathBuf::from("app/sub"));
        assert_eq!(clean("../app"), PathBuf::from("../app"));
        assert_eq!(clean("/../app"), PathBuf::from("/app"));
        assert_eq!(clean("app/.."), PathBuf::new());
    }

    #[test]
    fn test_join_clean() {
        assert_eq!(join_clean("app/sub", "../base"), PathBuf::from("app/base"));
        assert_eq!(join_clean("", "sub"), PathBuf::from("sub"));
        assert_eq!(
            join_clean("/repo/app/staging", "../../shared/base"),
            PathBuf::from("/repo/shared/base")
        );
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(
            relative_to("/repo", "/repo/app/sub").unwrap(),
            PathBuf::from("app/sub")
        );
        assert_eq!(
            relative_to("", "app/sub/patch.yaml").unwrap(),
            PathBuf::from("app/sub/patch.yaml")
        );
        assert_eq!(
            relative_to("/repo/app", "/repo/shared").unwrap(),
            PathBuf::from("../shared")
        );
        assert_eq!(relative_to("/repo", "/repo").unwrap(), PathBuf::from("."));
    }

    #[test]
    fn test_relative_to_mixed_roots_fails() {
        let result = relative_to("/repo", "app");
        assert!(matches!(result, Err(Error::PathResolution { .. })));

        let result = relative_to("../outside", "app");
        assert!(matches!(result, Err(Error::PathResolution { .. })));
    }

    #[test]
    fn test_to_label() {
        assert_eq!(to_label("app/sub"), "app/sub");
        assert_eq!(to_label("/repo/app"), "/repo/app");
        assert_eq!(to_label(""), "");
    }

    #[test]
    fn test_resolve_source() {
        assert_eq!(resolve_source("", "/work"), PathBuf::from("/work"));
        assert_eq!(resolve_source("/abs/dir", "/work"), PathBuf::from("/abs/dir"));
        assert_eq!(
            resolve_source("deploy/../k8s", "/work"),
            PathBuf::from("/work/k8s")
        );
    }
}
