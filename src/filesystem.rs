//! Filesystem capability used by the graph builder
//!
//! The builder only ever needs four operations: existence checks, directory
//! checks, reading a whole file and walking a tree. They are captured by the
//! [`FileSystem`] trait so that the same build logic runs against the real
//! disk ([`OsFileSystem`]) and against an in-memory tree ([`MemoryFS`]) in
//! tests and benchmarks.
//!
//! Both implementations walk in sorted path order so that graph output is
//! deterministic.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::path::clean;

/// Trait for filesystem access - allows an in-memory tree in tests
pub trait FileSystem {
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> Result<bool>;

    /// Whether `path` is a directory.
    fn is_dir(&self, path: &Path) -> Result<bool>;

    /// Read the complete contents of the file at `path`.
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    /// Visit every entry under `root`, including `root` itself, in sorted
    /// pre-order. The visitor receives the entry path and whether it is a
    /// directory; an error from the visitor aborts the walk.
    fn walk(&self, root: &Path, visit: &mut dyn FnMut(&Path, bool) -> Result<()>) -> Result<()>;
}

/// The default implementation of `FileSystem`, backed by the host filesystem.
///
/// An empty path stands for the current directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

fn os_path(path: &Path) -> &Path {
    if path.as_os_str().is_empty() {
        Path::new(".")
    } else {
        path
    }
}

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> Result<bool> {
        os_path(path).try_exists().map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    fn is_dir(&self, path: &Path) -> Result<bool> {
        std::fs::metadata(os_path(path))
            .map(|metadata| metadata.is_dir())
            .map_err(|source| Error::Read {
                path: path.to_path_buf(),
                source,
            })
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    fn walk(&self, root: &Path, visit: &mut dyn FnMut(&Path, bool) -> Result<()>) -> Result<()> {
        for entry in WalkDir::new(os_path(root)).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Filesystem {
                message: format!("Failed to walk {}: {}", root.display(), e),
            })?;
            visit(entry.path(), entry.file_type().is_dir())?;
        }
        Ok(())
    }
}

/// Represents a file with content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// File content as bytes
    pub content: Vec<u8>,
}

impl File {
    /// Create a new file with content
    pub fn new(content: Vec<u8>) -> Self {
        Self { content }
    }

    /// Create a new file from string content
    pub fn from_string(content: &str) -> Self {
        Self::new(content.as_bytes().to_vec())
    }

    /// Get file size in bytes
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// In-memory filesystem for tests and benchmarks
///
/// Paths are cleaned on insertion. Every ancestor of a file is an implicit
/// directory, and the empty path is the root of the tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryFS {
    /// Files stored as path -> content mapping
    files: BTreeMap<PathBuf, File>,
    /// Directories created explicitly, possibly empty
    directories: BTreeSet<PathBuf>,
}

impl MemoryFS {
    /// Create a new empty filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or update a file
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P, file: File) -> Result<()> {
        let path = clean(path);
        if path.as_os_str().is_empty() || self.is_directory(&path) {
            return Err(Error::Filesystem {
                message: format!("Cannot write a file over directory {}", path.display()),
            });
        }
        if path.ancestors().skip(1).any(|ancestor| self.files.contains_key(ancestor)) {
            return Err(Error::Filesystem {
                message: format!("A parent of {} is a file", path.display()),
            });
        }
        self.files.insert(path, file);
        Ok(())
    }

    /// Add a file with string content
    pub fn add_file_string<P: AsRef<Path>>(&mut self, path: P, content: &str) -> Result<()> {
        self.add_file(path, File::from_string(content))
    }

    /// Create a directory (and, implicitly, all of its ancestors)
    pub fn add_dir<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = clean(path);
        if path.ancestors().any(|ancestor| self.files.contains_key(ancestor)) {
            return Err(Error::Filesystem {
                message: format!("Cannot create directory {} below a file", path.display()),
            });
        }
        self.directories.insert(path);
        Ok(())
    }

    /// Get a file by path
    pub fn get_file<P: AsRef<Path>>(&self, path: P) -> Option<&File> {
        self.files.get(&clean(path))
    }

    /// Get the number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if filesystem is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.as_os_str().is_empty()
            || self
                .directories
                .iter()
                .any(|dir| dir.starts_with(path))
            || self
                .files
                .keys()
                .any(|file| file != path && file.starts_with(path))
    }

    /// All directories, explicit and implied, in sorted order.
    fn all_directories(&self) -> BTreeSet<PathBuf> {
        let mut all = BTreeSet::new();
        all.insert(PathBuf::new());
        for dir in &self.directories {
            for ancestor in dir.ancestors() {
                all.insert(ancestor.to_path_buf());
            }
        }
        for file in self.files.keys() {
            for ancestor in file.ancestors().skip(1) {
                all.insert(ancestor.to_path_buf());
            }
        }
        all
    }
}

impl FileSystem for MemoryFS {
    fn exists(&self, path: &Path) -> Result<bool> {
        let path = clean(path);
        Ok(self.files.contains_key(&path) || self.is_directory(&path))
    }

    fn is_dir(&self, path: &Path) -> Result<bool> {
        Ok(self.is_directory(&clean(path)))
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let cleaned = clean(path);
        match self.files.get(&cleaned) {
            Some(file) => Ok(file.content.clone()),
            None => Err(Error::Read {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no file at {}", cleaned.display()),
                ),
            }),
        }
    }

    fn walk(&self, root: &Path, visit: &mut dyn FnMut(&Path, bool) -> Result<()>) -> Result<()> {
        let root = clean(root);
        if !self.is_directory(&root) && !self.files.contains_key(&root) {
            return Err(Error::Filesystem {
                message: format!("Failed to walk {}: no such directory", root.display()),
            });
        }

        let mut entries: BTreeMap<PathBuf, bool> = self
            .all_directories()
            .into_iter()
            .filter(|dir| dir.starts_with(&root))
            .map(|dir| (dir, true))
            .collect();
        for file in self.files.keys().filter(|file| file.starts_with(&root)) {
            entries.insert(file.clone(), false);
        }

        for (path, is_dir) in &entries {
            visit(path, *is_dir)?;
        }
        Ok(())
    }
}
