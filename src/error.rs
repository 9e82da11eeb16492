//! # Error Handling
//!
//! This module defines the centralized error type for `graphmize`. It uses the
//! `thiserror` library to create a single `Error` enum that covers every way a
//! graph build can fail, with enough context (the directory or file involved)
//! to point the user at the offending manifest.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Discovery failures (`NotFound`, `Ambiguous`),
//!   I/O and parse failures (`Read`, `Parse`), structural failures
//!   (`InvalidReference`, `CycleDetected`) and path computation failures
//!   (`PathResolution`) are all fatal to the build that raised them.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! A missing resource reference is deliberately *not* represented here: the
//! graph builder degrades it to an "Unknown Resource" placeholder node instead
//! of failing.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for graphmize operations
#[derive(Error, Debug)]
pub enum Error {
    /// None of the recognized composition file names exist in a directory.
    #[error("Missing kustomization file in directory {}", dir.display())]
    NotFound { dir: PathBuf },

    /// More than one recognized composition file name exists in a directory.
    #[error("Too many kustomization files in directory {}: {}", dir.display(), found.join(", "))]
    Ambiguous { dir: PathBuf, found: Vec<String> },

    /// A file could not be read, or its existence could not be determined.
    #[error("Could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A manifest document is not valid YAML for the expected record shape.
    #[error("Could not parse YAML file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A composition file was listed directly as a resource instead of via
    /// its containing directory.
    #[error("Invalid resource reference '{reference}' at {}: kustomization files must be referenced by their directory", path.display())]
    InvalidReference { path: PathBuf, reference: String },

    /// A path could not be expressed relative to the search root.
    #[error("Path resolution error: {message}")]
    PathResolution { message: String },

    /// A composition directory references itself, directly or transitively.
    #[error("Cycle detected in kustomization references: {cycle}")]
    CycleDetected { cycle: String },

    /// An error occurred while walking or manipulating a filesystem.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An error occurred while serializing the graph.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// A structural failure while building one top-level composition root.
    #[error("Cannot build graph for {}: {source}", dir.display())]
    Composition {
        dir: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Returns the innermost error, looking through `Composition` wrappers.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Composition { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
