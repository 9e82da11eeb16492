//! Shared test utilities for integration and E2E tests.
//!
//! Add `mod common;` to a test file, then:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = TestFixture::new()
//!     .with_kustomization("app/base", &["a.yaml"])
//!     .with_resource("app/base/a.yaml", "Deployment", "web");
//! fixture.command().arg("tree").assert().success();
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::layouts;
    pub use super::TestFixture;
}

/// Environment variables that would leak the developer's setup into tests
const ISOLATED_ENV: [&str; 7] = [
    "GRAPHMIZE_SOURCE",
    "GRAPHMIZE_CONFIG",
    "RUST_LOG",
    "NO_COLOR",
    "CLICOLOR",
    "CLICOLOR_FORCE",
    "TERM",
];

/// Canned kustomize layouts used by several test files.
#[allow(dead_code)]
pub mod layouts {
    use super::TestFixture;

    /// `app/base` with `a.yaml`, referenced by `app/staging` and
    /// `app/production`.
    pub fn diamond() -> TestFixture {
        TestFixture::new()
            .with_kustomization("app/base", &["a.yaml"])
            .with_resource("app/base/a.yaml", "Deployment", "test-deployment")
            .with_kustomization("app/staging", &["../base"])
            .with_kustomization("app/production", &["../base"])
    }

    /// `app/sub` references `app/base` and patches its resource.
    pub fn patched_overlay() -> TestFixture {
        TestFixture::new()
            .with_kustomization("app/base", &["a.yaml"])
            .with_resource("app/base/a.yaml", "Deployment", "test-deployment")
            .with_file(
                "app/sub/kustomization.yaml",
                "apiVersion: kustomize.config.k8s.io/v1beta1\n\
                 kind: Kustomization\n\
                 resources:\n\
                 - ../base\n\
                 patchesStrategicMerge:\n\
                 - patch.yaml\n",
            )
            .with_resource("app/sub/patch.yaml", "Deployment", "test-deployment")
    }
}

/// A temporary directory holding a kustomize tree, plus an isolated home
/// directory for the settings file.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
    home_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
            home_dir: assert_fs::TempDir::new().expect("Failed to create home directory"),
        }
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add `<dir>/kustomization.yaml` listing `resources`.
    pub fn with_kustomization(self, dir: &str, resources: &[&str]) -> Self {
        let mut content =
            String::from("apiVersion: kustomize.config.k8s.io/v1beta1\nkind: Kustomization\n");
        if resources.is_empty() {
            content.push_str("resources: []\n");
        } else {
            content.push_str("resources:\n");
            for resource in resources {
                content.push_str(&format!("- {}\n", resource));
            }
        }
        self.with_file(&format!("{}/kustomization.yaml", dir), &content)
    }

    /// Add a resource manifest of `kind` with logical name `name`.
    pub fn with_resource(self, path: &str, kind: &str, name: &str) -> Self {
        let content = format!(
            "apiVersion: apps/v1\nkind: {}\nmetadata:\n  name: {}\n",
            kind, name
        );
        self.with_file(path, &content)
    }

    /// Write `$HOME/.graphmize.yaml` in the fixture's isolated home.
    #[allow(dead_code)]
    pub fn with_home_settings(self, content: &str) -> Self {
        self.home_dir
            .child(".graphmize.yaml")
            .write_str(content)
            .expect("Failed to write settings file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the fixture.
    #[allow(dead_code)]
    pub fn join(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    /// Create a command running in the fixture directory with an isolated
    /// environment.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("graphmize");
        cmd.current_dir(self.path());
        cmd.env("HOME", self.home_dir.path());
        for var in ISOLATED_ENV {
            cmd.env_remove(var);
        }
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_with_kustomization_writes_resources() {
        let fixture = TestFixture::new().with_kustomization("app", &["a.yaml", "../base"]);
        let content = std::fs::read_to_string(fixture.join("app/kustomization.yaml")).unwrap();
        assert!(content.contains("- a.yaml\n- ../base\n"));
    }

    #[test]
    fn test_layouts_are_valid_yaml() {
        let fixture = layouts::patched_overlay();
        for file in ["app/base/kustomization.yaml", "app/sub/kustomization.yaml", "app/sub/patch.yaml"] {
            let content = std::fs::read_to_string(fixture.join(file)).unwrap();
            serde_yaml::from_str::<serde_yaml::Value>(&content).expect("Layout should be valid YAML");
        }
    }
}
