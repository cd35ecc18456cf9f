//! Temporary directory environment for configuration tests.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::fixtures::ConfigFixture;

/// A temporary directory that lives as long as the environment.
pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    /// Create an empty environment.
    pub fn new() -> Result<Self> {
        super::init_test_logging(None);

        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        Ok(Self {
            temp_dir,
        })
    }

    /// Create an environment with `fixture` already written.
    pub fn with_fixture(fixture: &ConfigFixture) -> Result<(Self, PathBuf)> {
        let env = Self::new()?;
        let path = fixture.write_to(env.path())?;
        Ok((env, path))
    }

    /// The environment's root directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `path`, relative to the root, creating parents.
    pub fn create_file(&self, path: impl AsRef<Path>, content: &str) -> Result<PathBuf> {
        let full_path = self.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full_path, content)
            .with_context(|| format!("Failed to write {}", full_path.display()))?;
        Ok(full_path)
    }

    /// Create a directory relative to the root.
    pub fn create_dir(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let full_path = self.path().join(path);
        fs::create_dir_all(&full_path)?;
        Ok(full_path)
    }

    /// Read a file relative to the root.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let full_path = self.path().join(path);
        fs::read_to_string(&full_path)
            .with_context(|| format!("Failed to read {}", full_path.display()))
    }

    /// Whether a file exists relative to the root.
    pub fn file_exists(&self, path: impl AsRef<Path>) -> bool {
        self.path().join(path).exists()
    }
}
