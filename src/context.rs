// File: ./src/context.rs
/*! Filesystem context for locating the configuration file.

`StandardContext` resolves the platform config directory through
`directories::ProjectDirs`, or uses an explicit file given on the command
line. `TestContext` owns a throwaway directory so tests never touch the real
user configuration.

Callers pass `&dyn AppContext` explicitly; there is no global lookup.
*/

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use std::path::{Path, PathBuf};

pub trait AppContext: std::fmt::Debug {
    fn get_config_dir(&self) -> Result<PathBuf>;

    fn get_config_file_path(&self) -> Result<PathBuf> {
        Ok(self.get_config_dir()?.join("config.toml"))
    }
}

// --- Production Implementation ---

#[derive(Clone, Debug, Default)]
pub struct StandardContext {
    config_file: Option<PathBuf>,
}

impl StandardContext {
    /// When `config_file` is `Some`, that file is used verbatim instead of the
    /// platform default location.
    pub fn new(config_file: Option<PathBuf>) -> Self {
        Self { config_file }
    }

    fn get_proj_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("org", "almanac", "almanac")
    }
}

impl AppContext for StandardContext {
    fn get_config_dir(&self) -> Result<PathBuf> {
        if let Some(file) = &self.config_file {
            return Ok(file
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")));
        }
        let proj = Self::get_proj_dirs().ok_or_else(|| anyhow::anyhow!("No home directory"))?;
        Ok(proj.config_dir().to_path_buf())
    }

    fn get_config_file_path(&self) -> Result<PathBuf> {
        if let Some(file) = &self.config_file {
            return Ok(file.clone());
        }
        Ok(self.get_config_dir()?.join("config.toml"))
    }
}

// --- Test Implementation ---

#[derive(Clone, Debug)]
pub struct TestContext {
    pub root: PathBuf,
}

impl TestContext {
    /// Creates a context backed by a unique temporary directory, removed on drop.
    pub fn new() -> Self {
        let uuid = uuid::Uuid::new_v4();
        let root = std::env::temp_dir().join(format!("almanac_test_{}", uuid));
        std::fs::create_dir_all(&root).expect("failed to create TestContext temp dir");
        Self { root }
    }

    /// Creates (or returns) a calendar directory under the test root.
    pub fn calendar_dir(&self, name: &str) -> PathBuf {
        let dir = self.root.join("calendars").join(name);
        std::fs::create_dir_all(&dir).expect("failed to create calendar dir");
        dir
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext for TestContext {
    fn get_config_dir(&self) -> Result<PathBuf> {
        let p = self.root.join("config");
        std::fs::create_dir_all(&p)
            .with_context(|| format!("Failed to create directory: {:?}", p))?;
        Ok(p)
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        // Best-effort cleanup; ignore errors.
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

/// Expands a leading `~` against the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(base) = BaseDirs::new()
    {
        return base.home_dir().join(rest);
    }
    path.to_path_buf()
}
