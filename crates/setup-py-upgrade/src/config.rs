//! Run configuration
//!
//! Everything the upgrade needs to know about where its inputs live. The
//! binary builds this from command-line arguments; tests build it directly.

use std::path::{Path, PathBuf};

/// Default name of the imperative build script
pub const SETUP_PY: &str = "setup.py";
/// Default name of the declarative configuration document
pub const SETUP_CFG: &str = "setup.cfg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Project directory containing the build script
    pub directory: PathBuf,
    /// File name of the build script inside `directory`
    pub setup_py: String,
    /// File name of the configuration document inside `directory`
    pub setup_cfg: String,
}

impl Config {
    /// Configuration for a project directory with the conventional file names
    pub fn for_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    pub fn setup_py_path(&self) -> PathBuf {
        self.directory.join(&self.setup_py)
    }

    pub fn setup_cfg_path(&self) -> PathBuf {
        self.directory.join(&self.setup_cfg)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            setup_py: SETUP_PY.to_string(),
            setup_cfg: SETUP_CFG.to_string(),
        }
    }
}
