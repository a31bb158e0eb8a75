//! The end-to-end upgrade: `setup.py` in, stub `setup.py` and `setup.cfg` out
//!
//! Nothing is written until extraction, post-processing and merging have all
//! succeeded. `setup.cfg` is written before the stub replaces `setup.py`, and
//! is restored if that replacement fails, so a failed run leaves both files
//! untouched.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use ruff_python_ast::ModModule;
use ruff_python_parser::parse_module;

use crate::config::Config;
use crate::errors::{Result, UpgradeError};
use crate::sections::postprocess;
use crate::setup_cfg::ConfigDocument;
use crate::visitors::SetupCallVisitor;

/// What `setup.py` is replaced with once its configuration has moved
pub const SETUP_PY_STUB: &str = "from setuptools import setup\nsetup()\n";

/// Files written by a successful upgrade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeReport {
    pub setup_py: PathBuf,
    pub setup_cfg: PathBuf,
    /// Rendered `setup.cfg` contents
    pub contents: String,
}

/// Upgrade the project described by `config` in place
pub fn upgrade(config: &Config) -> Result<UpgradeReport> {
    let setup_py = config.setup_py_path();
    let setup_cfg = config.setup_cfg_path();
    debug!("Upgrading {}", config.directory().display());

    let source = fs::read_to_string(&setup_py).map_err(|err| UpgradeError::io(&setup_py, err))?;
    let existing = ConfigDocument::read(&setup_cfg)?;
    let document = convert(&source, &setup_py, existing.as_ref())?;
    let contents = document.render();

    let previous_cfg = read_previous(&setup_cfg)?;
    fs::write(&setup_cfg, &contents).map_err(|err| UpgradeError::io(&setup_cfg, err))?;
    if let Err(err) = fs::write(&setup_py, SETUP_PY_STUB) {
        restore(&setup_cfg, previous_cfg.as_deref());
        return Err(UpgradeError::io(&setup_py, err));
    }
    info!(
        "Wrote {} section(s) to {}",
        document.sections().values().filter(|s| !s.is_empty()).count(),
        setup_cfg.display()
    );

    Ok(UpgradeReport {
        setup_py,
        setup_cfg,
        contents,
    })
}

/// Convert `setup.py` source into a `setup.cfg` document, merged over
/// `existing` when given. `path` is only used for error messages.
pub fn convert(
    source: &str,
    path: &Path,
    existing: Option<&ConfigDocument>,
) -> Result<ConfigDocument> {
    let module = parse_setup_py(source, path)?;
    let sections = SetupCallVisitor::extract(&module)?;
    let mut document = ConfigDocument::new(postprocess(sections));
    if let Some(existing) = existing {
        document.merge_existing(existing);
    }
    Ok(document)
}

/// Raw bytes of a file about to be overwritten, `None` if it does not exist
fn read_previous(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(UpgradeError::io(path, err)),
    }
}

/// Put `path` back the way it was before this run touched it
fn restore(path: &Path, previous: Option<&[u8]>) {
    let result = match previous {
        Some(bytes) => fs::write(path, bytes),
        None => fs::remove_file(path),
    };
    if let Err(err) = result {
        warn!("Failed to restore {}: {err}", path.display());
    }
}

fn parse_setup_py(source: &str, path: &Path) -> Result<ModModule> {
    match parse_module(source) {
        Ok(parsed) => Ok(parsed.into_syntax()),
        Err(err) => {
            let offset = usize::from(err.location.start());
            let line = source
                .get(..offset)
                .map_or(1, |prefix| prefix.matches('\n').count() + 1);
            Err(UpgradeError::Parse {
                path: path.to_path_buf(),
                line,
                message: err.error.to_string(),
            })
        }
    }
}
