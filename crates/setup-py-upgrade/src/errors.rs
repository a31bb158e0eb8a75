//! Error types for the upgrade pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Every way an upgrade can fail. Any of these aborts the run before either
/// output file is written.
#[derive(Debug, Error)]
pub enum UpgradeError {
    /// A `setup()` keyword that has no `setup.cfg` equivalent
    #[error("{key}= is not supported in setup.cfg")]
    UnsupportedKeyword { key: String },

    /// `setup(**kwargs)` hides its keywords from static analysis
    #[error("**kwargs unpacking is not supported in setup.cfg")]
    UnpackedKeywords,

    /// A keyword value that is not a literal, file alias or helper call
    #[error("unparsable: {key}=")]
    UnparsableValue { key: String },

    #[error("failed to parse {}: {message} (line {line})", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("malformed {} at line {line}: {message}", path.display())]
    MalformedConfig {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl UpgradeError {
    pub(crate) fn unsupported(key: &str) -> Self {
        Self::UnsupportedKeyword {
            key: key.to_owned(),
        }
    }

    pub(crate) fn unparsable(key: &str) -> Self {
        Self::UnparsableValue {
            key: key.to_owned(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = UpgradeError> = std::result::Result<T, E>;
