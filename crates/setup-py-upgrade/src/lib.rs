//! Migrate a setuptools `setup.py` into a declarative `setup.cfg`
//!
//! The `setup()` call is found and read statically; the script is never
//! executed. Keyword arguments that cannot be expressed in `setup.cfg`, or
//! whose values are not literals, abort the upgrade without touching any file.

pub mod config;
pub mod errors;
pub mod keywords;
pub mod literal;
pub mod sections;
pub mod setup_cfg;
pub mod types;
pub mod upgrade;
pub mod visitors;

pub use config::Config;
pub use errors::UpgradeError;
pub use upgrade::{SETUP_PY_STUB, UpgradeReport, convert, upgrade};
