//! AST visitor implementations for setup-py-upgrade
//!
//! This module contains the matchers and the visitor that walk a parsed
//! `setup.py` and pull the `setup()` keyword arguments out of it.

mod file_read;
mod setup_call_visitor;
mod utils;

pub use file_read::{FileAlias, match_file_read};
pub use setup_call_visitor::SetupCallVisitor;
pub use utils::is_setuptools_attr_call;
