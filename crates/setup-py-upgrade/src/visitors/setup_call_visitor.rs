//! Visitor that extracts `setup()` keyword arguments into sections
//!
//! The whole module is walked once in source order. `with` blocks feed the
//! file alias map, and every call matching `setup(...)` or
//! `setuptools.setup(...)` has its keywords classified and evaluated.

use log::{debug, trace, warn};
use ruff_python_ast::visitor::{Visitor, walk_expr, walk_stmt};
use ruff_python_ast::{Expr, ExprCall, Keyword, ModModule, Stmt};
use ruff_text_size::Ranged;
use rustc_hash::FxHashMap;

use super::file_read::match_file_read;
use super::utils::{is_setuptools_attr_call, name_id};
use crate::errors::{Result, UpgradeError};
use crate::keywords::{DiscoveryHelper, FIND_PACKAGES_ARGS, PACKAGES_FIND_SECTION, SectionKind};
use crate::literal::literal_eval;
use crate::types::{FxIndexMap, Literal, SectionMap};

/// Collects the keyword arguments of the `setup()` call
#[derive(Debug)]
pub struct SetupCallVisitor {
    /// Extracted values, seeded with empty `metadata` and `options` sections
    sections: SectionMap,
    /// Local name -> file it was read from
    files: FxHashMap<String, String>,
    /// Number of `setup()` calls seen
    setup_calls: usize,
    /// First fatal error; once set nothing else is extracted
    error: Option<UpgradeError>,
}

impl SetupCallVisitor {
    /// Create a new visitor with empty `metadata` and `options` sections
    pub fn new() -> Self {
        let mut sections = SectionMap::default();
        sections.insert(SectionKind::Metadata.section_name().to_string(), FxIndexMap::default());
        sections.insert(SectionKind::Options.section_name().to_string(), FxIndexMap::default());
        Self {
            sections,
            files: FxHashMap::default(),
            setup_calls: 0,
            error: None,
        }
    }

    /// Walk a module and return the extracted sections
    pub fn extract(module: &ModModule) -> Result<SectionMap> {
        let mut visitor = Self::new();
        visitor.visit_body(&module.body);
        visitor.finish()
    }

    /// Consume the visitor, surfacing the first error encountered
    pub fn finish(self) -> Result<SectionMap> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.setup_calls == 0 {
            warn!("No setup() call found; only an existing setup.cfg will be carried over");
        } else if self.setup_calls > 1 {
            debug!(
                "Found {} setup() calls; later keywords overwrite earlier ones",
                self.setup_calls
            );
        }
        Ok(self.sections)
    }

    /// Process every keyword of a `setup()` call
    fn process_setup_call(&mut self, call: &ExprCall) -> Result<()> {
        self.setup_calls += 1;
        debug!("Found setup() call at {:?}", call.range());

        for keyword in &call.arguments.keywords {
            let Some(arg) = &keyword.arg else {
                return Err(UpgradeError::UnpackedKeywords);
            };
            let key = arg.as_str();
            let section = SectionKind::classify(key).ok_or_else(|| UpgradeError::unsupported(key))?;
            let value = self.resolve_value(key, keyword)?;

            trace!("{section}.{key} = {value:?}");
            self.sections
                .entry(section.section_name().to_string())
                .or_default()
                .insert(key.to_string(), value);
        }
        Ok(())
    }

    /// Resolve a keyword value via the file alias map, a discovery helper or
    /// literal evaluation, in that order
    fn resolve_value(&mut self, key: &str, keyword: &Keyword) -> Result<Literal> {
        if let Some(filename) = name_id(&keyword.value).and_then(|name| self.files.get(name)) {
            debug!("{key}= reads {filename}");
            return Ok(Literal::Str(format!("file: {filename}")));
        }

        if let Expr::Call(call) = &keyword.value
            && let Some(helper) = DiscoveryHelper::ALL
                .into_iter()
                .find(|helper| is_setuptools_attr_call(call, helper.function_name()))
        {
            let find_section = Self::discovery_arguments(call)?;
            debug!(
                "{key}= uses {}() with {} argument(s)",
                helper.function_name(),
                find_section.len()
            );
            self.sections.insert(PACKAGES_FIND_SECTION.to_string(), find_section);
            return Ok(Literal::Str(helper.sentinel().to_string()));
        }

        literal_eval(&keyword.value).ok_or_else(|| UpgradeError::unparsable(key))
    }

    /// Map `find_packages()` arguments onto their parameter names
    fn discovery_arguments(call: &ExprCall) -> Result<FxIndexMap<String, Literal>> {
        let mut find_section = FxIndexMap::default();

        for (name, arg) in FIND_PACKAGES_ARGS.iter().zip(call.arguments.args.iter()) {
            let value = literal_eval(arg).ok_or_else(|| UpgradeError::unparsable(name))?;
            find_section.insert((*name).to_string(), value);
        }
        for keyword in &call.arguments.keywords {
            let Some(arg) = &keyword.arg else {
                return Err(UpgradeError::UnpackedKeywords);
            };
            let value =
                literal_eval(&keyword.value).ok_or_else(|| UpgradeError::unparsable(arg.as_str()))?;
            find_section.insert(arg.as_str().to_string(), value);
        }

        Ok(find_section)
    }
}

impl Default for SetupCallVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Visitor<'a> for SetupCallVisitor {
    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        if self.error.is_some() {
            return;
        }

        if let Stmt::With(with_stmt) = stmt
            && let Some(alias) = match_file_read(with_stmt)
        {
            debug!("Recorded file alias {} -> {}", alias.name, alias.filename);
            self.files.insert(alias.name, alias.filename);
        }

        // Keep walking: calls nested in any statement still matter
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'a Expr) {
        if self.error.is_some() {
            return;
        }

        if let Expr::Call(call) = expr
            && is_setuptools_attr_call(call, "setup")
            && let Err(error) = self.process_setup_call(call)
        {
            self.error = Some(error);
            return;
        }

        walk_expr(self, expr);
    }
}
