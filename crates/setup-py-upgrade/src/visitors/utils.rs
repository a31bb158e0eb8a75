//! Shared matchers for visitor implementations

use ruff_python_ast::{Expr, ExprCall};

/// Namespace under which `setup` and the discovery helpers are importable
pub(crate) const SETUPTOOLS: &str = "setuptools";

/// Check if a call is `attr(...)` or `setuptools.attr(...)`
///
/// Any other callee shape (deeper attribute chains, calls on call results,
/// aliases such as `st.setup`) does not match.
pub fn is_setuptools_attr_call(call: &ExprCall, attr: &str) -> bool {
    match call.func.as_ref() {
        // X(
        Expr::Name(name) => name.id.as_str() == attr,
        // setuptools.X(
        Expr::Attribute(attribute) => {
            attribute.attr.as_str() == attr
                && matches!(attribute.value.as_ref(), Expr::Name(base) if base.id.as_str() == SETUPTOOLS)
        }
        _ => false,
    }
}

/// Extract a string value from an expression if it's a string literal
pub(crate) fn extract_string_from_expr(expr: &Expr) -> Option<String> {
    if let Expr::StringLiteral(string_lit) = expr {
        Some(string_lit.value.to_str().to_string())
    } else {
        None
    }
}

/// Name bound by a bare `Name` expression
pub(crate) fn name_id(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Name(name) => Some(name.id.as_str()),
        _ => None,
    }
}
