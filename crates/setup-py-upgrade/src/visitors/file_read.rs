//! Recognition of the `with open(...) as f: x = f.read()` idiom
//!
//! `setup.py` files commonly read `README` into a local before passing it as
//! `long_description`. setup.cfg expresses the same thing with `file:`, so the
//! local name is remembered together with the file it was read from.

use ruff_python_ast::{Expr, Stmt, StmtWith};

use super::utils::{extract_string_from_expr, name_id};

/// A local name proven to hold the full contents of a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAlias {
    pub name: String,
    pub filename: String,
}

/// Match the narrow file-read idiom:
///
/// ```python
/// with open("filename", ...) as fvar:
///     varname = fvar.read()
/// ```
///
/// Returns `None` for every other shape; callers keep traversing the block.
pub fn match_file_read(with_stmt: &StmtWith) -> Option<FileAlias> {
    if with_stmt.is_async {
        return None;
    }

    // with open(...)
    let [item] = with_stmt.items.as_slice() else {
        return None;
    };
    let Expr::Call(open_call) = &item.context_expr else {
        return None;
    };
    if name_id(&open_call.func) != Some("open") {
        return None;
    }
    // "filename"
    let filename = open_call
        .arguments
        .args
        .first()
        .and_then(extract_string_from_expr)?;
    // as fvar
    let file_var = name_id(item.optional_vars.as_deref()?)?;

    // varname =
    let [Stmt::Assign(assign)] = with_stmt.body.as_slice() else {
        return None;
    };
    let [target] = assign.targets.as_slice() else {
        return None;
    };
    let varname = name_id(target)?;

    // fvar.read()
    let Expr::Call(read_call) = assign.value.as_ref() else {
        return None;
    };
    let Expr::Attribute(accessor) = read_call.func.as_ref() else {
        return None;
    };
    if accessor.attr.as_str() != "read" || name_id(&accessor.value) != Some(file_var) {
        return None;
    }

    Some(FileAlias {
        name: varname.to_string(),
        filename,
    })
}
