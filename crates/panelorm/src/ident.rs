//! Safe SQL identifier handling.
//!
//! Everything the builder interpolates into SQL text (table names, column
//! names, qualified column references) passes through these checks. Values
//! never do — they are always bound as parameters.
//!
//! Identifiers must match `[A-Za-z_][A-Za-z0-9_$]*`; only bare names are
//! supported, so quoted forms are rejected.

use crate::error::{OrmError, OrmResult};

/// Validate a single bare identifier (table or column name).
pub(crate) fn check_ident(name: &str) -> OrmResult<()> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(OrmError::config("Identifier cannot be empty"));
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(OrmError::config(format!(
            "Invalid identifier '{name}': must start with a letter or '_'"
        )));
    }
    for c in chars {
        if !(c.is_ascii_alphanumeric() || c == '_' || c == '$') {
            return Err(OrmError::config(format!(
                "Invalid identifier '{name}': illegal character '{c}'"
            )));
        }
    }
    Ok(())
}

/// Validate a column reference, optionally qualified as `table.column`.
///
/// Used by refinements like `filter` and `order_by`, which accept qualified
/// references when extending a joined query.
pub(crate) fn check_column_ref(name: &str) -> OrmResult<()> {
    let mut parts = name.split('.');
    let (first, second, rest) = (parts.next(), parts.next(), parts.next());
    if rest.is_some() {
        return Err(OrmError::config(format!(
            "Invalid column reference '{name}': at most one qualifier allowed"
        )));
    }
    match (first, second) {
        (Some(col), None) => check_ident(col),
        (Some(table), Some(col)) => {
            check_ident(table)?;
            check_ident(col)
        }
        _ => Err(OrmError::config("Identifier cannot be empty")),
    }
}
