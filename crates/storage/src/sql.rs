//! Quoting for statements that cannot use bind parameters.
//!
//! `CREATE DATABASE`, `CREATE USER` and `GRANT` take identifiers and
//! passwords as literal text. Names are validated upstream; quoting here
//! keeps the rendered statement well-formed even for reserved words
//! such as `dec` and `public`.

/// Backtick-quote an identifier, doubling embedded backticks.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Quote a database name as the target of a database-level `GRANT`.
///
/// MySQL matches `_` and `%` in `GRANT ... ON db.*` as LIKE wildcards, so
/// both are backslash-escaped to grant on exactly one database. `SHOW
/// GRANTS` echoes the name back in this form.
pub(crate) fn quote_grant_db(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('_', "\\_").replace('%', "\\%");
    quote_ident(&escaped)
}

/// Single-quote a string literal.
///
/// Backslashes are escaped as well as quotes because the server may run
/// without `NO_BACKSLASH_ESCAPES`.
pub(crate) fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}
