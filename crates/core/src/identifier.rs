//! Validation for names that end up inside DDL/DCL statements.
//!
//! MySQL cannot bind identifiers or account names as parameters, so every
//! name that is spliced into a statement must pass these checks first.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{MAX_IDENTIFIER_LEN, MAX_USER_NAME_LEN};
use crate::error::{CoreError, Result};

#[allow(clippy::unwrap_used, reason = "static regex is known to be valid")]
static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_$]+$").unwrap());

/// Validate a database or table name.
pub fn validate_identifier(kind: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CoreError::InvalidInput(format!("{kind} name must not be blank")));
    }
    if name.chars().count() > MAX_IDENTIFIER_LEN {
        return Err(CoreError::InvalidInput(format!(
            "{kind} name `{name}` exceeds {MAX_IDENTIFIER_LEN} characters"
        )));
    }
    if !IDENTIFIER_REGEX.is_match(name) {
        return Err(CoreError::InvalidInput(format!(
            "{kind} name `{name}` may only contain ASCII letters, digits, `_` and `$`"
        )));
    }
    if name.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::InvalidInput(format!(
            "{kind} name `{name}` must not consist solely of digits"
        )));
    }
    Ok(())
}

/// Validate an account user name (the part before `@`).
pub fn validate_user_name(name: &str) -> Result<()> {
    if name.chars().count() > MAX_USER_NAME_LEN {
        return Err(CoreError::InvalidInput(format!(
            "user name `{name}` exceeds {MAX_USER_NAME_LEN} characters"
        )));
    }
    validate_identifier("user", name)
}
