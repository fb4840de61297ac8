//! Database accounts and the privilege sets granted to them.

use std::fmt;

use serde::Serialize;

use crate::sql::quote_literal;

/// Where an account may connect from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HostScope {
    /// `'user'@'localhost'`
    Localhost,
    /// `'user'@'%'`
    AnyHost,
}

impl HostScope {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Localhost => "localhost",
            Self::AnyHost => "%",
        }
    }
}

/// A MySQL account, `'user'@'host'`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub user: String,
    pub host: HostScope,
}

impl Principal {
    /// Administrative account, confined to local connections.
    pub fn admin(user: impl Into<String>) -> Self {
        Self { user: user.into(), host: HostScope::Localhost }
    }

    /// General-use account, reachable from any host.
    pub fn app(user: impl Into<String>) -> Self {
        Self { user: user.into(), host: HostScope::AnyHost }
    }

    /// Account name as written in `CREATE USER` / `GRANT`.
    #[must_use]
    pub fn account_sql(&self) -> String {
        format!("{}@{}", quote_literal(&self.user), quote_literal(self.host.as_str()))
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'@'{}'", self.user, self.host.as_str())
    }
}

/// Privileges granted on a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivilegeSet {
    /// Unrestricted.
    All,
    /// Row-level read/write only; no schema changes.
    RowAccess,
}

impl PrivilegeSet {
    pub const ROW_ACCESS_PRIVILEGES: &'static [&'static str] =
        &["SELECT", "UPDATE", "DELETE", "INSERT"];

    #[must_use]
    pub fn sql(&self) -> String {
        match *self {
            Self::All => "ALL PRIVILEGES".to_owned(),
            Self::RowAccess => Self::ROW_ACCESS_PRIVILEGES.join(", "),
        }
    }
}
