//! Shared constants for tarxiv.
//!
//! Names and limits used by both the provisioner and the record store.

/// Table holding one row per TNS object.
pub const TNS_ENTRIES_TABLE: &str = "tns_entries";

/// Secondary index on `tns_entries.name`.
pub const NAME_INDEX: &str = "name_idx";

/// Default administrative account (local-host only).
pub const DEFAULT_ADMIN_USER: &str = "tarxiv_admin";

/// Default general-use account (any host).
pub const DEFAULT_APP_USER: &str = "tarxiv";

/// Default MySQL port.
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Default MySQL host for the administrative connection.
pub const DEFAULT_MYSQL_HOST: &str = "localhost";

/// MySQL limit on database and table identifiers.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// MySQL limit on account user names.
pub const MAX_USER_NAME_LEN: usize = 32;

/// Record store pool: maximum connections.
pub const MYSQL_POOL_MAX_CONNECTIONS: u32 = 5;

/// Record store pool: acquire timeout in seconds.
pub const MYSQL_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// Record store pool: idle timeout in seconds.
pub const MYSQL_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Separator used when a group list is stored in a single text column.
pub const GROUP_LIST_SEPARATOR: char = ',';

/// Secret values that are shipped as placeholders and must be replaced
/// before provisioning.
pub const PLACEHOLDER_SECRETS: &[&str] = &["password", "changeme", "secret", "<password>"];
