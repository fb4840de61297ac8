//! Typed error enum for the storage layer.
//!
//! Lets callers match on specific failure modes (permission denied,
//! duplicate key, a failed provisioning step) instead of downcasting
//! opaque boxes.

use tarxiv_core::CoreError;
use thiserror::Error;

/// MySQL server error numbers the storage layer distinguishes.
pub(crate) mod codes {
    /// `ER_DUP_ENTRY`
    pub const DUP_ENTRY: u16 = 1062;
    /// `ER_DBACCESS_DENIED_ERROR`
    pub const DB_ACCESS_DENIED: u16 = 1044;
    /// `ER_ACCESS_DENIED_ERROR`
    pub const ACCESS_DENIED: u16 = 1045;
    /// `ER_TABLEACCESS_DENIED_ERROR`
    pub const TABLE_ACCESS_DENIED: u16 = 1142;
    /// `ER_SPECIFIC_ACCESS_DENIED_ERROR`
    pub const SPECIFIC_ACCESS_DENIED: u16 = 1227;
}

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Row not found for expected-present entity.
    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// Primary-key collision.
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// The connected account lacks a privilege the statement needs.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// SQL / connection / timeout failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// A provisioning step failed; later steps were not attempted.
    #[error("provisioning step `{step}` failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: Box<StorageError>,
    },

    /// Request rejected before reaching the server.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl StorageError {
    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)) => true,
            Self::Step { source, .. } => source.is_transient(),
            _ => false,
        }
    }

    /// Whether this error is a primary-key violation.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }

    /// Whether the server refused the statement for lack of privileges.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::PermissionDenied(_) => true,
            Self::Step { source, .. } => source.is_permission_denied(),
            _ => false,
        }
    }

    pub(crate) fn at_step(step: &'static str, source: Self) -> Self {
        Self::Step { step, source: Box::new(source) }
    }
}

/// MySQL server error number carried by a sqlx database error, if any.
pub(crate) fn mysql_error_number(err: &sqlx::Error) -> Option<u16> {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .try_downcast_ref::<sqlx::mysql::MySqlDatabaseError>()
            .map(sqlx::mysql::MySqlDatabaseError::number),
        _ => None,
    }
}

/// Custom `From<sqlx::Error>` instead of a blanket `#[from]`.
///
/// - `RowNotFound` → `NotFound` (generic; callers remap with entity context)
/// - `ER_DUP_ENTRY` → `Duplicate`
/// - access-denied family → `PermissionDenied`
/// - Everything else → `Database`
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if matches!(err, sqlx::Error::RowNotFound) {
            return Self::NotFound { entity: "row", id: "unknown".into() };
        }
        match mysql_error_number(&err) {
            Some(codes::DUP_ENTRY) => Self::Duplicate(database_message(&err)),
            Some(
                codes::DB_ACCESS_DENIED
                | codes::ACCESS_DENIED
                | codes::TABLE_ACCESS_DENIED
                | codes::SPECIFIC_ACCESS_DENIED,
            ) => Self::PermissionDenied(database_message(&err)),
            _ => Self::Database(err),
        }
    }
}

impl From<CoreError> for StorageError {
    fn from(err: CoreError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

fn database_message(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => db_err.message().to_owned(),
        other => other.to_string(),
    }
}
