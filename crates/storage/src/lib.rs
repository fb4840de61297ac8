//! MySQL layer for tarxiv.
//!
//! Provisions the `tns_entries` schema and its two accounts, reads the
//! result back for verification, and stores notice records through the
//! general-use account.

mod connection;
pub mod error;
mod inspect;
mod mysql_storage;
pub mod provision;
pub mod schema;
mod sql;
pub mod traits;

pub use connection::{admin_connect_options, app_connect_options, options_from_url};
pub use error::StorageError;
pub use inspect::{ColumnInfo, IndexInfo, IndexUsage, LookupValue, SchemaInspector, VerifyReport};
pub use mysql_storage::{ENV_POOL_MAX_CONNECTIONS, MySqlStorage};
pub use provision::{ProvisionPlan, ProvisionReport, ProvisionRequest, Provisioner};
pub use schema::{TNS_ENTRIES, TableSpec};
pub use traits::TnsEntryStore;
