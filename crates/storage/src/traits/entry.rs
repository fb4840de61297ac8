use async_trait::async_trait;
use tarxiv_core::TnsEntry;

use crate::error::StorageError;

/// CRUD operations on `tns_entries`.
///
/// Every method works with the general-use account's privileges
/// (SELECT, INSERT, UPDATE, DELETE).
#[async_trait]
pub trait TnsEntryStore: Send + Sync {
    /// Insert a new entry. Returns `true` if inserted, `false` if `objid`
    /// already exists.
    async fn save_entry(&self, entry: &TnsEntry) -> Result<bool, StorageError>;

    /// Insert, or overwrite every non-key column of an existing entry.
    async fn upsert_entry(&self, entry: &TnsEntry) -> Result<(), StorageError>;

    /// Get entry by primary key.
    async fn get_by_objid(&self, objid: i32) -> Result<Option<TnsEntry>, StorageError>;

    /// Get all entries with this name, ordered by `objid`.
    async fn get_by_name(&self, name: &str) -> Result<Vec<TnsEntry>, StorageError>;

    /// Total number of entries.
    async fn count_entries(&self) -> Result<u64, StorageError>;

    /// Delete entry by primary key. Returns `true` if a row was removed.
    async fn delete_entry(&self, objid: i32) -> Result<bool, StorageError>;
}
