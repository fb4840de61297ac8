//! MySQL record store using sqlx.
//!
//! Connects as the general-use account with the provisioned database
//! selected. The schema itself is owned by the provisioner; this backend
//! never issues DDL.

mod entries;

use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::Row;
use tarxiv_core::{
    GroupList, MYSQL_POOL_ACQUIRE_TIMEOUT_SECS, MYSQL_POOL_IDLE_TIMEOUT_SECS,
    MYSQL_POOL_MAX_CONNECTIONS, TnsEntry, env_parse_with_default,
};

use crate::error::StorageError;
use crate::schema::TNS_ENTRIES;
use crate::sql::quote_ident;

pub const ENV_POOL_MAX_CONNECTIONS: &str = "TARXIV_POOL_MAX_CONNECTIONS";

#[derive(Clone, Debug)]
pub struct MySqlStorage {
    pool: MySqlPool,
}

impl MySqlStorage {
    pub async fn new(options: MySqlConnectOptions) -> Result<Self, StorageError> {
        let max_connections = pool_max_connections(env_parse_with_default(
            ENV_POOL_MAX_CONNECTIONS,
            MYSQL_POOL_MAX_CONNECTIONS,
        ));
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(MYSQL_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(Duration::from_secs(MYSQL_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect_with(options)
            .await?;
        tracing::info!(max_connections, "MySqlStorage initialized");
        Ok(Self { pool })
    }

    /// Wrap an existing pool; its connections must have the provisioned
    /// database selected.
    #[must_use]
    pub const fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// A zero-sized pool never hands out a connection; fall back to the default.
fn pool_max_connections(requested: u32) -> u32 {
    if requested == 0 {
        tracing::warn!(
            var = ENV_POOL_MAX_CONNECTIONS,
            default = MYSQL_POOL_MAX_CONNECTIONS,
            "pool size must be at least 1, using default"
        );
        return MYSQL_POOL_MAX_CONNECTIONS;
    }
    requested
}

fn group_list(raw: Option<String>) -> Option<GroupList> {
    raw.map(|s| GroupList::from_column(&s))
}

pub(crate) fn row_to_entry(row: &MySqlRow) -> Result<TnsEntry, StorageError> {
    Ok(TnsEntry {
        objid: row.try_get("objid")?,
        name: row.try_get("name")?,
        ra: row.try_get("ra")?,
        radeg: row.try_get("radeg")?,
        dec: row.try_get("dec")?,
        decdeg: row.try_get("decdeg")?,
        object_type: row.try_get("object_type")?,
        host_name: row.try_get("host_name")?,
        host_redshift: row.try_get("host_redshift")?,
        reporting_groups: group_list(row.try_get("reporting_groups")?),
        discovery_data_sources: group_list(row.try_get("discovery_data_sources")?),
        classifying_groups: group_list(row.try_get("classifying_groups")?),
        internal_names: row.try_get("internal_names")?,
        public: row.try_get("public")?,
        spectra_count: row.try_get("spectra_count")?,
        discovery_mag: row.try_get("discovery_mag")?,
        discovery_filter: row.try_get("discovery_filter")?,
        discovery_date: row.try_get("discovery_date")?,
        sender: row.try_get("sender")?,
    })
}

/// `SELECT <all columns> FROM tns_entries`
pub(crate) fn select_entries_sql() -> String {
    format!("SELECT {} FROM {}", TNS_ENTRIES.column_list(), quote_ident(TNS_ENTRIES.name))
}

/// `INSERT INTO tns_entries (...) VALUES (?, ...)`, optionally overwriting
/// every non-key column on a primary-key collision.
pub(crate) fn insert_entry_sql(upsert: bool) -> String {
    let placeholders = vec!["?"; TNS_ENTRIES.columns.len()].join(", ");
    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        quote_ident(TNS_ENTRIES.name),
        TNS_ENTRIES.column_list()
    );
    if upsert {
        let updates = TNS_ENTRIES
            .columns
            .iter()
            .filter(|c| c.name != TNS_ENTRIES.primary_key)
            .map(|c| {
                let col = quote_ident(c.name);
                format!("{col} = VALUES({col})")
            })
            .collect::<Vec<_>>()
            .join(", ");
        sql.push_str(" ON DUPLICATE KEY UPDATE ");
        sql.push_str(&updates);
    }
    sql
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_sql_has_one_placeholder_per_column() {
        let sql = insert_entry_sql(false);
        assert_eq!(sql.matches('?').count(), 19);
        assert!(sql.starts_with("INSERT INTO `tns_entries` (`objid`, `name`"));
        assert!(!sql.contains("ON DUPLICATE KEY"));
    }

    #[test]
    fn upsert_sql_never_updates_primary_key() {
        let sql = insert_entry_sql(true);
        assert!(sql.contains("ON DUPLICATE KEY UPDATE `name` = VALUES(`name`)"));
        assert!(sql.ends_with("`sender` = VALUES(`sender`)"));
        assert!(!sql.contains("`objid` = VALUES"));
        assert_eq!(sql.matches("VALUES(`").count(), 18);
    }

    #[test]
    fn zero_pool_size_falls_back_to_default() {
        assert_eq!(pool_max_connections(0), MYSQL_POOL_MAX_CONNECTIONS);
        assert_eq!(pool_max_connections(1), 1);
        assert_eq!(pool_max_connections(12), 12);
    }

    #[test]
    fn select_sql_lists_every_column() {
        let sql = select_entries_sql();
        assert!(sql.starts_with("SELECT `objid`, `name`"));
        assert!(sql.ends_with("FROM `tns_entries`"));
    }
}
