//! TnsEntryStore implementation for MySqlStorage.

use async_trait::async_trait;
use sqlx::mysql::{MySql, MySqlArguments};
use sqlx::query::Query;
use tarxiv_core::{GroupList, TnsEntry};

use super::{MySqlStorage, insert_entry_sql, row_to_entry, select_entries_sql};
use crate::error::StorageError;
use crate::schema::TNS_ENTRIES;
use crate::sql::quote_ident;
use crate::traits::TnsEntryStore;

/// Bind every column of `entry`, in table order.
fn bind_entry<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    entry: &'q TnsEntry,
) -> Query<'q, MySql, MySqlArguments> {
    query
        .bind(entry.objid)
        .bind(entry.name.as_deref())
        .bind(entry.ra.as_deref())
        .bind(entry.radeg)
        .bind(entry.dec.as_deref())
        .bind(entry.decdeg)
        .bind(entry.object_type.as_deref())
        .bind(entry.host_name.as_deref())
        .bind(entry.host_redshift)
        .bind(entry.reporting_groups.as_ref().map(GroupList::to_column))
        .bind(entry.discovery_data_sources.as_ref().map(GroupList::to_column))
        .bind(entry.classifying_groups.as_ref().map(GroupList::to_column))
        .bind(entry.internal_names.as_deref())
        .bind(entry.public.as_deref())
        .bind(entry.spectra_count)
        .bind(entry.discovery_mag)
        .bind(entry.discovery_filter)
        .bind(entry.discovery_date)
        .bind(entry.sender.as_deref())
}

#[async_trait]
impl TnsEntryStore for MySqlStorage {
    async fn save_entry(&self, entry: &TnsEntry) -> Result<bool, StorageError> {
        entry.validate()?;
        let sql = insert_entry_sql(false);
        match bind_entry(sqlx::query(&sql), entry).execute(&self.pool).await {
            Ok(result) => Ok(result.rows_affected() > 0),
            Err(e) => match StorageError::from(e) {
                StorageError::Duplicate(_) => {
                    tracing::debug!(objid = entry.objid, "entry already exists");
                    Ok(false)
                },
                other => Err(other),
            },
        }
    }

    async fn upsert_entry(&self, entry: &TnsEntry) -> Result<(), StorageError> {
        entry.validate()?;
        let sql = insert_entry_sql(true);
        bind_entry(sqlx::query(&sql), entry).execute(&self.pool).await?;
        tracing::info!(objid = entry.objid, name = ?entry.name, "upserted entry");
        Ok(())
    }

    async fn get_by_objid(&self, objid: i32) -> Result<Option<TnsEntry>, StorageError> {
        let sql = format!(
            "{} WHERE {} = ?",
            select_entries_sql(),
            quote_ident(TNS_ENTRIES.primary_key)
        );
        let row = sqlx::query(&sql).bind(objid).fetch_optional(&self.pool).await?;
        row.map(|r| row_to_entry(&r)).transpose()
    }

    async fn get_by_name(&self, name: &str) -> Result<Vec<TnsEntry>, StorageError> {
        let sql = format!(
            "{} WHERE `name` = ? ORDER BY {}",
            select_entries_sql(),
            quote_ident(TNS_ENTRIES.primary_key)
        );
        let rows = sqlx::query(&sql).bind(name).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_entry).collect()
    }

    async fn count_entries(&self) -> Result<u64, StorageError> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(TNS_ENTRIES.name));
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn delete_entry(&self, objid: i32) -> Result<bool, StorageError> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?",
            quote_ident(TNS_ENTRIES.name),
            quote_ident(TNS_ENTRIES.primary_key)
        );
        let result = sqlx::query(&sql).bind(objid).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
