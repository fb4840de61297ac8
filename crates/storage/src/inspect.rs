//! Reading back the live schema and accounts after provisioning.

use serde::Serialize;
use sqlx::mysql::MySqlConnection;
use sqlx::Row;

use crate::error::StorageError;
use crate::provision::{Principal, PrivilegeSet, ProvisionRequest};
use crate::schema::{TNS_ENTRIES, TableSpec};
use crate::sql::{quote_grant_db, quote_ident, quote_literal};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub column_type: String,
    pub nullable: bool,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexInfo {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

/// Value for an `EXPLAIN`ed equality lookup.
#[derive(Debug, Clone)]
pub enum LookupValue {
    Int(i32),
    Text(String),
}

/// Indexes the optimizer considered and chose for a lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexUsage {
    pub possible_keys: Vec<String>,
    pub key: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    pub database: String,
    pub table: &'static str,
    pub columns: Vec<ColumnInfo>,
    pub indexes: Vec<IndexInfo>,
    pub admin_hosts: Vec<String>,
    pub app_hosts: Vec<String>,
    pub app_privileges: Vec<String>,
    pub problems: Vec<String>,
}

impl VerifyReport {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Read-only queries against `information_schema` and `mysql.user`.
///
/// Needs an account allowed to read `mysql.user`, i.e. the
/// administrative connection.
pub struct SchemaInspector<'c> {
    conn: &'c mut MySqlConnection,
}

impl<'c> SchemaInspector<'c> {
    pub fn new(conn: &'c mut MySqlConnection) -> Self {
        Self { conn }
    }

    pub async fn table_columns(
        &mut self,
        database: &str,
        table: &str,
    ) -> Result<Vec<ColumnInfo>, StorageError> {
        let rows = sqlx::query(
            "SELECT CAST(COLUMN_NAME AS CHAR) AS column_name,
                    CAST(COLUMN_TYPE AS CHAR) AS column_type,
                    CAST(IS_NULLABLE AS CHAR) AS is_nullable,
                    CAST(COLUMN_KEY AS CHAR) AS column_key
             FROM information_schema.COLUMNS
             WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
             ORDER BY ORDINAL_POSITION",
        )
        .bind(database)
        .bind(table)
        .fetch_all(&mut *self.conn)
        .await?;

        rows.iter()
            .map(|row| -> Result<ColumnInfo, StorageError> {
                let nullable: String = row.try_get("is_nullable")?;
                Ok(ColumnInfo {
                    name: row.try_get("column_name")?,
                    column_type: row.try_get("column_type")?,
                    nullable: nullable.eq_ignore_ascii_case("YES"),
                    key: row.try_get("column_key")?,
                })
            })
            .collect()
    }

    pub async fn table_indexes(
        &mut self,
        database: &str,
        table: &str,
    ) -> Result<Vec<IndexInfo>, StorageError> {
        let rows = sqlx::query(
            "SELECT CAST(INDEX_NAME AS CHAR) AS index_name,
                    CAST(COLUMN_NAME AS CHAR) AS column_name,
                    CAST(NON_UNIQUE AS SIGNED) AS non_unique
             FROM information_schema.STATISTICS
             WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
             ORDER BY INDEX_NAME, SEQ_IN_INDEX",
        )
        .bind(database)
        .bind(table)
        .fetch_all(&mut *self.conn)
        .await?;

        let mut indexes: Vec<IndexInfo> = Vec::new();
        for row in &rows {
            let name: String = row.try_get("index_name")?;
            let column: String = row.try_get("column_name")?;
            let non_unique: i64 = row.try_get("non_unique")?;
            match indexes.last_mut() {
                Some(last) if last.name == name => last.columns.push(column),
                _ => indexes.push(IndexInfo {
                    name,
                    columns: vec![column],
                    unique: non_unique == 0,
                }),
            }
        }
        Ok(indexes)
    }

    /// Hosts the given user may connect from.
    pub async fn principal_hosts(&mut self, user: &str) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query(
            "SELECT CAST(Host AS CHAR) AS host FROM mysql.user WHERE User = ? ORDER BY Host",
        )
        .bind(user)
        .fetch_all(&mut *self.conn)
        .await?;
        rows.iter().map(|r| r.try_get("host").map_err(StorageError::from)).collect()
    }

    /// Privileges `principal` holds on `database.*`, as reported by
    /// `SHOW GRANTS`.
    pub async fn database_privileges(
        &mut self,
        principal: &Principal,
        database: &str,
    ) -> Result<Vec<String>, StorageError> {
        let sql = format!("SHOW GRANTS FOR {}", principal.account_sql());
        let rows = sqlx::raw_sql(&sql).fetch_all(&mut *self.conn).await?;
        let mut grants = Vec::with_capacity(rows.len());
        for row in &rows {
            let line: String = row.try_get(0)?;
            grants.push(line);
        }
        Ok(privileges_on(&grants, database))
    }

    /// `EXPLAIN` an equality lookup on `column`.
    ///
    /// Sent over the text protocol, so the value is inlined as a literal.
    pub async fn explain_lookup(
        &mut self,
        database: &str,
        table: &str,
        column: &str,
        value: &LookupValue,
    ) -> Result<IndexUsage, StorageError> {
        let literal = match value {
            LookupValue::Int(v) => v.to_string(),
            LookupValue::Text(v) => quote_literal(v),
        };
        let sql = format!(
            "EXPLAIN SELECT {} FROM {}.{} WHERE {} = {literal}",
            quote_ident(TNS_ENTRIES.primary_key),
            quote_ident(database),
            quote_ident(table),
            quote_ident(column)
        );
        let row = sqlx::raw_sql(&sql).fetch_one(&mut *self.conn).await?;
        let possible_keys: Option<String> = row.try_get("possible_keys")?;
        let key: Option<String> = row.try_get("key")?;
        Ok(IndexUsage {
            possible_keys: possible_keys
                .map(|k| k.split(',').map(|s| s.trim().to_owned()).collect())
                .unwrap_or_default(),
            key,
        })
    }

    /// Compare the live server against what `request` would provision.
    pub async fn verify(
        &mut self,
        request: &ProvisionRequest,
    ) -> Result<VerifyReport, StorageError> {
        let table = &TNS_ENTRIES;
        let columns = self.table_columns(&request.database, table.name).await?;
        let indexes = self.table_indexes(&request.database, table.name).await?;
        let admin_hosts = self.principal_hosts(&request.admin.user).await?;
        let app_hosts = self.principal_hosts(&request.app.user).await?;
        let app_privileges = if app_hosts.iter().any(|h| h == request.app.host.as_str()) {
            self.database_privileges(&request.app, &request.database).await?
        } else {
            Vec::new()
        };

        let mut problems = Vec::new();
        check_columns(table, &columns, &mut problems);
        check_indexes(table, &indexes, &mut problems);
        check_hosts(&request.admin, &admin_hosts, true, &mut problems);
        check_hosts(&request.app, &app_hosts, false, &mut problems);
        if !app_hosts.is_empty() {
            check_row_access(&request.app, &request.database, &app_privileges, &mut problems);
        }

        for problem in &problems {
            tracing::warn!(database = %request.database, "{problem}");
        }

        Ok(VerifyReport {
            database: request.database.clone(),
            table: table.name,
            columns,
            indexes,
            admin_hosts,
            app_hosts,
            app_privileges,
            problems,
        })
    }
}

/// `int(11)` and `int` are the same type; MySQL 8.0.19 stopped printing
/// display widths for integer columns.
fn normalize_type(column_type: &str) -> String {
    let lower = column_type.to_ascii_lowercase();
    for int_type in ["tinyint", "smallint", "mediumint", "bigint", "int"] {
        if let Some(rest) = lower.strip_prefix(int_type) {
            if let Some(width_end) = rest.strip_prefix('(').and_then(|r| r.find(')')) {
                return format!("{int_type}{}", &rest[width_end + 2..]);
            }
        }
    }
    lower
}

pub(crate) fn check_columns(table: &TableSpec, live: &[ColumnInfo], problems: &mut Vec<String>) {
    if live.is_empty() {
        problems.push(format!("table {} does not exist", table.name));
        return;
    }
    if live.len() != table.columns.len() {
        problems.push(format!(
            "table {} has {} columns, expected {}",
            table.name,
            live.len(),
            table.columns.len()
        ));
    }
    for (position, (expected, actual)) in table.columns.iter().zip(live).enumerate() {
        if expected.name != actual.name {
            problems.push(format!(
                "column {} is `{}`, expected `{}`",
                position + 1,
                actual.name,
                expected.name
            ));
            continue;
        }
        if normalize_type(&actual.column_type) != expected.reported_type {
            problems.push(format!(
                "column `{}` has type {}, expected {}",
                actual.name, actual.column_type, expected.reported_type
            ));
        }
        if expected.nullable != actual.nullable {
            problems.push(format!(
                "column `{}` nullability is {}, expected {}",
                actual.name, actual.nullable, expected.nullable
            ));
        }
    }
}

pub(crate) fn check_indexes(table: &TableSpec, live: &[IndexInfo], problems: &mut Vec<String>) {
    if live.is_empty() {
        // missing table is already reported by check_columns
        return;
    }
    match live.iter().find(|i| i.name == "PRIMARY") {
        Some(pk) if pk.columns == [table.primary_key] => {},
        Some(pk) => problems.push(format!(
            "primary key covers {:?}, expected [{:?}]",
            pk.columns, table.primary_key
        )),
        None => problems.push(format!("table {} has no primary key", table.name)),
    }
    for expected in table.indexes {
        match live.iter().find(|i| i.name == expected.name) {
            Some(index) => {
                if index.columns != expected.columns {
                    problems.push(format!(
                        "index {} covers {:?}, expected {:?}",
                        expected.name, index.columns, expected.columns
                    ));
                }
                if index.unique != expected.unique {
                    problems.push(format!(
                        "index {} unique={}, expected unique={}",
                        expected.name, index.unique, expected.unique
                    ));
                }
            },
            None => problems.push(format!("index {} is missing", expected.name)),
        }
    }
    for index in live {
        let known = index.name == "PRIMARY" || table.indexes.iter().any(|i| i.name == index.name);
        if !known {
            problems.push(format!("unexpected index {} on {:?}", index.name, index.columns));
        }
    }
}

pub(crate) fn check_hosts(
    principal: &Principal,
    hosts: &[String],
    exclusive: bool,
    problems: &mut Vec<String>,
) {
    let expected = principal.host.as_str();
    if !hosts.iter().any(|h| h == expected) {
        problems.push(format!("account {principal} does not exist"));
    }
    if exclusive {
        for host in hosts.iter().filter(|h| *h != expected) {
            problems.push(format!(
                "account '{}' may also connect from '{host}', expected only '{expected}'",
                principal.user
            ));
        }
    }
}

pub(crate) fn check_row_access(
    principal: &Principal,
    database: &str,
    privileges: &[String],
    problems: &mut Vec<String>,
) {
    for required in PrivilegeSet::ROW_ACCESS_PRIVILEGES {
        let held = privileges.iter().any(|p| p == required || p == "ALL PRIVILEGES");
        if !held {
            problems.push(format!("{principal} lacks {required} on {database}"));
        }
    }
    for privilege in privileges {
        if !PrivilegeSet::ROW_ACCESS_PRIVILEGES.contains(&privilege.as_str()) {
            problems.push(format!(
                "{principal} holds {privilege} on {database}, expected row access only"
            ));
        }
    }
}

/// Extract the privilege list of every `GRANT ... ON `db`.* TO ...` line.
///
/// Matches the wildcard-escaped name the provisioner grants on.
pub(crate) fn privileges_on(grants: &[String], database: &str) -> Vec<String> {
    let target = format!(" ON {}.* TO ", quote_grant_db(database));
    let mut privileges = Vec::new();
    for line in grants {
        let Some(rest) = line.strip_prefix("GRANT ") else { continue };
        let Some(end) = rest.find(&target) else { continue };
        privileges.extend(rest[..end].split(',').map(|p| p.trim().to_owned()));
    }
    privileges
}

#[cfg(test)]
#[path = "inspect_tests.rs"]
mod tests;
