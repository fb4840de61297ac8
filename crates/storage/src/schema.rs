//! Column layout of `tns_entries`.
//!
//! The layout lives here as data so the provisioner renders the DDL from
//! it and the verifier compares the live table against the same source.

use tarxiv_core::{NAME_INDEX, TNS_ENTRIES_TABLE};

use crate::sql::quote_ident;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    /// Type as written in the DDL.
    pub sql_type: &'static str,
    /// Type as reported by `information_schema.COLUMNS.COLUMN_TYPE`.
    pub reported_type: &'static str,
    pub nullable: bool,
}

const fn column(
    name: &'static str,
    sql_type: &'static str,
    reported_type: &'static str,
) -> ColumnSpec {
    ColumnSpec { name, sql_type, reported_type, nullable: true }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub unique: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [ColumnSpec],
    pub primary_key: &'static str,
    pub indexes: &'static [IndexSpec],
}

/// Every column of `tns_entries`, in table order.
pub const TNS_ENTRY_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec { name: "objid", sql_type: "INT", reported_type: "int", nullable: false },
    column("name", "VARCHAR(64)", "varchar(64)"),
    column("ra", "VARCHAR(16)", "varchar(16)"),
    column("radeg", "DOUBLE", "double"),
    column("dec", "VARCHAR(16)", "varchar(16)"),
    column("decdeg", "DOUBLE", "double"),
    column("object_type", "VARCHAR(16)", "varchar(16)"),
    column("host_name", "VARCHAR(64)", "varchar(64)"),
    column("host_redshift", "DOUBLE", "double"),
    column("reporting_groups", "VARCHAR(256)", "varchar(256)"),
    column("discovery_data_sources", "VARCHAR(256)", "varchar(256)"),
    column("classifying_groups", "VARCHAR(256)", "varchar(256)"),
    column("internal_names", "VARCHAR(128)", "varchar(128)"),
    column("public", "VARCHAR(4)", "varchar(4)"),
    column("spectra_count", "INT", "int"),
    column("discovery_mag", "DOUBLE", "double"),
    column("discovery_filter", "DOUBLE", "double"),
    column("discovery_date", "DATETIME", "datetime"),
    column("sender", "VARCHAR(64)", "varchar(64)"),
];

pub const TNS_ENTRIES: TableSpec = TableSpec {
    name: TNS_ENTRIES_TABLE,
    columns: TNS_ENTRY_COLUMNS,
    primary_key: "objid",
    indexes: &[IndexSpec { name: NAME_INDEX, columns: &["name"], unique: false }],
};

impl TableSpec {
    /// Comma-separated, quoted column list in table order.
    #[must_use]
    pub fn column_list(&self) -> String {
        self.columns.iter().map(|c| quote_ident(c.name)).collect::<Vec<_>>().join(", ")
    }

    /// `CREATE TABLE IF NOT EXISTS` for the active database.
    #[must_use]
    pub fn create_sql(&self) -> String {
        let mut lines: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                let null = if c.nullable { "NULL" } else { "NOT NULL" };
                format!("    {} {} {null}", quote_ident(c.name), c.sql_type)
            })
            .collect();
        lines.push(format!("    PRIMARY KEY ({})", quote_ident(self.primary_key)));
        for index in self.indexes {
            let columns =
                index.columns.iter().map(|c| quote_ident(c)).collect::<Vec<_>>().join(", ");
            let kind = if index.unique { "UNIQUE KEY" } else { "KEY" };
            lines.push(format!("    {kind} {} ({columns})", quote_ident(index.name)));
        }
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
            quote_ident(self.name),
            lines.join(",\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tns_entries_has_nineteen_columns() {
        assert_eq!(TNS_ENTRIES.columns.len(), 19);
        assert_eq!(TNS_ENTRIES.columns[0].name, "objid");
        assert!(!TNS_ENTRIES.columns[0].nullable);
        assert!(TNS_ENTRIES.columns[1..].iter().all(|c| c.nullable));
    }

    #[test]
    fn create_sql_is_conditional_and_keyed() {
        let sql = TNS_ENTRIES.create_sql();
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS `tns_entries` ("));
        assert!(sql.contains("PRIMARY KEY (`objid`)"));
        assert!(sql.contains("KEY `name_idx` (`name`)"));
        assert!(!sql.contains("UNIQUE KEY"));
        assert!(!sql.contains("FOREIGN KEY"));
    }

    #[test]
    fn reserved_column_names_are_quoted() {
        let sql = TNS_ENTRIES.create_sql();
        assert!(sql.contains("`dec` VARCHAR(16) NULL"));
        assert!(sql.contains("`public` VARCHAR(4) NULL"));
    }

    #[test]
    fn column_list_is_in_table_order() {
        let list = TNS_ENTRIES.column_list();
        assert!(list.starts_with("`objid`, `name`, `ra`, `radeg`, `dec`"));
        assert!(list.ends_with("`discovery_date`, `sender`"));
    }
}
