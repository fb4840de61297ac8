//! Building the ordered list of provisioning statements.

use serde::Serialize;
use tarxiv_core::{ProvisionConfig, Secret, validate_identifier, validate_user_name};

use super::principal::{Principal, PrivilegeSet};
use crate::error::StorageError;
use crate::schema::{TNS_ENTRIES, TableSpec};
use crate::sql::{quote_grant_db, quote_ident, quote_literal};

/// Everything the operator must supply before provisioning.
#[derive(Debug, Clone)]
pub struct ProvisionRequest {
    pub database: String,
    pub admin: Principal,
    pub admin_secret: Secret,
    pub app: Principal,
    pub app_secret: Secret,
    /// Namespace for the admin grant when it is not `database`.
    pub admin_grant_database: Option<String>,
}

impl ProvisionRequest {
    pub fn new(
        database: impl Into<String>,
        admin_user: impl Into<String>,
        admin_secret: impl Into<Secret>,
        app_user: impl Into<String>,
        app_secret: impl Into<Secret>,
    ) -> Self {
        Self {
            database: database.into(),
            admin: Principal::admin(admin_user),
            admin_secret: admin_secret.into(),
            app: Principal::app(app_user),
            app_secret: app_secret.into(),
            admin_grant_database: None,
        }
    }

    #[must_use]
    pub fn with_admin_grant_database(mut self, database: impl Into<String>) -> Self {
        self.admin_grant_database = Some(database.into());
        self
    }

    #[must_use]
    pub fn from_config(config: &ProvisionConfig) -> Self {
        Self {
            database: config.database.clone(),
            admin: Principal::admin(config.admin_user.clone()),
            admin_secret: config.admin_pass.clone(),
            app: Principal::app(config.app_user.clone()),
            app_secret: config.app_pass.clone(),
            admin_grant_database: config.admin_grant_database.clone(),
        }
    }

    /// Database the admin account receives ALL PRIVILEGES on.
    #[must_use]
    pub fn admin_grant_database(&self) -> &str {
        self.admin_grant_database.as_deref().unwrap_or(&self.database)
    }

    pub fn validate(&self) -> Result<(), StorageError> {
        validate_identifier("database", &self.database)?;
        validate_identifier("admin grant database", self.admin_grant_database())?;
        validate_user_name(&self.admin.user)?;
        validate_user_name(&self.app.user)?;
        if self.admin.user == self.app.user {
            return Err(StorageError::InvalidInput(format!(
                "admin and general accounts must differ, both are `{}`",
                self.admin.user
            )));
        }
        for (label, secret) in [("admin", &self.admin_secret), ("general", &self.app_secret)] {
            if secret.is_empty() {
                return Err(StorageError::InvalidInput(format!("{label} secret is empty")));
            }
            if secret.is_placeholder() {
                return Err(StorageError::InvalidInput(format!(
                    "{label} secret is a placeholder value"
                )));
            }
        }
        Ok(())
    }
}

/// One statement of the provisioning batch.
#[derive(Debug, Clone)]
pub enum ProvisionStep {
    CreateDatabase { database: String },
    UseDatabase { database: String },
    CreateTable { table: &'static TableSpec },
    CreateUser { principal: Principal, secret: Secret },
    GrantPrivileges { principal: Principal, privileges: PrivilegeSet, database: String },
    FlushPrivileges,
}

impl ProvisionStep {
    /// Stable label used in logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match *self {
            Self::CreateDatabase { .. } => "create_database",
            Self::UseDatabase { .. } => "use_database",
            Self::CreateTable { .. } => "create_table",
            Self::CreateUser { .. } => "create_user",
            Self::GrantPrivileges { .. } => "grant_privileges",
            Self::FlushPrivileges => "flush_privileges",
        }
    }

    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::CreateDatabase { database } => format!("ensure database {database}"),
            Self::UseDatabase { database } => format!("select database {database}"),
            Self::CreateTable { table } => format!("ensure table {}", table.name),
            Self::CreateUser { principal, .. } => format!("ensure account {principal}"),
            Self::GrantPrivileges { principal, privileges, database } => {
                format!("grant {} on {database}.* to {principal}", privileges.sql())
            },
            Self::FlushPrivileges => "reload privilege tables".to_owned(),
        }
    }

    /// Whether the step creates an object that may already exist.
    #[must_use]
    pub const fn is_conditional_create(&self) -> bool {
        matches!(
            *self,
            Self::CreateDatabase { .. } | Self::CreateTable { .. } | Self::CreateUser { .. }
        )
    }

    /// Statement text, secrets included.
    #[must_use]
    pub fn sql(&self) -> String {
        self.render(false)
    }

    /// Statement text with every secret replaced by `********`.
    #[must_use]
    pub fn redacted_sql(&self) -> String {
        self.render(true)
    }

    fn render(&self, redact: bool) -> String {
        match self {
            Self::CreateDatabase { database } => {
                format!("CREATE DATABASE IF NOT EXISTS {}", quote_ident(database))
            },
            Self::UseDatabase { database } => format!("USE {}", quote_ident(database)),
            Self::CreateTable { table } => table.create_sql(),
            Self::CreateUser { principal, secret } => {
                let password = if redact {
                    quote_literal(Secret::redacted())
                } else {
                    quote_literal(secret.expose())
                };
                format!(
                    "CREATE USER IF NOT EXISTS {} IDENTIFIED BY {password}",
                    principal.account_sql()
                )
            },
            Self::GrantPrivileges { principal, privileges, database } => format!(
                "GRANT {} ON {}.* TO {}",
                privileges.sql(),
                quote_grant_db(database),
                principal.account_sql()
            ),
            Self::FlushPrivileges => "FLUSH PRIVILEGES".to_owned(),
        }
    }
}

/// Summary of one step for dry runs.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedStep {
    pub step: &'static str,
    pub description: String,
    pub sql: String,
}

/// Ordered, validated provisioning batch.
#[derive(Debug, Clone)]
pub struct ProvisionPlan {
    database: String,
    table: &'static TableSpec,
    steps: Vec<ProvisionStep>,
}

impl ProvisionPlan {
    pub fn from_request(request: &ProvisionRequest) -> Result<Self, StorageError> {
        request.validate()?;
        let admin_grant_database = request.admin_grant_database();
        if admin_grant_database != request.database {
            tracing::warn!(
                database = %request.database,
                admin_grant_database,
                "admin account is granted on a different database than the one provisioned"
            );
        }

        let steps = vec![
            ProvisionStep::CreateDatabase { database: request.database.clone() },
            ProvisionStep::UseDatabase { database: request.database.clone() },
            ProvisionStep::CreateTable { table: &TNS_ENTRIES },
            ProvisionStep::CreateUser {
                principal: request.admin.clone(),
                secret: request.admin_secret.clone(),
            },
            ProvisionStep::CreateUser {
                principal: request.app.clone(),
                secret: request.app_secret.clone(),
            },
            ProvisionStep::GrantPrivileges {
                principal: request.admin.clone(),
                privileges: PrivilegeSet::All,
                database: admin_grant_database.to_owned(),
            },
            ProvisionStep::GrantPrivileges {
                principal: request.app.clone(),
                privileges: PrivilegeSet::RowAccess,
                database: request.database.clone(),
            },
            ProvisionStep::FlushPrivileges,
        ];

        Ok(Self { database: request.database.clone(), table: &TNS_ENTRIES, steps })
    }

    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    #[must_use]
    pub const fn table(&self) -> &'static TableSpec {
        self.table
    }

    #[must_use]
    pub fn steps(&self) -> &[ProvisionStep] {
        &self.steps
    }

    /// Redacted SQL script, one statement per entry, for dry runs.
    #[must_use]
    pub fn planned_steps(&self) -> Vec<PlannedStep> {
        self.steps
            .iter()
            .map(|s| PlannedStep {
                step: s.name(),
                description: s.describe(),
                sql: s.redacted_sql(),
            })
            .collect()
    }

    /// Redacted script as one `;`-terminated text block.
    #[must_use]
    pub fn redacted_script(&self) -> String {
        self.steps.iter().map(|s| format!("{};\n", s.redacted_sql())).collect()
    }
}
