//! Executing a provisioning plan over one administrative connection.

use serde::Serialize;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{Connection, Row};

use super::plan::{ProvisionPlan, ProvisionRequest, ProvisionStep};
use crate::error::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// The statement changed server state (or may have, for grants).
    Applied,
    /// A create-if-absent step found the object already there.
    AlreadyPresent,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: &'static str,
    pub description: String,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProvisionReport {
    pub database: String,
    pub table: &'static str,
    pub steps: Vec<StepReport>,
}

impl ProvisionReport {
    /// Number of objects that were newly created by this run.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.step, "create_database" | "create_table" | "create_user"))
            .filter(|s| s.outcome == StepOutcome::Applied)
            .count()
    }
}

/// Runs the provisioning batch. No retries and no rollback: the first
/// failing statement ends the run.
#[derive(Debug, Clone)]
pub struct Provisioner {
    plan: ProvisionPlan,
}

impl Provisioner {
    pub fn new(request: &ProvisionRequest) -> Result<Self, StorageError> {
        Ok(Self { plan: ProvisionPlan::from_request(request)? })
    }

    #[must_use]
    pub const fn plan(&self) -> &ProvisionPlan {
        &self.plan
    }

    /// Open one administrative connection, run the batch, close.
    ///
    /// `options` must not select a database; it may not exist yet.
    pub async fn connect_and_run(
        &self,
        options: &MySqlConnectOptions,
    ) -> Result<ProvisionReport, StorageError> {
        let mut conn = MySqlConnection::connect_with(options).await?;
        tracing::info!(database = %self.plan.database(), "connected for provisioning");
        let report = self.run(&mut conn).await;
        if let Err(e) = conn.close().await {
            tracing::warn!("failed to close provisioning connection: {e}");
        }
        report
    }

    pub async fn run(&self, conn: &mut MySqlConnection) -> Result<ProvisionReport, StorageError> {
        let mut steps = Vec::with_capacity(self.plan.steps().len());

        for step in self.plan.steps() {
            let already_present = if step.is_conditional_create() {
                object_exists(conn, step)
                    .await
                    .map_err(|e| StorageError::at_step(step.name(), e))?
            } else {
                false
            };

            tracing::debug!(step = step.name(), sql = %step.redacted_sql(), "executing");
            let sql = step.sql();
            sqlx::raw_sql(&sql)
                .execute(&mut *conn)
                .await
                .map_err(|e| StorageError::at_step(step.name(), e.into()))?;

            let outcome =
                if already_present { StepOutcome::AlreadyPresent } else { StepOutcome::Applied };
            tracing::info!(step = step.name(), ?outcome, "{}", step.describe());
            steps.push(StepReport { step: step.name(), description: step.describe(), outcome });
        }

        let report = ProvisionReport {
            database: self.plan.database().to_owned(),
            table: self.plan.table().name,
            steps,
        };
        tracing::info!(
            database = %report.database,
            created = report.created_count(),
            "provisioning complete"
        );
        Ok(report)
    }
}

/// Whether the object a create-if-absent step targets already exists.
async fn object_exists(
    conn: &mut MySqlConnection,
    step: &ProvisionStep,
) -> Result<bool, StorageError> {
    let row = match step {
        ProvisionStep::CreateDatabase { database } => {
            sqlx::query(
                "SELECT COUNT(*) AS n FROM information_schema.SCHEMATA WHERE SCHEMA_NAME = ?",
            )
            .bind(database)
            .fetch_one(&mut *conn)
            .await?
        },
        ProvisionStep::CreateTable { table } => {
            sqlx::query(
                "SELECT COUNT(*) AS n FROM information_schema.TABLES
                 WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?",
            )
            .bind(table.name)
            .fetch_one(&mut *conn)
            .await?
        },
        ProvisionStep::CreateUser { principal, .. } => {
            sqlx::query("SELECT COUNT(*) AS n FROM mysql.user WHERE User = ? AND Host = ?")
                .bind(&principal.user)
                .bind(principal.host.as_str())
                .fetch_one(&mut *conn)
                .await?
        },
        _ => return Ok(false),
    };
    let count: i64 = row.try_get("n")?;
    Ok(count > 0)
}
