use anyhow::{Context, Result, bail};
use sqlx::Connection;
use sqlx::mysql::MySqlConnection;
use tarxiv_core::TarxivConfig;
use tarxiv_storage::{ProvisionRequest, SchemaInspector};

pub(crate) async fn run(config: &TarxivConfig) -> Result<()> {
    let request = ProvisionRequest::from_config(&config.provision);
    request.validate()?;
    let options = super::admin_options(config)?;
    let mut conn = MySqlConnection::connect_with(&options)
        .await
        .context("cannot open administrative connection")?;

    let report = SchemaInspector::new(&mut conn).verify(&request).await?;
    if let Err(e) = conn.close().await {
        tracing::warn!("failed to close connection: {e}");
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.is_ok() {
        bail!("{} verification problem(s) in {}", report.problems.len(), report.database);
    }
    Ok(())
}
