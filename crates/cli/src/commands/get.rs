use anyhow::{Context, Result};
use tarxiv_core::TarxivConfig;
use tarxiv_storage::{MySqlStorage, TnsEntryStore, app_connect_options};

pub(crate) async fn run(
    config: &TarxivConfig,
    objid: Option<i32>,
    name: Option<String>,
) -> Result<()> {
    let storage = MySqlStorage::new(app_connect_options(config))
        .await
        .context("cannot connect as the general-use account")?;

    let entries = match (objid, name) {
        (Some(objid), _) => storage.get_by_objid(objid).await?.into_iter().collect(),
        (None, Some(name)) => storage.get_by_name(&name).await?,
        (None, None) => Vec::new(),
    };
    storage.close().await;

    if entries.is_empty() {
        eprintln!("No matching entries");
    }
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
