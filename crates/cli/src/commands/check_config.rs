use anyhow::Result;
use tarxiv_core::TarxivConfig;

/// The config was already loaded and validated by the time this runs.
pub(crate) fn run(config: &TarxivConfig) -> Result<()> {
    tracing::info!(
        database = %config.provision.database,
        tns = config.tns.is_some(),
        gmail = config.gmail.is_some(),
        "config is valid"
    );
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
