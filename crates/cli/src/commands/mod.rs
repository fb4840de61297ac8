use sqlx::mysql::MySqlConnectOptions;
use tarxiv_core::{TarxivConfig, env_non_empty};
use tarxiv_storage::{admin_connect_options, options_from_url};

pub(crate) mod check_config;
pub(crate) mod get;
pub(crate) mod provision;
pub(crate) mod verify;

const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Administrative connection: `DATABASE_URL` if set, else the `database`
/// section of the config.
pub(crate) fn admin_options(config: &TarxivConfig) -> anyhow::Result<MySqlConnectOptions> {
    match env_non_empty(ENV_DATABASE_URL) {
        Some(url) => {
            tracing::debug!("using {ENV_DATABASE_URL} for the administrative connection");
            Ok(options_from_url(&url)?)
        },
        None => Ok(admin_connect_options(&config.database)),
    }
}
