//! Connection options derived from the tarxiv config.

use std::str::FromStr;

use sqlx::mysql::MySqlConnectOptions;
use tarxiv_core::{DatabaseConfig, TarxivConfig};

use crate::error::StorageError;

/// Administrative connection with no database selected; the target
/// database may not exist yet.
#[must_use]
pub fn admin_connect_options(config: &DatabaseConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(config.pass.expose())
}

/// General-use account connected to the provisioned database.
#[must_use]
pub fn app_connect_options(config: &TarxivConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.database.host)
        .port(config.database.port)
        .username(&config.provision.app_user)
        .password(config.provision.app_pass.expose())
        .database(&config.provision.database)
}

/// Parse a `mysql://` URL, e.g. from `DATABASE_URL`.
pub fn options_from_url(url: &str) -> Result<MySqlConnectOptions, StorageError> {
    MySqlConnectOptions::from_str(url).map_err(StorageError::from)
}
