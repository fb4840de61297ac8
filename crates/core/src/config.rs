//! YAML configuration shared by every tarxiv tool.
//!
//! One file describes the whole deployment. The provisioner consumes the
//! `database` and `provision` sections; `tns` and `gmail` belong to the
//! ingestion services and are only parsed and checked here.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ADMIN_USER, DEFAULT_APP_USER, DEFAULT_MYSQL_HOST, DEFAULT_MYSQL_PORT};
use crate::env_config::env_non_empty;
use crate::error::{CoreError, Result};
use crate::identifier::{validate_identifier, validate_user_name};
use crate::secret::Secret;

pub const ENV_DB_PASS: &str = "TARXIV_DB_PASS";
pub const ENV_ADMIN_PASS: &str = "TARXIV_ADMIN_PASS";
pub const ENV_APP_PASS: &str = "TARXIV_APP_PASS";

/// Log verbosity accepted in `log_level`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            _ => Err(CoreError::Config(format!(
                "invalid logging level `{s}`, expected one of [info, debug]"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TarxivConfig {
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    pub database: DatabaseConfig,
    pub provision: ProvisionConfig,
    #[serde(default)]
    pub tns: Option<TnsConfig>,
    #[serde(default)]
    pub gmail: Option<GmailConfig>,
}

/// Administrative connection to the MySQL server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    #[serde(default)]
    pub pass: Secret,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionConfig {
    #[serde(default)]
    pub database: String,
    #[serde(default = "default_admin_user")]
    pub admin_user: String,
    #[serde(default)]
    pub admin_pass: Secret,
    #[serde(default = "default_app_user")]
    pub app_user: String,
    #[serde(default)]
    pub app_pass: Secret,
    /// Namespace the admin account is granted ALL on, when it differs from
    /// `database`.
    #[serde(default)]
    pub admin_grant_database: Option<String>,
}

/// TNS bot identity used by the ingestion services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TnsConfig {
    pub id: u64,
    #[serde(rename = "type")]
    pub bot_type: String,
    pub name: String,
    pub site: String,
    pub api_key: Secret,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub rate_limit: Option<u64>,
}

/// Gmail credentials used by the notice monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GmailConfig {
    pub secrets_file: PathBuf,
    pub token_name: PathBuf,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub polling_interval: Option<u64>,
}

fn default_host() -> String {
    DEFAULT_MYSQL_HOST.to_owned()
}

const fn default_port() -> u16 {
    DEFAULT_MYSQL_PORT
}

fn default_admin_user() -> String {
    DEFAULT_ADMIN_USER.to_owned()
}

fn default_app_user() -> String {
    DEFAULT_APP_USER.to_owned()
}

impl TarxivConfig {
    /// Read, apply environment overrides and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "reading config");
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut config = Self::from_yaml(&raw)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Replace secrets with `TARXIV_*_PASS` variables when they are set.
    pub fn apply_env_overrides(&mut self) {
        if let Some(pass) = env_non_empty(ENV_DB_PASS) {
            self.database.pass = Secret::new(pass);
        }
        if let Some(pass) = env_non_empty(ENV_ADMIN_PASS) {
            self.provision.admin_pass = Secret::new(pass);
        }
        if let Some(pass) = env_non_empty(ENV_APP_PASS) {
            self.provision.app_pass = Secret::new(pass);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.user.trim().is_empty() {
            return Err(CoreError::Config("database.user must be set".to_owned()));
        }
        self.provision.validate()?;
        if let Some(tns) = &self.tns {
            tns.validate()?;
        }
        if let Some(gmail) = &self.gmail {
            gmail.validate()?;
        }
        Ok(())
    }

    /// Log file for a named command, when `log_dir` is configured.
    #[must_use]
    pub fn log_file(&self, name: &str) -> Option<PathBuf> {
        self.log_dir.as_ref().map(|dir| dir.join(format!("{name}.log")))
    }
}

impl ProvisionConfig {
    pub fn validate(&self) -> Result<()> {
        validate_identifier("provision.database", &self.database)?;
        validate_user_name(&self.admin_user)?;
        validate_user_name(&self.app_user)?;
        if self.admin_user == self.app_user {
            return Err(CoreError::Config(
                "provision.admin_user and provision.app_user must differ".to_owned(),
            ));
        }
        check_secret("provision.admin_pass", &self.admin_pass)?;
        check_secret("provision.app_pass", &self.app_pass)?;
        if let Some(db) = &self.admin_grant_database {
            validate_identifier("provision.admin_grant_database", db)?;
        }
        Ok(())
    }
}

impl TnsConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.site.starts_with("http://") && !self.site.starts_with("https://") {
            return Err(CoreError::Config(format!("tns.site `{}` is not an http(s) URL", self.site)));
        }
        if self.api_key.is_empty() {
            return Err(CoreError::Config("tns.api_key must be set".to_owned()));
        }
        Ok(())
    }
}

impl GmailConfig {
    pub fn validate(&self) -> Result<()> {
        if self.scopes.is_empty() {
            return Err(CoreError::Config("gmail.scopes must list at least one scope".to_owned()));
        }
        Ok(())
    }
}

fn check_secret(field: &str, secret: &Secret) -> Result<()> {
    if secret.is_empty() {
        return Err(CoreError::Config(format!("{field} must be set")));
    }
    if secret.is_placeholder() {
        return Err(CoreError::Config(format!(
            "{field} is still a placeholder value, replace it before provisioning"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
