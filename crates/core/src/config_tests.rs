use super::*;

const SAMPLE: &str = r#"
log_level: debug
log_dir: /var/log/tarxiv
database:
  host: db.internal
  user: root
  pass: root_pass
provision:
  database: tarxiv
  admin_pass: admin_pass
  app_pass: user_pass
tns:
  id: 142
  type: bot
  name: tarxiv_bot
  site: https://www.wis-tns.org
  api_key: abc123
  email: tns@wis-tns.org
  rate_limit: 5
gmail:
  secrets_file: credentials.json
  token_name: token.json
  scopes:
    - https://www.googleapis.com/auth/gmail.modify
  polling_interval: 5
"#;

#[test]
fn parses_full_sample() {
    let config = TarxivConfig::from_yaml(SAMPLE).unwrap();
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.database.host, "db.internal");
    assert_eq!(config.database.port, DEFAULT_MYSQL_PORT);
    assert_eq!(config.provision.database, "tarxiv");
    assert_eq!(config.provision.admin_user, DEFAULT_ADMIN_USER);
    assert_eq!(config.provision.app_user, DEFAULT_APP_USER);
    assert_eq!(config.provision.admin_pass.expose(), "admin_pass");
    let tns = config.tns.as_ref().unwrap();
    assert_eq!(tns.bot_type, "bot");
    assert_eq!(tns.rate_limit, Some(5));
    assert_eq!(config.gmail.as_ref().unwrap().scopes.len(), 1);
    config.validate().unwrap();
}

#[test]
fn minimal_config_defaults() {
    let raw = r#"
database:
  user: root
provision:
  database: tarxiv
  admin_pass: admin_pass
  app_pass: user_pass
"#;
    let config = TarxivConfig::from_yaml(raw).unwrap();
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.database.host, "localhost");
    assert!(config.tns.is_none());
    assert!(config.gmail.is_none());
    assert!(config.log_file("provision").is_none());
    config.validate().unwrap();
}

#[test]
fn invalid_log_level_is_rejected() {
    let raw = SAMPLE.replace("log_level: debug", "log_level: trace");
    assert!(TarxivConfig::from_yaml(&raw).is_err());
    assert!("warning".parse::<LogLevel>().is_err());
}

#[test]
fn blank_database_name_is_rejected() {
    let raw = SAMPLE.replace("database: tarxiv", "database: ''");
    let config = TarxivConfig::from_yaml(&raw).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("provision.database"), "unexpected error: {err}");
}

#[test]
fn placeholder_secret_is_rejected() {
    let raw = SAMPLE.replace("app_pass: user_pass", "app_pass: password");
    let config = TarxivConfig::from_yaml(&raw).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("placeholder"));
}

#[test]
fn same_admin_and_app_user_is_rejected() {
    let raw = SAMPLE.replace("  database: tarxiv\n", "  database: tarxiv\n  app_user: tarxiv_admin\n");
    let config = TarxivConfig::from_yaml(&raw).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn tns_site_must_be_url() {
    let raw = SAMPLE.replace("https://www.wis-tns.org", "wis-tns.org");
    let config = TarxivConfig::from_yaml(&raw).unwrap();
    assert!(config.validate().unwrap_err().to_string().contains("tns.site"));
}

#[test]
fn log_file_joins_dir() {
    let config = TarxivConfig::from_yaml(SAMPLE).unwrap();
    assert_eq!(
        config.log_file("provision"),
        Some(PathBuf::from("/var/log/tarxiv/provision.log"))
    );
}

#[test]
fn debug_output_hides_secrets() {
    let config = TarxivConfig::from_yaml(SAMPLE).unwrap();
    let debug = format!("{config:?}");
    assert!(!debug.contains("admin_pass\""));
    assert!(!debug.contains("root_pass"));
    assert!(!debug.contains("abc123"));
}

#[test]
fn load_reads_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.yml");
    std::fs::write(&path, SAMPLE).unwrap();
    let config = TarxivConfig::load(&path).unwrap();
    assert_eq!(config.provision.database, "tarxiv");
}

#[test]
fn load_missing_file_is_config_error() {
    let err = TarxivConfig::load("/nonexistent/tarxiv/config.yml").unwrap_err();
    assert!(matches!(err, CoreError::Config(_)));
}

// Only this test sets the TARXIV_*_PASS variables.
#[test]
fn env_overrides_replace_secrets() {
    let mut config = TarxivConfig::from_yaml(SAMPLE).unwrap();
    unsafe {
        std::env::set_var(ENV_DB_PASS, "env-root-secret");
        std::env::set_var(ENV_ADMIN_PASS, "env-admin-secret");
        std::env::set_var(ENV_APP_PASS, "   ");
    }
    config.apply_env_overrides();
    assert_eq!(config.database.pass.expose(), "env-root-secret");
    assert_eq!(config.provision.admin_pass.expose(), "env-admin-secret");
    // blank value leaves the file secret in place
    assert_eq!(config.provision.app_pass.expose(), "user_pass");

    unsafe { std::env::set_var(ENV_APP_PASS, "env-app-secret") };
    config.apply_env_overrides();
    unsafe {
        std::env::remove_var(ENV_DB_PASS);
        std::env::remove_var(ENV_ADMIN_PASS);
        std::env::remove_var(ENV_APP_PASS);
    }
    assert_eq!(config.provision.app_pass.expose(), "env-app-secret");
}
