#![allow(clippy::unwrap_used, reason = "test code")]

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const ADMIN_SECRET: &str = "adm-S3cret-value";
const APP_SECRET: &str = "app-S3cret-value";

fn write_config(extra: &str, admin_pass: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "log_level: info
{extra}
database:
  host: localhost
  user: root
  pass: root-pass
provision:
  database: tarxiv
  admin_pass: {admin_pass}
  app_pass: {APP_SECRET}
"
    )
    .unwrap();
    file
}

fn tarxiv() -> Command {
    let mut cmd = Command::cargo_bin("tarxiv").unwrap();
    cmd.env_remove("TARXIV_DB_PASS")
        .env_remove("TARXIV_ADMIN_PASS")
        .env_remove("TARXIV_APP_PASS")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    tarxiv()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Provision and inspect the TarXiv MySQL schema"));
}

#[test]
fn test_cli_get_requires_a_key() {
    let config = write_config("", ADMIN_SECRET);
    tarxiv().arg("get").arg("-c").arg(config.path()).assert().failure().code(2);
}

#[test]
fn test_cli_plan_prints_redacted_statements() {
    let config = write_config("", ADMIN_SECRET);
    tarxiv()
        .arg("plan")
        .arg("--config")
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE DATABASE IF NOT EXISTS `tarxiv`;"))
        .stdout(predicate::str::contains(
            "CREATE USER IF NOT EXISTS 'tarxiv_admin'@'localhost' IDENTIFIED BY '********';",
        ))
        .stdout(predicate::str::contains(
            "GRANT SELECT, UPDATE, DELETE, INSERT ON `tarxiv`.* TO 'tarxiv'@'%';",
        ))
        .stdout(predicate::str::ends_with("FLUSH PRIVILEGES;\n"))
        .stdout(predicate::str::contains(ADMIN_SECRET).not())
        .stdout(predicate::str::contains(APP_SECRET).not());
}

#[test]
fn test_cli_plan_json_lists_steps() {
    let config = write_config("", ADMIN_SECRET);
    let output = tarxiv()
        .arg("plan")
        .arg("-c")
        .arg(config.path())
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());
    let steps: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let steps = steps.as_array().unwrap();
    assert_eq!(steps.len(), 8);
    assert_eq!(steps[0]["step"], "create_database");
    assert_eq!(steps[7]["sql"], "FLUSH PRIVILEGES");
    assert!(!String::from_utf8_lossy(&output.stdout).contains(ADMIN_SECRET));
}

#[test]
fn test_cli_plan_uses_env_secret_override() {
    let config = write_config("", "changeme");
    tarxiv().arg("plan").arg("-c").arg(config.path()).assert().failure();
    tarxiv()
        .env("TARXIV_ADMIN_PASS", "from-env-secret")
        .arg("plan")
        .arg("-c")
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("IDENTIFIED BY '********'"))
        .stdout(predicate::str::contains("from-env-secret").not());
}

#[test]
fn test_cli_blank_env_secret_is_ignored() {
    let config = write_config("", "changeme");
    tarxiv()
        .env("TARXIV_ADMIN_PASS", "  ")
        .arg("plan")
        .arg("-c")
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("placeholder"));
}

#[test]
fn test_cli_check_config_redacts_secrets() {
    let config = write_config("", ADMIN_SECRET);
    tarxiv()
        .arg("check-config")
        .arg("-c")
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"database\": \"tarxiv\""))
        .stdout(predicate::str::contains("\"admin_pass\": \"********\""))
        .stdout(predicate::str::contains(ADMIN_SECRET).not())
        .stdout(predicate::str::contains("root-pass").not());
}

#[test]
fn test_cli_check_config_writes_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");
    let config = write_config(&format!("log_dir: {}", log_dir.display()), ADMIN_SECRET);
    tarxiv().arg("check-config").arg("-c").arg(config.path()).assert().success();

    let log = std::fs::read_to_string(log_dir.join("check-config.log")).unwrap();
    assert!(log.contains("config is valid"), "{log}");
    assert!(!log.contains(ADMIN_SECRET));
}

#[test]
fn test_cli_rejects_placeholder_secret() {
    let config = write_config("", "changeme");
    tarxiv()
        .arg("plan")
        .arg("-c")
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("placeholder"));
}

#[test]
fn test_cli_rejects_unknown_log_level() {
    let config = write_config("", ADMIN_SECRET);
    let raw = std::fs::read_to_string(config.path()).unwrap().replace("info", "verbose");
    std::fs::write(config.path(), raw).unwrap();
    tarxiv()
        .arg("check-config")
        .arg("-c")
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn test_cli_missing_config_fails() {
    tarxiv()
        .arg("check-config")
        .arg("-c")
        .arg("/nonexistent/tarxiv.yml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}
