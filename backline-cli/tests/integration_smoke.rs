//! Smoke tests for the `backline` binary. None of these need a database.

use assert_cmd::Command;
use predicates::prelude::*;

fn backline(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("backline").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("DATABASE_URL")
        .env_remove("BACKLINE_BIND")
        .env_remove("BACKLINE_MAX_CONNECTIONS")
        .env_remove("BACKLINE_ACQUIRE_TIMEOUT_SECS")
        .env_remove("BACKLINE_CORS_PERMISSIVE");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let dir = tempfile::tempdir().unwrap();
    backline(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn serve_help_shows_flags() {
    let dir = tempfile::tempdir().unwrap();
    backline(&dir)
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--bind"))
        .stdout(predicate::str::contains("--database-url"))
        .stdout(predicate::str::contains("--migrate"));
}

#[test]
fn completions_bash() {
    let dir = tempfile::tempdir().unwrap();
    backline(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("backline"));
}

#[test]
fn check_without_database_url_fails() {
    let dir = tempfile::tempdir().unwrap();
    backline(&dir)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL"));
}

#[test]
fn check_rejects_non_postgres_url() {
    let dir = tempfile::tempdir().unwrap();
    backline(&dir)
        .args(["check", "--database-url", "mysql://user@localhost/music"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid database configuration"));
}

#[test]
fn malformed_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("backline.toml"), "[database\nurl = ").unwrap();
    backline(&dir)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
