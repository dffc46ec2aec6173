//! End-to-end checks of the `donation-admin` binary that never reach a backend.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Nothing listens here; a request that slips through fails fast
const OFFLINE_URL: &str = "http://127.0.0.1:9";

fn write_session(dir: &Path, role: &str, is_admin: bool) -> PathBuf {
    let path = dir.join("session.json");
    let json = format!(
        r#"{{
  "format_version": 1,
  "session": {{
    "token": "header.payload.signature",
    "expires_at": null,
    "is_admin": {is_admin},
    "user": {{ "id": 1, "username": "root", "name": "Root", "role": "{role}" }}
  }}
}}"#
    );
    std::fs::write(&path, json).unwrap();
    path
}

fn admin_cmd(dir: &TempDir, session: &Path) -> Command {
    let mut cmd = Command::cargo_bin("donation-admin").unwrap();
    cmd.env_remove("DONATION_ADMIN_URL")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .arg("--session-file")
        .arg(session)
        .arg("--base-url")
        .arg(OFFLINE_URL);
    cmd
}

#[test]
fn test_help_lists_pages() {
    Command::cargo_bin("donation-admin")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("donations"))
        .stdout(predicate::str::contains("reports"))
        .stdout(predicate::str::contains("login"));
}

#[test]
fn test_commands_need_a_login() {
    let dir = TempDir::new().unwrap();
    let session = dir.path().join("session.json");
    admin_cmd(&dir, &session)
        .args(["users", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please log in first."));
}

#[test]
fn test_whoami_shows_stored_session() {
    let dir = TempDir::new().unwrap();
    let session = write_session(dir.path(), "admin", true);
    admin_cmd(&dir, &session)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Root"))
        .stdout(predicate::str::contains("Admin"))
        .stdout(predicate::str::contains("never"));
}

#[test]
fn test_nav_follows_role() {
    let dir = TempDir::new().unwrap();
    let session = write_session(dir.path(), "user", false);
    admin_cmd(&dir, &session)
        .arg("nav")
        .assert()
        .success()
        .stdout(predicate::str::contains("donations list"))
        .stdout(predicate::str::contains("users list").not());
}

#[test]
fn test_regular_user_cannot_open_reports() {
    let dir = TempDir::new().unwrap();
    let session = write_session(dir.path(), "user", false);
    admin_cmd(&dir, &session)
        .args(["reports", "summary"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("You are not allowed to view reports."));
}

#[test]
fn test_reversed_range_is_rejected_locally() {
    let dir = TempDir::new().unwrap();
    let session = write_session(dir.path(), "admin", true);
    admin_cmd(&dir, &session)
        .args(["reports", "range", "--from", "2024-02-01", "--to", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Start date 2024-02-01 is after end date 2024-01-01",
        ));
}

#[test]
fn test_invalid_amount_is_rejected_locally() {
    let dir = TempDir::new().unwrap();
    let session = write_session(dir.path(), "user", false);
    admin_cmd(&dir, &session)
        .args(["donations", "create", "--amount", "ten"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Amount must be a number"));
}

#[test]
fn test_logout_removes_session_file() {
    let dir = TempDir::new().unwrap();
    let session = write_session(dir.path(), "admin", true);
    admin_cmd(&dir, &session)
        .arg("logout")
        .assert()
        .success()
        .stderr(predicate::str::contains("Logged out"));
    assert!(!session.exists());
}

#[test]
fn test_bad_config_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "user_page_size = 7\n").unwrap();
    let session = dir.path().join("session.json");
    admin_cmd(&dir, &session)
        .arg("nav")
        .assert()
        .failure()
        .stderr(predicate::str::contains("user_page_size"));
}

#[test]
fn test_logout_clears_corrupt_session_file() {
    let dir = TempDir::new().unwrap();
    let session = dir.path().join("session.json");
    std::fs::write(&session, "not json").unwrap();

    admin_cmd(&dir, &session)
        .arg("logout")
        .assert()
        .success()
        .stderr(predicate::str::contains("No session to clear"));
    assert!(!session.exists());

    admin_cmd(&dir, &session)
        .args(["users", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please log in first."));
}
