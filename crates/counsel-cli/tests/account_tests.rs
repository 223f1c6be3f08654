//! Integration tests for account and expert commands

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn counsel_cmd(db_dir: &TempDir) -> Command {
    let db_path = db_dir.path().join("test.sqlite");
    let mut cmd = Command::cargo_bin("counsel").unwrap();
    cmd.env("COUNSEL_DB", db_path.to_str().unwrap())
        .env("XDG_CONFIG_HOME", db_dir.path());
    cmd
}

#[test]
fn account_add_and_balance() {
    let db_dir = TempDir::new().unwrap();

    counsel_cmd(&db_dir)
        .args(["account", "add", "alice", "--role", "client", "--credits", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("client account #1"));

    counsel_cmd(&db_dir)
        .args(["account", "balance", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5"));
}

#[test]
fn account_topup_increases_balance() {
    let db_dir = TempDir::new().unwrap();

    counsel_cmd(&db_dir)
        .args(["account", "add", "bob", "--credits", "1"])
        .assert()
        .success();

    counsel_cmd(&db_dir)
        .args(["account", "topup", "1", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5 credits"));
}

#[test]
fn account_balance_unknown_owner_exits_not_found() {
    let db_dir = TempDir::new().unwrap();

    counsel_cmd(&db_dir)
        .args(["account", "balance", "42"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Account not found"));
}

#[test]
fn account_add_rejects_unknown_role() {
    let db_dir = TempDir::new().unwrap();

    counsel_cmd(&db_dir)
        .args(["account", "add", "mallory", "--role", "superuser"])
        .assert()
        .failure()
        .code(3);
}

#[test]
fn expert_add_and_list() {
    let db_dir = TempDir::new().unwrap();

    counsel_cmd(&db_dir)
        .args([
            "expert",
            "add",
            "Dr. Chen",
            "--subject",
            "Leadership",
            "--subject",
            "Business Strategy",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("expert #1"));

    counsel_cmd(&db_dir)
        .args(["expert", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dr. Chen"))
        .stdout(predicate::str::contains("Leadership"));
}

#[test]
fn status_reports_counts() {
    let db_dir = TempDir::new().unwrap();

    counsel_cmd(&db_dir)
        .args(["account", "add", "alice"])
        .assert()
        .success();

    counsel_cmd(&db_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Accounts:    1"))
        .stdout(predicate::str::contains("Queries:     0"));
}

#[test]
fn json_format_is_valid_json() {
    let db_dir = TempDir::new().unwrap();

    counsel_cmd(&db_dir)
        .args(["account", "add", "alice", "--credits", "3"])
        .assert()
        .success();

    let output = counsel_cmd(&db_dir)
        .args(["account", "list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["name"], "alice");
    assert_eq!(parsed[0]["balance"], 3);
}
