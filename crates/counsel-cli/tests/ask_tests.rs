//! Integration tests for the ask flow.
//!
//! The LLM URL points at an unroutable local port, so generation and
//! embedding fail fast and the degraded path is exercised end-to-end.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn counsel_cmd(dir: &TempDir) -> Command {
    let db_path = dir.path().join("test.sqlite");
    let mut cmd = Command::cargo_bin("counsel").unwrap();
    cmd.env("COUNSEL_DB", db_path.to_str().unwrap())
        .env("XDG_CONFIG_HOME", dir.path())
        .env("COUNSEL_LLM_URL", "http://127.0.0.1:1");
    cmd
}

fn seed(dir: &TempDir, credits: i64) {
    counsel_cmd(dir)
        .args([
            "account",
            "add",
            "alice",
            "--role",
            "client",
            "--credits",
            &credits.to_string(),
        ])
        .assert()
        .success();

    counsel_cmd(dir)
        .args(["expert", "add", "Dr. Chen", "--subject", "Leadership"])
        .assert()
        .success();
}

#[test]
fn unreachable_endpoint_serves_degraded_answer_and_spends_credit() {
    let dir = TempDir::new().unwrap();
    seed(&dir, 1);

    counsel_cmd(&dir)
        .args([
            "ask",
            "--requester",
            "1",
            "--expert",
            "1",
            "--subject",
            "Leadership",
            "How do I delegate effectively?",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("degraded"))
        .stdout(predicate::str::contains("Based on leadership best practices"))
        .stdout(predicate::str::contains("balance: 0"));

    counsel_cmd(&dir)
        .args(["account", "balance", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0"));
}

#[test]
fn insufficient_credit_rejects_and_persists_nothing() {
    let dir = TempDir::new().unwrap();
    seed(&dir, 0);

    counsel_cmd(&dir)
        .args([
            "ask",
            "--requester",
            "1",
            "--expert",
            "1",
            "--subject",
            "Leadership",
            "How do I delegate effectively?",
        ])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Insufficient credit"));

    counsel_cmd(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Queries:     0"));
}

#[test]
fn expert_role_asks_without_credits() {
    let dir = TempDir::new().unwrap();

    counsel_cmd(&dir)
        .args(["account", "add", "mentor", "--role", "expert"])
        .assert()
        .success();
    counsel_cmd(&dir)
        .args(["expert", "add", "Dr. Chen", "--subject", "Technology"])
        .assert()
        .success();

    counsel_cmd(&dir)
        .args([
            "ask",
            "--requester",
            "1",
            "--expert",
            "1",
            "--subject",
            "Technology",
            "What stack should we pick?",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("credits spent: 0"));
}

#[test]
fn degraded_queries_show_in_history_and_analytics() {
    let dir = TempDir::new().unwrap();
    seed(&dir, 2);

    counsel_cmd(&dir)
        .args([
            "ask",
            "--requester",
            "1",
            "--expert",
            "1",
            "--subject",
            "Leadership",
            "How do I delegate effectively?",
        ])
        .assert()
        .success();

    counsel_cmd(&dir)
        .args(["history", "--requester", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[degraded]"))
        .stdout(predicate::str::contains("How do I delegate effectively?"));

    counsel_cmd(&dir)
        .arg("analytics")
        .assert()
        .success()
        .stdout(predicate::str::contains("Degraded answers: 1"))
        .stdout(predicate::str::contains("Leadership"));
}

#[test]
fn json_output_reports_outcome_and_api_counters() {
    let dir = TempDir::new().unwrap();
    seed(&dir, 1);

    let output = counsel_cmd(&dir)
        .args([
            "ask",
            "--requester",
            "1",
            "--expert",
            "1",
            "--subject",
            "Leadership",
            "How do I delegate effectively?",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["degraded"], true);
    assert_eq!(value["stats"]["degraded"], 1);
    assert_eq!(value["stats"]["answered"], 0);
    // Chat and embedding both hit the unreachable endpoint.
    assert!(value["api"]["total_errors"].as_u64().unwrap() >= 2);
    assert!(
        value["api"]["total_requests"].as_u64().unwrap()
            >= value["api"]["total_errors"].as_u64().unwrap()
    );
}

#[test]
fn blank_question_is_invalid_input() {
    let dir = TempDir::new().unwrap();
    seed(&dir, 1);

    counsel_cmd(&dir)
        .args([
            "ask",
            "--requester",
            "1",
            "--expert",
            "1",
            "--subject",
            "Leadership",
            "   ",
        ])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("question must not be empty"));
}
