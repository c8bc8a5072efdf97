//! End-to-end runs of the `overunder` binary against a scratch state file.

mod support;

use predicates::prelude::*;
use serde_json::Value;
use support::cli::Workspace;

/// Parse the single JSON line a `--json` invocation prints.
fn json_line(stdout: &[u8]) -> Value {
    let text = String::from_utf8_lossy(stdout);
    let line = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .expect("json output line");
    serde_json::from_str(line).expect("valid json line")
}

fn run_json(ws: &Workspace, at: u64, args: &[&str]) -> Value {
    let output = ws.at(at).arg("--json").args(args).assert().success();
    json_line(&output.get_output().stdout)
}

fn balance(ws: &Workspace, account: &str) -> u64 {
    let line = run_json(ws, 0, &["balance", account]);
    line["payload"]["balance"].as_u64().expect("balance")
}

#[test]
fn help_lists_ledger_commands() {
    let ws = Workspace::new();
    ws.at(0)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("audit"));
}

#[test]
fn version_flag_prints_version() {
    let ws = Workspace::new();
    ws.at(0)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn full_round_persists_between_invocations() {
    let ws = Workspace::new();
    ws.write_config("[ledger]\ntotal_supply = 1000\n");

    ws.at(100).args(["mint", "--caller", "oracle"]).assert().success();
    ws.at(100)
        .args(["transfer", "--caller", "oracle", "alice", "100"])
        .assert()
        .success();
    ws.at(100)
        .args(["transfer", "--caller", "oracle", "bob", "100"])
        .assert()
        .success();

    let created = run_json(
        &ws,
        101,
        &["create", "--caller", "alice", "BTC", "over", "50", "40", "200"],
    );
    assert_eq!(created["type"], "wager");
    assert_eq!(created["payload"]["id"], 1);

    ws.at(102)
        .args(["accept", "--caller", "bob", "1"])
        .assert()
        .success();

    let report = run_json(&ws, 201, &["report", "--caller", "oracle", "BTC", "60"]);
    assert_eq!(report["type"], "report");
    assert_eq!(report["payload"]["settlements"][0]["outcome"], "over");

    assert_eq!(balance(&ws, "alice"), 140);
    assert_eq!(balance(&ws, "bob"), 60);
    assert_eq!(balance(&ws, "oracle"), 800);

    ws.at(202).arg("audit").assert().success();
}

#[test]
fn rejected_call_fails_with_error_code_and_keeps_state() {
    let ws = Workspace::new();
    ws.at(0).args(["mint", "--caller", "oracle"]).assert().success();
    ws.at(0)
        .args(["transfer", "--caller", "oracle", "alice", "5"])
        .assert()
        .success();
    let saved = std::fs::read(ws.state()).unwrap();

    ws.at(1)
        .arg("--json")
        .args(["create", "--caller", "alice", "BTC", "under", "50", "6", "20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("overunder::InsufficientBalance"));

    assert_eq!(std::fs::read(ws.state()).unwrap(), saved);
    assert_eq!(balance(&ws, "alice"), 5);
}

#[test]
fn report_from_non_reporter_is_rejected() {
    let ws = Workspace::new();
    ws.at(0).args(["mint", "--caller", "oracle"]).assert().success();

    ws.at(1)
        .arg("--json")
        .args(["report", "--caller", "mallory", "BTC", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("overunder::InvalidAccount"));
}

#[test]
fn calls_require_a_caller() {
    let ws = Workspace::new();
    ws.at(0)
        .arg("mint")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--caller"));
}

#[test]
fn queries_on_fresh_state_succeed() {
    let ws = Workspace::new();
    let supply = run_json(&ws, 0, &["supply"]);
    assert_eq!(supply["payload"]["total_supply"], 100_000_000);
    assert!(supply["payload"]["reporter"].is_null());

    let symbols = run_json(&ws, 0, &["symbols"]);
    assert_eq!(symbols["payload"], serde_json::json!([]));

    ws.at(0).arg("audit").assert().success();
    assert!(!ws.state().exists());
}

#[test]
fn config_validate_reports_bad_values() {
    let ws = Workspace::new();
    ws.write_config("[accounts]\nmin_len = 4\nmax_len = 2\n");
    ws.at(0)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_len"));
}

#[test]
fn config_validate_accepts_good_file() {
    let ws = Workspace::new();
    ws.write_config("[ledger]\nmax_symbol_len = 12\n");
    ws.at(0).args(["config", "validate"]).assert().success();
}

#[test]
fn malformed_config_is_rejected_before_any_call() {
    let ws = Workspace::new();
    ws.write_config("[ledger\n");
    ws.at(0)
        .args(["mint", "--caller", "oracle"])
        .assert()
        .failure();
    assert!(!ws.state().exists());
}
