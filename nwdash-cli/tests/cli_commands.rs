//! End-to-end tests for the nwdash binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn nwdash() -> Command {
    let mut cmd = Command::cargo_bin("nwdash").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("NWDASH_CONFIG");
    cmd
}

fn json_output(args: &[&str]) -> serde_json::Value {
    let output = nwdash().args(args).output().unwrap();
    assert!(output.status.success(), "{:?} failed: {:?}", args, output);
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn summary_for_specific_triple() {
    let report = json_output(&[
        "summary",
        "--customer",
        "Customer 1",
        "--data-center",
        "DC 1",
        "--backup-server",
        "Server A",
        "--format",
        "json",
    ]);

    let metrics = &report["summary"]["metrics"];
    assert_eq!(report["summary"]["status"], "data");
    assert_eq!(metrics["nw_server_count"], 5);
    assert_eq!(metrics["storage_node_count"], 3);
    assert_eq!(metrics["domain_count"], 10);
    assert_eq!(metrics["object_count"], 8);
}

#[test]
fn summary_for_customer_rollup_with_breakdown() {
    let report = json_output(&["summary", "--customer", "Customer 1", "--breakdown", "-f", "json"]);

    let metrics = &report["summary"]["metrics"];
    assert_eq!(metrics["nw_server_count"], 14);
    assert_eq!(metrics["storage_node_count"], 7);
    assert_eq!(metrics["domain_count"], 36);
    assert_eq!(metrics["object_count"], 23);
    assert_eq!(report["summary"]["matched"], 4);

    let breakdown = report["breakdown"].as_array().unwrap();
    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[0]["name"], "DC 1");
    assert_eq!(breakdown[1]["name"], "DC 2");
}

#[test]
fn summary_for_missing_triple_reports_no_data() {
    let report = json_output(&[
        "summary",
        "--customer",
        "Customer 2",
        "--data-center",
        "DC 3",
        "--backup-server",
        "Server B",
        "--format",
        "json",
    ]);
    assert_eq!(report["summary"]["status"], "no_data");
    assert!(report["summary"].get("metrics").is_none());

    nwdash()
        .args([
            "summary",
            "--customer",
            "Customer 2",
            "--data-center",
            "DC 3",
            "--backup-server",
            "Server B",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("N/A"))
        .stdout(predicate::str::contains("no stored entry matches"));
}

#[test]
fn summary_table_shows_cards() {
    nwdash()
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Overview for All - All - All"))
        .stdout(predicate::str::contains("NW Server"))
        .stdout(predicate::str::contains("DD's Count"))
        .stdout(predicate::str::contains("Entries: 10"));
}

#[test]
fn options_cascade() {
    let options = json_output(&["options", "--customer", "Customer 3", "--data-center", "DC 2", "-f", "json"]);

    assert_eq!(
        options["data_centers"],
        serde_json::json!(["All", "DC 2", "DC 3"])
    );
    assert_eq!(
        options["backup_servers"],
        serde_json::json!(["All", "Server B", "Server C"])
    );
}

#[test]
fn check_flags_unreachable_entry_without_failing() {
    nwdash()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("not reachable through the catalog"))
        .stdout(predicate::str::contains("Server A"));
}

#[test]
fn job_status_dataset() {
    let report = json_output(&["--job-status", "summary", "-f", "json"]);
    let metrics = &report["summary"]["metrics"];
    assert_eq!(metrics["successful"], 60);
    assert_eq!(metrics["failed"], 25);
    assert_eq!(metrics["running"], 15);
}

#[test]
fn export_prometheus_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.prom");

    nwdash()
        .args(["export", "--customer", "Customer 1", "--format", "prometheus", "--output"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported prometheus summary"));

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("nwdash_summary_value"));
    assert!(text.contains("metric=\"nw_server_count\""));
    assert!(text.contains("nwdash_aggregations_total{component=\"aggregator\"} 1"));
    assert!(text.contains("nwdash_aggregation_outcomes_total{component=\"aggregator\",outcome=\"data\"} 1"));
}

#[test]
fn breakdown_rows_add_up_to_the_overview() {
    let report = json_output(&[
        "summary",
        "--customer",
        "Customer 1",
        "--data-center",
        "DC 2",
        "--breakdown",
        "-f",
        "json",
    ]);
    assert_eq!(report["summary"]["metrics"]["nw_server_count"], 5);

    let breakdown = report["breakdown"].as_array().unwrap();
    let names: Vec<_> = breakdown.iter().map(|child| child["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Server B", "Server C", "Server A"]);
    assert_eq!(breakdown[1]["summary"]["status"], "no_data");

    let total: u64 = breakdown
        .iter()
        .filter_map(|child| child["summary"]["metrics"]["nw_server_count"].as_u64())
        .sum();
    assert_eq!(total, 5);
}

#[test]
fn export_rejects_unknown_format() {
    nwdash()
        .args(["export", "--format", "csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported export format"));
}

#[test]
fn config_file_dataset() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        file,
        r#"
[display]
no_data_label = "unknown"
default_format = "json"

[[dataset.customers]]
name = "Acme"
data_centers = ["East"]

[[dataset.data_centers]]
name = "East"
backup_servers = ["bk-01"]

[[dataset.entries]]
customer = "Acme"
data_center = "East"
backup_server = "bk-01"
metrics = {{ nw_server_count = 1, storage_node_count = 2, object_count = 3, domain_count = 4 }}
"#
    )
    .unwrap();

    let output = nwdash()
        .arg("--config")
        .arg(file.path())
        .arg("summary")
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["metrics"]["domain_count"], 4);

    nwdash()
        .arg("--config")
        .arg(file.path())
        .args(["summary", "--customer", "Acme", "--data-center", "East", "--backup-server", "bk-99", "-f", "table"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown"));
}

#[test]
fn invalid_config_fails() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        file,
        r#"
[dataset]
schema = "counts"

[[dataset.entries]]
customer = "Acme"
data_center = "East"
backup_server = "bk-01"
metrics = {{ failed = 1 }}
"#
    )
    .unwrap();

    nwdash()
        .arg("--config")
        .arg(file.path())
        .args(["dataset", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configured dataset is invalid"));
}

#[test]
fn dataset_show_round_trips_as_toml() {
    let output = nwdash().args(["dataset", "show"]).output().unwrap();
    assert!(output.status.success());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dashboard.toml");
    std::fs::write(&path, &output.stdout).unwrap();

    nwdash()
        .arg("--config")
        .arg(&path)
        .args(["dataset", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries:       10"));
}

#[test]
fn bundled_config_is_consistent() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../config/nwdash.toml");

    nwdash()
        .arg("--config")
        .arg(&path)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("every catalog option has data"));

    let output = nwdash()
        .arg("--config")
        .arg(&path)
        .args(["summary", "--customer", "Customer 1", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["metrics"]["nw_server_count"], 12);
    assert_eq!(report["summary"]["matched"], 4);
}
