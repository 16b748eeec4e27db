#![cfg(unix)]

mod common;

use assert_cmd::prelude::*;
use common::{make_config, provisio, write};
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn seed(root: &std::path::Path, extra: &str) {
    write(root, "config.toml", make_config(root, extra));
    write(root, "templates/billing/01_dataset.sql", "create schema {dataset};\n");
    write(root, "templates/billing/02_grants.sql", "grant usage on {dataset} to {role};\n");
    write(root, "templates/analytics/views.sql", "create view {schema}.v as select 1;\n");
    write(
        root,
        "answers.json",
        r#"{"macros": {
            "billing": {"dataset": "finance", "role": "reader"},
            "analytics": {"schema": "bi"}
        }}"#,
    );
}

#[test]
fn provision_writes_one_script_per_namespace() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    seed(root, "");

    provisio(&root.join("config.toml"))
        .arg("--batch")
        .arg("provision")
        .arg("--answers")
        .arg(root.join("answers.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("billing.sh"))
        .stdout(predicate::str::contains("analytics.sh"));

    let billing = fs::read_to_string(root.join("scripts/billing.sh")).unwrap();
    assert!(billing.starts_with("#!/usr/bin/env bash\nset -euo pipefail\n"));
    assert!(billing.contains("# 01_dataset.sql\ncat <<'PROVISIO_QUERY'\ncreate schema finance;\n"));
    assert!(billing.contains("grant usage on finance to reader;"));
    assert!(billing.find("01_dataset.sql").unwrap() < billing.find("02_grants.sql").unwrap());

    let analytics = fs::read_to_string(root.join("scripts/analytics.sh")).unwrap();
    assert!(analytics.contains("create view bi.v as select 1;"));
}

#[test]
fn provision_only_limits_to_one_namespace() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    seed(root, "");

    provisio(&root.join("config.toml"))
        .arg("--batch")
        .arg("provision")
        .args(["--only", "analytics"])
        .arg("--out-dir")
        .arg(root.join("custom"))
        .arg("--answers")
        .arg(root.join("answers.json"))
        .assert()
        .success();

    assert!(root.join("custom/analytics.sh").exists());
    assert!(!root.join("custom/billing.sh").exists());
}

#[test]
fn provision_unknown_namespace_fails() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    seed(root, "");

    provisio(&root.join("config.toml"))
        .args(["--batch", "provision", "--only", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("namespace 'missing' not found"));
}

#[test]
fn provision_run_executes_scripts_and_saves_answers() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    seed(root, "");
    write(
        root,
        "config.toml",
        make_config(root, "").replace(
            "query_command = \"cat\"",
            "query_command = \"cat\"\nenvironments = [\"staging\", \"prod\"]",
        ),
    );

    provisio(&root.join("config.toml"))
        .arg("--batch")
        .arg("provision")
        .args(["--only", "billing", "--run"])
        .arg("--answers")
        .arg(root.join("answers.json"))
        .arg("--save-answers")
        .arg(root.join("saved.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("create schema finance;"))
        .stdout(predicate::str::contains("grant usage on finance to reader;"));

    let script = fs::read_to_string(root.join("scripts/billing.sh")).unwrap();
    assert!(script.contains("export PROVISIO_ENV='staging'"));

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.join("saved.json")).unwrap()).unwrap();
    assert_eq!(saved["environment"], "staging");
    assert_eq!(saved["run"], true);
    assert_eq!(saved["macros"]["billing"]["dataset"], "finance");
}

#[test]
fn provision_run_propagates_script_failure() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    seed(root, "");
    write(
        root,
        "config.toml",
        make_config(root, "").replace("query_command = \"cat\"", "query_command = \"false\""),
    );

    provisio(&root.join("config.toml"))
        .arg("--batch")
        .arg("provision")
        .args(["--only", "analytics", "--run"])
        .arg("--answers")
        .arg(root.join("answers.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("analytics.sh exited with 1"));
}

#[test]
fn provision_missing_answer_in_batch_mode_fails() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    seed(root, "");

    provisio(&root.join("config.toml"))
        .args(["--batch", "provision", "--only", "billing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no answer available for 'dataset'"));
}
