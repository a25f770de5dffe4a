use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

fn flavor_sim(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_flavor-sim"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn flavor-sim")
}

fn read_report(path: &Path) -> Value {
    let bytes = fs::read(path).expect("read report");
    serde_json::from_slice(&bytes).expect("report json")
}

#[test]
fn default_run_writes_supported_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = flavor_sim(&[], dir.path());
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("SUPPORTED"));

    let report = read_report(&dir.path().join("flavor_report.json"));
    assert_eq!(report["verdict"]["status"], "supported");
    assert_eq!(report["verdict"]["fail_count"], 1);
    assert_eq!(report["verdict"]["failing"][0], "Weinberg");
    assert_eq!(report["comparisons"].as_array().map(Vec::len), Some(9));
    assert_eq!(report["provenance"]["table_version"], "pdg-2024");
    assert!(report["analysis_hash"].as_str().is_some_and(|hash| hash.len() == 64));
}

#[test]
fn repeated_runs_are_byte_identical() {
    let dir = tempfile::tempdir().expect("tempdir");
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    for path in [&first, &second] {
        let out = path.to_str().expect("utf8 path");
        let output = flavor_sim(&["evaluate", "--quiet", "--out", out], dir.path());
        assert!(output.status.success());
    }
    assert_eq!(fs::read(&first).expect("first"), fs::read(&second).expect("second"));
}

#[test]
fn csv_export_lists_every_parameter() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = flavor_sim(
        &["evaluate", "--quiet", "--out", "out/report.json", "--csv", "out/table.csv"],
        dir.path(),
    );
    assert!(output.status.success());
    let csv = fs::read_to_string(dir.path().join("out/table.csv")).expect("csv");
    let mut lines = csv.lines();
    assert!(lines.next().is_some_and(|header| header.starts_with("parameter,sector,")));
    assert_eq!(lines.count(), 9);
    assert!(dir.path().join("out/report.json").exists());
}

#[test]
fn active_juno_window_falsifies() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("juno.yaml"),
        r#"
windows:
  - experiment: JUNO
    parameter: PMNS_theta12
    interval: { min: 0.304, max: 0.311 }
    active: true
    measurement: { central: 0.295, uncertainty: 0.013 }
"#,
    )
    .expect("write policy");
    let output = flavor_sim(&["evaluate", "--quiet", "--policy", "juno.yaml"], dir.path());
    assert!(output.status.success());

    let report = read_report(&dir.path().join("flavor_report.json"));
    assert_eq!(report["verdict"]["status"], "falsified");
    let failing = report["verdict"]["failing"].as_array().expect("failing");
    assert!(failing.iter().any(|id| id == "PMNS_theta12"));
    assert!(failing.iter().any(|id| id == "Weinberg"));
}

#[test]
fn malformed_table_exits_non_zero_without_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("broken.yaml"), "version: broken\nparameters: [\n").expect("write table");
    let output = flavor_sim(&["evaluate", "--table", "broken.yaml"], dir.path());
    assert!(!output.status.success());
    assert!(!dir.path().join("flavor_report.json").exists());
}

#[test]
fn missing_policy_file_exits_non_zero() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = flavor_sim(&["evaluate", "--policy", "absent.yaml"], dir.path());
    assert!(!output.status.success());
    assert!(!dir.path().join("flavor_report.json").exists());
}

#[test]
fn unknown_formula_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ok = flavor_sim(&["formulas", "--parameter", "PMNS_theta12"], dir.path());
    assert!(ok.status.success());
    assert!(String::from_utf8_lossy(&ok.stdout).contains("4/13"));

    let bad = flavor_sim(&["formulas", "--parameter", "CKM_theta99"], dir.path());
    assert!(!bad.status.success());
}

#[test]
fn informational_commands_succeed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let commands: [&[&str]; 4] = [&["formulas"], &["extended"], &["falsify"], &["version", "--long"]];
    for args in commands {
        let output = flavor_sim(args, dir.path());
        assert!(output.status.success(), "{args:?} failed");
    }
    let falsify = flavor_sim(&["falsify"], dir.path());
    let text = String::from_utf8_lossy(&falsify.stdout).into_owned();
    assert!(text.contains("JUNO"));
    assert!(text.contains("DUNE"));
}

#[test]
fn unwritable_csv_leaves_no_report_behind() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir(dir.path().join("csvdir")).expect("mkdir");
    let output = flavor_sim(&["evaluate", "--quiet", "--csv", "csvdir"], dir.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    assert!(stderr.contains("output-is-directory"), "{stderr}");
    assert!(stderr.contains("csvdir"), "{stderr}");
    assert!(!dir.path().join("flavor_report.json").exists());
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .expect("list dir")
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".partial"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn misspelled_policy_key_exits_non_zero() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("typo.yaml"),
        r#"
windows:
  - experiment: JUNO
    parameter: PMNS_theta12
    interval: { min: 0.304, max: 0.311 }
    actve: true
"#,
    )
    .expect("write policy");
    let output = flavor_sim(&["evaluate", "--quiet", "--policy", "typo.yaml"], dir.path());
    assert!(!output.status.success());
    assert!(!dir.path().join("flavor_report.json").exists());
}
