use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "powerbroker-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_strategies_writes_output() {
    let exe = env!("CARGO_BIN_EXE_powerbroker-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-strategies", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available strategies"));
    assert!(content.contains("attack-dog"));
}

#[test]
fn cli_runs_campaigns_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_powerbroker-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args([
            "--report",
            "json",
            "--strategies",
            "balanced,ground-game",
            "--iterations",
            "1",
            "--seeds",
            "1,2",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Power Broker Campaign Tester"));
    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(output_path).expect("read output"))
            .expect("json report");
    let summaries = report.as_array().expect("array of summaries");
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|s| s["runs"] == 2));
}

#[test]
fn cli_json_report_on_stdout_is_pure_json() {
    let exe = env!("CARGO_BIN_EXE_powerbroker-tester");
    let output = Command::new(exe)
        .args([
            "--report",
            "json",
            "--strategies",
            "fundraiser",
            "--iterations",
            "1",
            "--seeds",
            "3",
            "--verbose",
        ])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is a json report");
    assert_eq!(report.as_array().expect("array of summaries").len(), 1);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Running strategy"));
    assert!(!stderr.contains("Power Broker Campaign Tester"));
}

#[test]
fn cli_rejects_bad_seed() {
    let exe = env!("CARGO_BIN_EXE_powerbroker-tester");
    let output = Command::new(exe)
        .args(["--seeds", "banana", "--iterations", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unrecognized seed token"));
}
