use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "farmxplore-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_farmxplore-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    for key in ["smoke", "full-campaign", "stale-fetch", "leaderboard"] {
        assert!(content.contains(key), "missing {key}");
    }
}

#[test]
fn cli_runs_all_scenarios_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_farmxplore-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args(["--scenarios", "all", "--seeds", "1,2", "--today", "2025-05-05"])
        .args(["--report", "json", "--profile-dir"])
        .arg(temp_path("profiles"))
        .arg("--output")
        .arg(&output_path)
        .output()
        .expect("run cli");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{stdout}");
    assert!(stdout.contains("FarmXplore Scenario Tester"));

    let content = std::fs::read_to_string(output_path).expect("read report");
    let results: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let results = results.as_array().expect("array");
    assert_eq!(results.len(), 6);
    for result in results {
        assert_eq!(result["passed"], true, "{result}");
        assert_eq!(result["iterations_run"], 2);
    }
}

#[test]
fn cli_reads_data_dir_and_catalog() {
    let exe = env!("CARGO_BIN_EXE_farmxplore-tester");
    let data_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let output_path = temp_path("markdown");
    let status = Command::new(exe)
        .args(["--scenarios", "smoke,persistence", "--language", "fr"])
        .args(["--report", "markdown", "--data-dir"])
        .arg(&data_dir)
        .arg("--catalog")
        .arg(data_dir.join("levels.json"))
        .arg("--profile-dir")
        .arg(temp_path("profiles"))
        .arg("--output")
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read report");
    assert!(content.contains("# FarmXplore Scenario Results"));
    assert!(content.contains("- **Passed**: 2"));
}

#[test]
fn cli_fails_when_datasets_are_missing() {
    let exe = env!("CARGO_BIN_EXE_farmxplore-tester");
    let output = Command::new(exe)
        .args(["--scenarios", "smoke", "--report", "json", "--data-dir"])
        .arg(temp_path("no-data"))
        .arg("--profile-dir")
        .arg(temp_path("profiles"))
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn cli_rejects_bad_dates() {
    let exe = env!("CARGO_BIN_EXE_farmxplore-tester");
    let output = Command::new(exe)
        .args(["--scenarios", "streak", "--today", "yesterday"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("YYYY-MM-DD"));
}
