use std::process::Command;

const BINARY: &str = env!("CARGO_BIN_EXE_ladder-sim");

fn command() -> Command {
    let mut command = Command::new(BINARY);
    command
        .env_remove("LADDER_CONFIG")
        .env_remove("LADDER_SEED")
        .env("RUST_LOG", "error");
    command
}

/// Test that the application exits with error code when the configuration is invalid
#[test]
fn test_application_exits_on_invalid_config() {
    let output = command()
        .args(["--players", "1", "--quiet"])
        .output()
        .expect("Failed to execute simulator");

    assert!(!output.status.success(), "Process should fail with a single player");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_application_exits_on_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();

    let output = command()
        .arg("--config")
        .arg(dir.path().join("missing.json"))
        .arg("--quiet")
        .output()
        .expect("Failed to execute simulator");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_application_writes_summary() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.json");

    let output = command()
        .args(["--players", "10", "--matches", "150", "--seed", "3", "--quiet", "--output"])
        .arg(&path)
        .output()
        .expect("Failed to execute simulator");

    assert!(
        output.status.success(),
        "Simulation failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let contents = std::fs::read_to_string(&path).unwrap();
    let summary: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(summary["seed"], 3);
    assert_eq!(summary["matchesPlayed"], 150);
    assert_eq!(summary["standings"].as_array().unwrap().len(), 10);
}
