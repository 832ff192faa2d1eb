use std::path::PathBuf;
use std::process::{Command, Output};

fn run_sim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_intersection_sim"))
        .args(args)
        .env("RUST_LOG", "warn,intersection_sim=info")
        .output()
        .expect("Failed to execute simulation")
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("intersection_sim_{}_{}", std::process::id(), name))
}

/// Test that the simulation runs headless without crashing
#[test]
fn test_headless_simulation_runs() {
    let output = run_sim(&["--ticks", "600", "--seed", "1"]);

    assert!(
        output.status.success(),
        "Simulation failed to run headless. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );
}

/// Test that simulation statistics are logged
#[test]
fn test_simulation_statistics_logged() {
    let output = run_sim(&["--ticks", "300", "--mode", "adaptive", "--seed", "2"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    for needle in [
        "Elapsed time:",
        "Total cars passed:",
        "Average wait:",
        "Active cars:",
        "North: passed=",
        "West: passed=",
    ] {
        assert!(stderr.contains(needle), "Missing '{}' statistic", needle);
    }
}

/// Test that vehicles are on the road by the end of a short run
#[test]
fn test_cars_spawn_during_simulation() {
    let output = run_sim(&["--ticks", "300", "--seed", "3"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    let active_line = stderr
        .lines()
        .find(|line| line.contains("Active cars:"))
        .expect("Could not find 'Active cars' line");

    // Parse the number after the label; the log prefix varies
    let parts: Vec<&str> = active_line.split("Active cars:").collect();
    let active: u32 = parts
        .get(1)
        .and_then(|s| s.trim().parse().ok())
        .expect("Could not parse active car count");

    assert!(active > 0, "No cars were spawned during simulation");
}

/// Test that periodic summaries are printed
#[test]
fn test_periodic_summaries() {
    let output = run_sim(&["--ticks", "600", "--report-every", "5"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    let summaries = stderr.matches("=== Intersection Summary ===").count();
    assert!(summaries >= 3, "Expected periodic summaries, found {}", summaries);
    assert!(stderr.contains("Signals: N:"));
}

/// Test that the final snapshot is exported as JSON
#[test]
fn test_export_writes_json_report() {
    let path = temp_path("report.json");
    let path_str = path.to_str().expect("temp path is not UTF-8");

    let output = run_sim(&["--ticks", "450", "--seed", "4", "--export", path_str]);
    assert!(
        output.status.success(),
        "Simulation failed to run. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json = std::fs::read_to_string(&path).expect("report was not written");
    let _ = std::fs::remove_file(&path);
    let report: serde_json::Value = serde_json::from_str(&json).expect("report is not JSON");

    assert!(report["elapsedSecs"].as_f64().expect("missing elapsedSecs") > 14.0);
    assert!(report["stats"]["totalCarsPassed"].is_u64());
    assert!(report["stats"]["currentCars"].as_u64().expect("missing currentCars") > 0);
    for direction in ["North", "East", "South", "West"] {
        assert!(report["sensorStats"][direction]["detected"].is_u64());
        assert!(report["stats"]["directionStats"][direction]["passed"].is_u64());
    }
}

/// Test that a settings file overrides the defaults
#[test]
fn test_settings_file_is_applied() {
    let path = temp_path("settings.json");
    std::fs::write(&path, r#"{ "mode": "adaptive", "carSpawnRate": 0 }"#)
        .expect("could not write settings file");
    let path_str = path.to_str().expect("temp path is not UTF-8");

    let output = run_sim(&["--ticks", "200", "--settings", path_str]);
    let _ = std::fs::remove_file(&path);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("adaptive mode"));
    assert!(stderr.contains("Active cars: 0"));
}

/// Test that an invalid settings file stops the run
#[test]
fn test_invalid_settings_file_is_rejected() {
    let path = temp_path("bad_settings.json");
    std::fs::write(&path, r#"{ "carSpeed": -1 }"#).expect("could not write settings file");
    let path_str = path.to_str().expect("temp path is not UTF-8");

    let output = run_sim(&["--ticks", "10", "--settings", path_str]);
    let _ = std::fs::remove_file(&path);

    assert!(!output.status.success(), "Invalid settings were accepted");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("carSpeed must be positive"), "stderr: {}", stderr);
}
