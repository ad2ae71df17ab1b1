use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "platoon-sim-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn run_platoon(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_platoon"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("run platoon")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "platoon failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn platoon_prints_text_report_by_default() {
    let output = run_platoon(&[]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("----------- Start -----------"));
    assert!(stdout.contains("----------- Statistics -----------"));
    assert!(stdout.contains("Number of vehicles:\t5"));
    assert!(stdout.contains("Packets received:\t404"));
    assert!(stdout.contains("Total packet sent:\t404"));
    assert!(stdout.contains("Packet rate loss:\t0%"));
}

#[test]
fn platoon_json_output_and_trace_file() {
    let dir = unique_temp_dir("json-trace");
    let trace = dir.join("trace.txt");

    let output = run_platoon(&["--json", "--trace", trace.to_str().unwrap()]);
    assert_success(&output);

    let v: Value = serde_json::from_slice(&output.stdout).expect("parse metrics json");
    assert_eq!(v["node_count"].as_u64(), Some(5));
    assert_eq!(v["packets_received"].as_u64(), Some(404));
    assert_eq!(v["packets_expected"].as_u64(), Some(404));
    let rtt = v["avg_rtt_s"].as_f64().expect("avg_rtt_s");
    assert!((rtt - 0.004).abs() < 1e-9, "avg_rtt_s={rtt}");

    let raw = fs::read_to_string(&trace).expect("read trace");
    assert_eq!(raw.lines().count(), 404);
    assert_eq!(raw.lines().next(), Some("1.004\t1\t0\t1"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn platoon_cli_overrides_scenario_file() {
    let dir = unique_temp_dir("scenario");
    let scenario = dir.join("scenario.json");
    fs::write(
        &scenario,
        r#"{ "node_count": 3, "start_ms": 0, "end_ms": 990, "interval_ms": 10 }"#,
    )
    .expect("write scenario");

    let output = run_platoon(&[
        "--scenario",
        scenario.to_str().unwrap(),
        "--iip",
        "33",
        "--no-echo",
        "--json",
    ]);
    assert_success(&output);

    let v: Value = serde_json::from_slice(&output.stdout).expect("parse metrics json");
    assert_eq!(v["node_count"].as_u64(), Some(3));
    // 2 个客户端 * (990/33 + 1)
    assert_eq!(v["packets_expected"].as_u64(), Some(62));
    assert_eq!(v["packets_received"].as_u64(), Some(62));
    let rtt = v["avg_rtt_s"].as_f64().expect("avg_rtt_s");
    assert!((rtt - 0.002).abs() < 1e-9, "one-way delay expected, got {rtt}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn platoon_rejects_invalid_configuration() {
    let output = run_platoon(&["--nodes", "1"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("configuration error"), "stderr={stderr}");
}

#[test]
fn platoon_reports_no_data_when_everything_is_dropped() {
    let output = run_platoon(&["--max-range-m", "1"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no data"), "stderr={stderr}");
}
