#![cfg(all(unix, feature = "cli"))]

use std::path::PathBuf;
use std::process::{Command, Output};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/serroute-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn serroute(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_serroute"))
        .arg("--log-level")
        .arg("error")
        .args(args)
        .output()
        .expect("serroute should run")
}

#[test]
fn send_composes_command_line_onto_device() {
    let dir = unique_temp_dir("send");
    let device = dir.join("loopback");
    std::fs::write(&device, b"").expect("device file should be writable");

    let output = serroute(&[
        "send",
        device.to_str().unwrap(),
        "--path",
        "/drive",
        "--param",
        "x=1",
        "--param",
        "y=-5",
    ]);
    assert!(output.status.success(), "send should exit 0: {output:?}");

    let written = std::fs::read(&device).expect("device file should be readable");
    assert_eq!(written, b"/drive?x=1&y=-5\n");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn send_raw_respects_delimiter_choice() {
    let dir = unique_temp_dir("send-raw");
    let device = dir.join("loopback");
    std::fs::write(&device, b"").expect("device file should be writable");

    let output = serroute(&[
        "send",
        device.to_str().unwrap(),
        "--delimiter",
        "crlf",
        "--raw",
        "plain data",
    ]);
    assert!(output.status.success(), "send should exit 0: {output:?}");

    let written = std::fs::read(&device).expect("device file should be readable");
    assert_eq!(written, b"plain data\r\n");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn send_rejects_malformed_param_with_usage_code() {
    let dir = unique_temp_dir("send-bad");
    let device = dir.join("loopback");
    std::fs::write(&device, b"").expect("device file should be writable");

    let output = serroute(&[
        "send",
        device.to_str().unwrap(),
        "--path",
        "/drive",
        "--param",
        "novalue",
    ]);
    assert_eq!(output.status.code(), Some(64));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn watch_routes_commands_and_prints_data_lines() {
    let dir = unique_temp_dir("watch");
    let device = dir.join("loopback");
    std::fs::write(&device, b"/drive?x=1&y=2\nhello world\n")
        .expect("device file should be writable");

    let endpoints = dir.join("endpoints.json");
    std::fs::write(
        &endpoints,
        r#"{
            "/drive": {
                "x": { "type": "number", "required": true },
                "y": { "type": "number", "required": true }
            }
        }"#,
    )
    .expect("endpoint file should be writable");

    let output = serroute(&[
        "--format",
        "json",
        "watch",
        device.to_str().unwrap(),
        "--endpoints",
        endpoints.to_str().unwrap(),
        "--count",
        "2",
    ]);
    assert!(output.status.success(), "watch should exit 0: {output:?}");

    let stdout = String::from_utf8(output.stdout).expect("output should be utf-8");
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("each output line should be json"))
        .collect();
    assert_eq!(lines.len(), 2);

    assert_eq!(lines[0]["path"], "/drive");
    assert_eq!(lines[0]["valid"], true);
    assert_eq!(lines[0]["body"]["x"], 1.0);
    assert_eq!(lines[0]["body"]["y"], 2.0);

    assert_eq!(lines[1]["kind"], "text");
    assert_eq!(lines[1]["payload"], "hello world");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn watch_reports_validation_failures() {
    let dir = unique_temp_dir("watch-invalid");
    let device = dir.join("loopback");
    std::fs::write(&device, b"/drive?x=oops&y=2\n").expect("device file should be writable");

    let endpoints = dir.join("endpoints.json");
    std::fs::write(
        &endpoints,
        r#"{
            "/drive": {
                "x": { "type": "number", "required": true },
                "y": { "type": "number", "required": true }
            }
        }"#,
    )
    .expect("endpoint file should be writable");

    let output = serroute(&[
        "--format",
        "json",
        "watch",
        device.to_str().unwrap(),
        "--endpoints",
        endpoints.to_str().unwrap(),
        "--count",
        "1",
    ]);
    assert!(output.status.success(), "watch should exit 0: {output:?}");

    let stdout = String::from_utf8(output.stdout).expect("output should be utf-8");
    let line: serde_json::Value =
        serde_json::from_str(stdout.lines().next().expect("one output line"))
            .expect("output line should be json");
    assert_eq!(line["valid"], false);
    assert_eq!(line["failed_fields"][0], "x");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn version_prints_package_version() {
    let output = serroute(&["version"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("output should be utf-8");
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_extended_includes_build_details() {
    let output = serroute(&["version", "--extended"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("output should be utf-8");
    assert!(stdout.contains("target_os:"));
    assert!(stdout.contains("features:"));
}
