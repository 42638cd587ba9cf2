use std::{
    fs,
    process::{Command, Output},
};
use tempfile::tempdir;

fn bin_path() -> &'static str {
    env!("CARGO_BIN_EXE_interplog")
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run interplog")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn render_prints_message_and_arguments() {
    let output = run(&["render", "Total: {total,8:N} for {}", "--arg", "total=7000", "--arg", "user=\"ada\""]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let text = stdout(&output);
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Total: 7,000.00 for ada"));
    assert_eq!(lines.next(), Some("template: Total: {total,8:N} for {user}"));
    assert_eq!(lines.next(), Some("  total = 7000"));
    assert_eq!(lines.next(), Some("  user = ada"));
}

#[test]
fn render_json_keeps_value_types() {
    let output = run(&["render", "{@items}", "--arg", "[1,2,3]", "--json"]);
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_str(stdout(&output).trim()).expect("json");
    assert_eq!(parsed["message"], "1, 2, 3");
    assert_eq!(parsed["template"], "{@items}");
    assert_eq!(parsed["properties"]["@items"], serde_json::json!([1, 2, 3]));
}

#[test]
fn check_lists_holes_and_rejects_bad_templates() {
    let output = run(&["check", "A {@user} {count,-4:D3}"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "2 hole(s)\n  2: @user\n  10: count align=-4 format=D3\n"
    );

    let output = run(&["check", "oops {"]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn emit_writes_through_configured_sink() {
    let dir = tempdir().expect("temp dir");
    let log_path = dir.path().join("events.jsonl");
    let config_path = dir.path().join("logging.toml");
    fs::write(
        &config_path,
        format!(
            "category = \"cli\"\nmin_level = \"warning\"\n\n[[sinks]]\nkind = \"json\"\npath = {:?}\n",
            log_path.to_string_lossy()
        ),
    )
    .expect("write config");
    let config = config_path.to_string_lossy().into_owned();

    let skipped = run(&["emit", "--config", &config, "--level", "info", "quiet"]);
    assert!(skipped.status.success());
    let written = run(&["emit", "-c", &config, "-l", "error", "Disk {} full", "-a", "disk=\"sda\""]);
    assert!(written.status.success());

    let text = fs::read_to_string(&log_path).expect("read log");
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 1);
    let record: serde_json::Value = serde_json::from_str(lines[0]).expect("json");
    assert_eq!(record["category"], "cli");
    assert_eq!(record["level"], "Error");
    assert_eq!(record["message"], "Disk sda full");
    assert_eq!(record["template"], "Disk {disk} full");
}

#[test]
fn emit_reports_missing_config() {
    let output = run(&["emit", "--config", "/nonexistent/interplog.toml", "x"]);
    assert_eq!(output.status.code(), Some(1));
}
