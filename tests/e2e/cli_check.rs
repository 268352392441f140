//! End-to-end tests for `propcheck check` and `propcheck config`.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| manifest_dir.to_path_buf())
}

fn fixture(name: &str) -> String {
    workspace_root()
        .join("tests")
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

fn run_cli(args: &[&str], env: &[(&str, &str)]) -> std::io::Result<Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_propcheck"));
    command
        .args(args)
        .env_remove("APP_VERSION")
        .env_remove("RELEASE_CHANNEL");
    for (key, _) in std::env::vars_os() {
        if key.to_string_lossy().starts_with("PROPCHECK_") {
            command.env_remove(key);
        }
    }
    command.envs(env.iter().copied());
    command.output()
}

#[test]
fn all_rules_pass_with_exit_zero() -> Result<(), Box<dyn std::error::Error>> {
    let config = fixture("rules.toml");
    let output = run_cli(
        &["check", "--config", &config],
        &[("APP_VERSION", "1.8.0_392"), ("RELEASE_CHANNEL", "stable")],
    )?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.ends_with("status: ok\nrules: 3 passed, 0 failed, 0 skipped\n"));
    Ok(())
}

#[test]
fn violation_exits_with_four() -> Result<(), Box<dyn std::error::Error>> {
    let config = fixture("rules.toml");
    let output = run_cli(
        &["check", "--config", &config],
        &[("APP_VERSION", "1.4")],
    )?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(output.status.code(), Some(4));
    assert!(stdout.contains(
        "FAIL  app-version: App Version \"app.version\" evaluates to \"1.4\".  This does not match the regular expression \"1\\.8\\..*\"\n"
    ));
    assert!(stdout.contains("rules: 1 passed, 2 failed, 0 skipped"));
    Ok(())
}

#[test]
fn ndjson_emits_one_line_per_rule() -> Result<(), Box<dyn std::error::Error>> {
    let config = fixture("rules.toml");
    let output = run_cli(
        &["--agent", "check", "--config", &config],
        &[("APP_VERSION", "1.8.1"), ("RELEASE_CHANNEL", "beta")],
    )?;
    let stdout = String::from_utf8(output.stdout)?;
    let records: Vec<serde_json::Value> = stdout
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;

    assert_eq!(records.len(), 4);
    let summary = records.last().ok_or("missing summary")?;
    assert_eq!(summary.get("type"), Some(&serde_json::json!("summary")));
    assert_eq!(summary.get("passed"), Some(&serde_json::json!(3)));
    Ok(())
}

#[test]
fn invalid_pattern_is_rejected_before_checking() -> Result<(), Box<dyn std::error::Error>> {
    let config = fixture("rules.bad-pattern.json");
    let output = run_cli(&["check", "--config", &config, "--output", "json"], &[])?;
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        value.pointer("/error/code").and_then(serde_json::Value::as_str),
        Some("config:invalid_pattern")
    );
    assert_eq!(
        value.pointer("/error/metadata/pattern").and_then(serde_json::Value::as_str),
        Some("1.(5")
    );
    Ok(())
}

#[test]
fn invalid_env_override_is_invalid_input() -> Result<(), Box<dyn std::error::Error>> {
    let config = fixture("rules.toml");
    let output = run_cli(
        &["check", "--config", &config],
        &[("PROPCHECK_FAIL_FAST", "perhaps")],
    )?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout.contains("code: config:env_invalid_bool"));
    Ok(())
}

#[test]
fn config_validate_counts_rules() -> Result<(), Box<dyn std::error::Error>> {
    let config = fixture("rules.toml");
    let output = run_cli(&["config", "validate", "--path", &config], &[])?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("rules: 3\n"));
    Ok(())
}

#[test]
fn config_show_reflects_env_overrides() -> Result<(), Box<dyn std::error::Error>> {
    let config = fixture("rules.toml");
    let output = run_cli(
        &["config", "show", "--path", &config, "--json"],
        &[("PROPCHECK_FAIL_FAST", "yes")],
    )?;
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;

    assert_eq!(
        value.pointer("/ruleSet/settings/failFast"),
        Some(&serde_json::json!(true))
    );
    Ok(())
}

#[test]
fn missing_config_file_exits_with_io_code() -> std::io::Result<()> {
    let config = fixture("missing.toml");
    let output = run_cli(&["check", "--config", &config], &[])?;

    assert_eq!(output.status.code(), Some(3));
    Ok(())
}
