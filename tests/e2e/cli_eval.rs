//! End-to-end tests for `propcheck eval`.

use std::process::{Command, Output};

fn run_eval(args: &[&str], env: &[(&str, &str)]) -> std::io::Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_propcheck"))
        .arg("eval")
        .args(args)
        .env_remove("PROPCHECK_E2E_VALUE")
        .envs(env.iter().copied())
        .output()
}

#[test]
fn custom_missing_message_is_used_verbatim() -> Result<(), Box<dyn std::error::Error>> {
    let output = run_eval(
        &["--property", "X", "--message", "X is mandatory"],
        &[],
    )?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(output.status.code(), Some(4));
    assert_eq!(
        stdout,
        "status: violated\ncode: rule:missing_value\nmessage: X is mandatory\n"
    );
    Ok(())
}

#[test]
fn substring_match_is_not_enough() -> Result<(), Box<dyn std::error::Error>> {
    let output = run_eval(
        &["--property", "p", "--value", "xabcx", "--regex", "abc"],
        &[],
    )?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(output.status.code(), Some(4));
    assert!(stdout.contains("code: rule:pattern_mismatch"));
    assert!(stdout.contains("0001  |  78 61 62 63  78 \n"));
    Ok(())
}

#[test]
fn value_is_read_from_env() -> Result<(), Box<dyn std::error::Error>> {
    let output = run_eval(
        &[
            "--subject",
            "JDK Version",
            "--property",
            "java.version",
            "--env",
            "PROPCHECK_E2E_VALUE",
            "--regex",
            r"1\.8.*",
            "--output",
            "json",
        ],
        &[("PROPCHECK_E2E_VALUE", "1.8.0")],
    )?;
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(value.get("status"), Some(&serde_json::json!("ok")));
    assert_eq!(value.get("failure"), Some(&serde_json::Value::Null));
    Ok(())
}

#[test]
fn regex_message_replaces_default() -> Result<(), Box<dyn std::error::Error>> {
    let output = run_eval(
        &[
            "--property",
            "p",
            "--value",
            "1.4",
            "--regex",
            r"1\.5.*",
            "--regex-message",
            "too old",
            "--agent",
        ],
        &[],
    )?;
    let stdout = String::from_utf8(output.stdout)?;
    let value: serde_json::Value = serde_json::from_str(stdout.trim())?;

    assert_eq!(output.status.code(), Some(4));
    assert_eq!(value.get("message"), Some(&serde_json::json!("too old")));
    Ok(())
}

#[test]
fn verbose_pattern_with_trailing_comment_is_accepted() -> Result<(), Box<dyn std::error::Error>> {
    let output = run_eval(
        &[
            "--property",
            "java.version",
            "--value",
            "1.8.0_392",
            "--regex",
            r"(?x)1\.8 .* # java eight",
        ],
        &[],
    )?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8(output.stdout)?, "status: ok\n");
    Ok(())
}
