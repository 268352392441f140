//! End-to-end tests for `propcheck hexdump`.

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_with_stdin(args: &[&str], input: &[u8]) -> std::io::Result<Output> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_propcheck"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input)?;
    }
    child.wait_with_output()
}

fn line_separator() -> &'static str {
    if cfg!(windows) { "\r\n" } else { "\n" }
}

#[test]
fn dumps_literal_value() -> Result<(), Box<dyn std::error::Error>> {
    let output = Command::new(env!("CARGO_BIN_EXE_propcheck"))
        .args(["hexdump", "--value", "ABC"])
        .output()?;

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout)?,
        format!("0001  |  41 42 43 {}", line_separator())
    );
    Ok(())
}

#[test]
fn dumps_raw_stdin_bytes_across_rows() -> Result<(), Box<dyn std::error::Error>> {
    let bytes: Vec<u8> = (0u8..17).collect();
    let output = run_with_stdin(&["hexdump", "--stdin"], &bytes)?;
    let stdout = String::from_utf8(output.stdout)?;
    let sep = line_separator();

    assert!(output.status.success());
    assert_eq!(
        stdout,
        format!(
            "0001  |  00 01 02 03  04 05 06 07  08 09 0A 0B  0C 0D 0E 0F  {sep}0002  |  10 {sep}"
        )
    );
    Ok(())
}

#[test]
fn empty_stdin_is_just_a_separator() -> Result<(), Box<dyn std::error::Error>> {
    let output = run_with_stdin(&["hexdump", "--stdin"], &[])?;

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, line_separator());
    Ok(())
}

#[test]
fn missing_input_is_invalid() -> std::io::Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_propcheck"))
        .arg("hexdump")
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    Ok(())
}
