//! Hexdump command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, json_document, ndjson_summary};
use propcheck_rules::HexDump;
use std::io::{self, Read};

/// Run the hexdump command over a literal value or stdin.
pub fn run_hexdump(mode: OutputMode, value: Option<&str>, from_stdin: bool) -> Result<CliOutput, CliError> {
    let bytes = match (value, from_stdin) {
        (Some(value), false) => value.as_bytes().to_vec(),
        (None, true) => read_stdin_bytes()?,
        (Some(_), true) => {
            return Err(CliError::InvalidInput(
                "--value and --stdin are mutually exclusive".to_owned(),
            ));
        },
        (None, false) => {
            return Err(CliError::InvalidInput("missing --value or --stdin".to_owned()));
        },
    };

    Ok(CliOutput {
        stdout: format_hexdump(mode, &bytes)?,
        exit_code: ExitCode::Ok,
    })
}

fn format_hexdump(mode: OutputMode, bytes: &[u8]) -> Result<String, CliError> {
    let dump = HexDump::of(bytes);
    if mode.is_ndjson() {
        return Ok(ndjson_summary(
            "ok",
            "hexdump",
            Some(serde_json::json!({
                "bytes": bytes.len(),
                "rows": dump.row_count(),
                "hexDump": dump.as_str(),
            })),
        ));
    }
    if mode.is_json() {
        let payload = serde_json::json!({
            "status": "ok",
            "bytes": bytes.len(),
            "rows": dump.row_count(),
            "hexDump": dump.as_str(),
        });
        return Ok(json_document(&payload)?);
    }
    Ok(dump.into())
}

fn read_stdin_bytes() -> Result<Vec<u8>, CliError> {
    let mut buf = Vec::new();
    io::stdin().read_to_end(&mut buf)?;
    Ok(buf)
}
