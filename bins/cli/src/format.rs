//! Output format helpers for CLI commands.

use crate::CliOutput;
use crate::error::ExitCode;
use clap::{Args, ValueEnum};
use propcheck_shared::ErrorEnvelope;

/// Output format choices for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-friendly text output.
    Text,
    /// Machine-friendly JSON output.
    Json,
    /// Line-delimited JSON (NDJSON) output.
    Ndjson,
}

/// Output-related CLI flags.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output format for command responses.
    #[arg(long, global = true, value_enum)]
    pub output: Option<OutputFormat>,
    /// Emit machine-friendly defaults (NDJSON output).
    #[arg(long, global = true)]
    pub agent: bool,
    /// Emit machine-readable JSON output (legacy alias).
    #[arg(long, global = true, hide = true)]
    pub json: bool,
}

/// Output mode derived from CLI flags.
#[derive(Debug, Clone, Copy)]
pub struct OutputMode {
    pub format: OutputFormat,
}

impl OutputMode {
    /// Build output mode from CLI flags.
    #[must_use]
    pub const fn from_args(args: &OutputArgs) -> Self {
        let format = match (args.output, args.json, args.agent) {
            (Some(value), _, _) => value,
            (None, true, _) => OutputFormat::Json,
            (None, false, true) => OutputFormat::Ndjson,
            (None, false, false) => OutputFormat::Text,
        };

        Self { format }
    }

    /// Returns true when JSON output is requested.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Returns true when NDJSON output is requested.
    #[must_use]
    pub const fn is_ndjson(self) -> bool {
        matches!(self.format, OutputFormat::Ndjson)
    }

    /// Returns true when logs should be emitted as JSON lines.
    #[must_use]
    pub const fn is_machine(self) -> bool {
        !matches!(self.format, OutputFormat::Text)
    }
}

/// Pretty JSON document with a trailing newline.
pub fn json_document(value: &serde_json::Value) -> Result<String, serde_json::Error> {
    let mut output = serde_json::to_string_pretty(value)?;
    output.push('\n');
    Ok(output)
}

/// Single NDJSON line.
pub fn ndjson_line(value: &serde_json::Value) -> Result<String, serde_json::Error> {
    let mut output = serde_json::to_string(value)?;
    output.push('\n');
    Ok(output)
}

/// NDJSON summary record: `type`, `status`, `kind` plus any extra fields.
pub fn ndjson_summary(status: &str, kind: &str, extra: Option<serde_json::Value>) -> String {
    let mut payload = serde_json::Map::new();
    payload.insert("type".to_owned(), "summary".into());
    payload.insert("status".to_owned(), status.into());
    payload.insert("kind".to_owned(), kind.into());
    if let Some(serde_json::Value::Object(map)) = extra {
        payload.extend(map);
    }
    ndjson_line(&serde_json::Value::Object(payload)).unwrap_or_else(|_| {
        "{\"type\":\"summary\",\"status\":\"error\",\"kind\":\"internal\"}\n".to_owned()
    })
}

/// JSON shape of an error envelope, with the code flattened to `namespace:code`.
pub fn envelope_json(error: &ErrorEnvelope) -> serde_json::Value {
    serde_json::json!({
        "code": error.code.to_string(),
        "kind": error.kind,
        "message": error.message,
        "metadata": error.metadata,
    })
}

/// Render an error envelope in the requested output mode.
pub fn error_output(mode: OutputMode, error: &ErrorEnvelope, exit_code: ExitCode) -> CliOutput {
    tracing::debug!(code = %error.code, "command failed");

    let stdout = if mode.is_ndjson() {
        let payload = serde_json::json!({
            "type": "error",
            "status": "error",
            "error": envelope_json(error),
        });
        ndjson_line(&payload).unwrap_or_else(|_| internal_error_json())
    } else if mode.is_json() {
        let payload = serde_json::json!({
            "status": "error",
            "error": envelope_json(error),
        });
        // This is a CLI boundary, so JSON serialization errors are internal.
        json_document(&payload).unwrap_or_else(|_| internal_error_json())
    } else {
        format_error_text(error)
    };

    CliOutput { stdout, exit_code }
}

fn internal_error_json() -> String {
    "{\"status\":\"error\",\"error\":{\"code\":\"core:internal\",\"message\":\"internal error\"}}\n"
        .to_owned()
}

fn format_error_text(error: &ErrorEnvelope) -> String {
    let mut out = String::new();
    out.push_str("status: error\n");
    out.push_str("code: ");
    out.push_str(&error.code.to_string());
    out.push('\n');
    out.push_str("message: ");
    out.push_str(&error.message);
    out.push('\n');
    out.push_str("kind: ");
    out.push_str(&error.kind.to_string());
    out.push('\n');

    if !error.metadata.is_empty() {
        out.push_str("meta:\n");
        for (key, value) in &error.metadata {
            out.push_str("  ");
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
    }

    out
}

/// Indent every line of a block (used for hex dumps in text reports).
pub fn indent(block: &str, prefix: &str) -> String {
    block
        .lines()
        .map(|line| format!("{prefix}{line}\n"))
        .collect()
}
