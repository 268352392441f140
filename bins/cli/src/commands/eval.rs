//! Eval command handler: validate a single value without a rule-set file.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, error_output, indent, json_document, ndjson_summary};
use propcheck_config::{RuleSetEnv, ValueSource};
use propcheck_rules::{RuleOptions, ValidationOutcome, Validator};
use propcheck_shared::ErrorEnvelope;

/// Inputs for a single evaluation.
#[derive(Debug, Clone)]
pub struct EvalInput {
    pub options: RuleOptions,
    pub source: ValueSource,
    /// Snapshot holding at most the variable `source` reads.
    pub env: RuleSetEnv,
}

impl EvalInput {
    /// Build the input from `--value`/`--env`, capturing the variable if any.
    pub fn new(options: RuleOptions, value: Option<&str>, env_var: Option<&str>) -> Self {
        let (source, env) = match (value, env_var) {
            (Some(value), _) => (ValueSource::Value(value.to_owned()), RuleSetEnv::default()),
            (None, Some(name)) => {
                let env = match std::env::var_os(name) {
                    Some(raw) => RuleSetEnv::default().with_var(name, raw),
                    None => RuleSetEnv::default(),
                };
                (ValueSource::Env(name.to_owned()), env)
            },
            (None, None) => (ValueSource::Unset, RuleSetEnv::default()),
        };
        Self {
            options,
            source,
            env,
        }
    }
}

/// Run the eval command.
pub fn run_eval(mode: OutputMode, input: &EvalInput) -> Result<CliOutput, CliError> {
    let validator = match Validator::new(input.options.clone()) {
        Ok(validator) => validator,
        Err(error) => {
            return Ok(error_output(mode, &error.into(), ExitCode::InvalidInput));
        },
    };

    let outcome = match validator.enforce(&input.source.resolver(&input.env)) {
        Ok(outcome) => outcome,
        Err(error) => {
            return Ok(error_output(mode, &error.into(), ExitCode::InvalidInput));
        },
    };

    let stdout = if mode.is_ndjson() {
        format_eval_ndjson(&outcome)
    } else if mode.is_json() {
        format_eval_json(&input.options, &outcome)?
    } else {
        format_eval_text(&outcome)
    };

    Ok(CliOutput {
        stdout,
        exit_code: if outcome.is_ok() {
            ExitCode::Ok
        } else {
            ExitCode::Violation
        },
    })
}

fn format_eval_text(outcome: &ValidationOutcome) -> String {
    match outcome {
        Ok(()) => "status: ok\n".to_owned(),
        Err(failure) => {
            let mut out = format!(
                "status: violated\ncode: {}\nmessage: {}\n",
                failure.kind().error_code(),
                failure.message()
            );
            if let Some(dump) = failure.diagnostic() {
                out.push_str("hexDump:\n");
                out.push_str(&indent(dump.as_str(), "  "));
            }
            out
        },
    }
}

fn format_eval_json(options: &RuleOptions, outcome: &ValidationOutcome) -> Result<String, CliError> {
    let failure = outcome.as_ref().err().map(|failure| {
        let envelope = ErrorEnvelope::from(failure);
        serde_json::json!({
            "code": envelope.code.to_string(),
            "message": envelope.message,
            "hexDump": failure.diagnostic().map(|dump| dump.as_str()),
        })
    });
    let payload = serde_json::json!({
        "status": if outcome.is_ok() { "ok" } else { "violated" },
        "subject": options.subject,
        "property": options.property,
        "regex": options.regex,
        "failure": failure,
    });
    Ok(json_document(&payload)?)
}

fn format_eval_ndjson(outcome: &ValidationOutcome) -> String {
    match outcome {
        Ok(()) => ndjson_summary("ok", "eval", None),
        Err(failure) => ndjson_summary(
            "violated",
            "eval",
            Some(serde_json::json!({
                "code": failure.kind().error_code().to_string(),
                "message": failure.message(),
            })),
        ),
    }
}
