//! Config command handlers.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, error_output, json_document, ndjson_summary};
use propcheck_config::{ValidatedRuleSet, load_rule_set_std_env, to_pretty_json, to_pretty_toml};
use std::path::Path;

/// Show the effective rule set after env overrides.
pub fn run_config_show(mode: OutputMode, path: &Path) -> Result<CliOutput, CliError> {
    let rule_set = match load_with_std_env(mode, path) {
        Ok(rule_set) => rule_set,
        Err(output) => return Ok(output),
    };

    let stdout = if mode.is_ndjson() {
        let config_value: serde_json::Value =
            serde_json::from_str(to_pretty_json(rule_set.as_config())?.trim())?;
        ndjson_summary(
            "ok",
            "config",
            Some(serde_json::json!({ "ruleSet": config_value })),
        )
    } else if mode.is_json() {
        let config_value: serde_json::Value =
            serde_json::from_str(to_pretty_json(rule_set.as_config())?.trim())?;
        let payload = serde_json::json!({
            "status": "ok",
            "configPath": path.to_string_lossy(),
            "ruleSet": config_value,
        });
        json_document(&payload)?
    } else {
        let mut out = String::from("status: ok\nconfig:\n");
        out.push_str(&to_pretty_toml(rule_set.as_config())?);
        out
    };

    Ok(CliOutput {
        stdout,
        exit_code: ExitCode::Ok,
    })
}

/// Validate a rule-set file without evaluating any rule.
pub fn run_config_validate(mode: OutputMode, path: &Path) -> Result<CliOutput, CliError> {
    let rule_set = match load_with_std_env(mode, path) {
        Ok(rule_set) => rule_set,
        Err(output) => return Ok(output),
    };
    let rules = rule_set.rules().len();

    let stdout = if mode.is_ndjson() {
        ndjson_summary("ok", "config", Some(serde_json::json!({ "rules": rules })))
    } else if mode.is_json() {
        let payload = serde_json::json!({
            "status": "ok",
            "configPath": path.to_string_lossy(),
            "rules": rules,
        });
        json_document(&payload)?
    } else {
        format!(
            "status: ok\nconfig: ok\npath: {}\nrules: {rules}\n",
            path.to_string_lossy()
        )
    };

    Ok(CliOutput {
        stdout,
        exit_code: ExitCode::Ok,
    })
}

fn load_with_std_env(mode: OutputMode, path: &Path) -> Result<ValidatedRuleSet, CliOutput> {
    load_rule_set_std_env(path)
        .map(|(rule_set, _)| rule_set)
        .map_err(|error| error_output(mode, &error, ExitCode::for_envelope(&error)))
}
