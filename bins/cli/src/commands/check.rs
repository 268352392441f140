//! Check command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, error_output, indent, json_document, ndjson_line, ndjson_summary};
use propcheck_config::{CompiledRule, RuleSetEnv, RuleSettings, load_rule_set_from_path};
use propcheck_rules::ValidationFailure;
use propcheck_shared::ErrorEnvelope;
use std::path::Path;

/// Outcome of a single rule in a check run.
#[derive(Debug)]
struct RuleReport<'a> {
    rule: &'a CompiledRule,
    failure: Option<ValidationFailure>,
}

impl RuleReport<'_> {
    const fn passed(&self) -> bool {
        self.failure.is_none()
    }

    fn to_json(&self, settings: RuleSettings) -> serde_json::Value {
        let mut value = serde_json::json!({
            "rule": self.rule.name(),
            "source": self.rule.source().to_string(),
            "status": if self.passed() { "passed" } else { "failed" },
        });
        if let (Some(failure), Some(object)) = (&self.failure, value.as_object_mut()) {
            object.insert("code".to_owned(), failure.kind().error_code().to_string().into());
            object.insert("message".to_owned(), failure.message().into());
            if settings.diagnostics
                && let Some(dump) = failure.diagnostic()
            {
                object.insert("hexDump".to_owned(), dump.as_str().into());
            }
        }
        value
    }
}

#[derive(Debug, Clone, Copy)]
struct Summary {
    total: usize,
    passed: usize,
    failed: usize,
    skipped: usize,
}

impl Summary {
    const fn status(self) -> &'static str {
        if self.failed == 0 { "ok" } else { "violated" }
    }

    fn to_json(self) -> serde_json::Value {
        serde_json::json!({
            "total": self.total,
            "passed": self.passed,
            "failed": self.failed,
            "skipped": self.skipped,
        })
    }
}

/// Run the check command against a rule-set file.
pub fn run_check(mode: OutputMode, config: &Path, selected: &[String]) -> Result<CliOutput, CliError> {
    let env = match RuleSetEnv::from_std_env() {
        Ok(env) => env,
        Err(error) => {
            return Ok(error_output(mode, &error.into(), ExitCode::InvalidInput));
        },
    };
    run_check_with_env(mode, config, selected, &env)
}

pub(crate) fn run_check_with_env(
    mode: OutputMode,
    config: &Path,
    selected: &[String],
    env: &RuleSetEnv,
) -> Result<CliOutput, CliError> {
    let rule_set = match load_rule_set_from_path(config, env) {
        Ok(rule_set) => rule_set,
        Err(error) => {
            let exit_code = ExitCode::for_envelope(&error);
            return Ok(error_output(mode, &error, exit_code));
        },
    };

    let rules: Vec<&CompiledRule> = if selected.is_empty() {
        rule_set.rules().iter().collect()
    } else {
        match rule_set.select(selected) {
            Ok(rules) => rules,
            Err(error) => {
                return Ok(error_output(mode, &error.into(), ExitCode::InvalidInput));
            },
        }
    };

    let settings = rule_set.settings();
    let mut reports = Vec::with_capacity(rules.len());
    for rule in rules.iter().copied() {
        let outcome = match rule.check(env) {
            Ok(outcome) => outcome,
            Err(error) => {
                let envelope = ErrorEnvelope::from(error).with_metadata("rule", rule.name());
                return Ok(error_output(mode, &envelope, ExitCode::InvalidInput));
            },
        };
        let failed = outcome.is_err();
        reports.push(RuleReport {
            rule,
            failure: outcome.err(),
        });
        if failed && settings.fail_fast {
            tracing::info!(rule = rule.name(), "stopping at first violation");
            break;
        }
    }

    let passed = reports.iter().filter(|report| report.passed()).count();
    let summary = Summary {
        total: rules.len(),
        passed,
        failed: reports.len() - passed,
        skipped: rules.len() - reports.len(),
    };

    let stdout = if mode.is_ndjson() {
        format_check_ndjson(&reports, settings, summary)?
    } else if mode.is_json() {
        format_check_json(config, &reports, settings, summary)?
    } else {
        format_check_text(&reports, settings, summary)
    };

    Ok(CliOutput {
        stdout,
        exit_code: if summary.failed == 0 {
            ExitCode::Ok
        } else {
            ExitCode::Violation
        },
    })
}

fn format_check_text(reports: &[RuleReport<'_>], settings: RuleSettings, summary: Summary) -> String {
    let mut out = String::new();
    for report in reports {
        match &report.failure {
            None => {
                out.push_str("pass  ");
                out.push_str(report.rule.name());
                out.push('\n');
            },
            Some(failure) => {
                out.push_str("FAIL  ");
                out.push_str(report.rule.name());
                out.push_str(": ");
                out.push_str(failure.message());
                out.push('\n');
                if settings.diagnostics
                    && let Some(dump) = failure.diagnostic()
                {
                    out.push_str(&indent(dump.as_str(), "      "));
                }
            },
        }
    }
    out.push_str(&format!(
        "status: {}\nrules: {} passed, {} failed, {} skipped\n",
        summary.status(),
        summary.passed,
        summary.failed,
        summary.skipped
    ));
    out
}

fn format_check_json(
    config: &Path,
    reports: &[RuleReport<'_>],
    settings: RuleSettings,
    summary: Summary,
) -> Result<String, CliError> {
    let results: Vec<serde_json::Value> = reports
        .iter()
        .map(|report| report.to_json(settings))
        .collect();
    let payload = serde_json::json!({
        "status": summary.status(),
        "configPath": config.to_string_lossy(),
        "settings": settings,
        "results": results,
        "summary": summary.to_json(),
    });
    Ok(json_document(&payload)?)
}

fn format_check_ndjson(
    reports: &[RuleReport<'_>],
    settings: RuleSettings,
    summary: Summary,
) -> Result<String, CliError> {
    let mut out = String::new();
    for report in reports {
        let mut value = report.to_json(settings);
        if let Some(object) = value.as_object_mut() {
            object.insert("type".to_owned(), "rule".into());
        }
        out.push_str(&ndjson_line(&value)?);
    }
    out.push_str(&ndjson_summary(
        summary.status(),
        "check",
        Some(summary.to_json()),
    ));
    Ok(out)
}
