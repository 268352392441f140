//! Rule-set loading helpers (file + env).
//!
//! Merge order is fixed: file contents first, env overrides last, then the
//! result is validated and every pattern compiled. Failures surface as typed
//! `ErrorEnvelope`s carrying the offending path.

use crate::{RuleSetConfig, RuleSetEnv, ValidatedRuleSet, apply_env_overrides};
use propcheck_shared::{ErrorCode, ErrorEnvelope, ResultExt};
use std::path::Path;

/// Rule-set file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON document.
    Json,
    /// TOML document.
    Toml,
}

impl ConfigFormat {
    /// Detect the format from a file extension (`.json`, `.toml`; none means JSON).
    pub fn from_path(path: &Path) -> Result<Self, ErrorEnvelope> {
        let ext = path
            .extension()
            .and_then(|value| value.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            None | Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            Some(other) => Err(ErrorEnvelope::expected(
                ErrorCode::new("config", "unsupported_format"),
                "unsupported rule set format; use .json or .toml",
            )
            .with_metadata("extension", other.to_string())),
        }
    }
}

/// Parse a rule set from text, apply env overrides, and validate it.
pub fn load_rule_set_from_str(
    input: &str,
    format: ConfigFormat,
    env: &RuleSetEnv,
) -> Result<ValidatedRuleSet, ErrorEnvelope> {
    let config = parse_config_unvalidated(input, format)?;
    apply_env_overrides(config, env)
}

/// Load a rule set from a file.
pub fn load_rule_set_from_path(
    path: &Path,
    env: &RuleSetEnv,
) -> Result<ValidatedRuleSet, ErrorEnvelope> {
    let format = ConfigFormat::from_path(path)?;
    let text = read_config_file(path)?;
    let rules = load_rule_set_from_str(&text, format, env)
        .with_metadata("path", path.to_string_lossy())?;

    tracing::debug!(
        path = %path.display(),
        rules = rules.rules().len(),
        "rule set loaded"
    );
    Ok(rules)
}

/// Load a rule set from a file using the process environment.
pub fn load_rule_set_std_env(path: &Path) -> Result<(ValidatedRuleSet, RuleSetEnv), ErrorEnvelope> {
    let env = RuleSetEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    let rules = load_rule_set_from_path(path, &env)?;
    Ok((rules, env))
}

/// Serialize a rule set as deterministic pretty JSON (with trailing newline).
pub fn to_pretty_json(config: &RuleSetConfig) -> Result<String, ErrorEnvelope> {
    let mut output = serde_json::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("failed to serialize rule set: {error}"),
        )
    })?;
    output.push('\n');
    Ok(output)
}

/// Serialize a rule set as pretty TOML (with trailing newline).
pub fn to_pretty_toml(config: &RuleSetConfig) -> Result<String, ErrorEnvelope> {
    let mut output = toml::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_toml"),
            format!("failed to serialize rule set TOML: {error}"),
        )
    })?;
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

/// Deserialize a rule set without validating or compiling it.
pub(crate) fn parse_config_unvalidated(
    input: &str,
    format: ConfigFormat,
) -> Result<RuleSetConfig, ErrorEnvelope> {
    match format {
        ConfigFormat::Json => serde_json::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_json"),
                format!("invalid rule set JSON: {error}"),
            )
        }),
        ConfigFormat::Toml => toml::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_toml"),
                format!("invalid rule set TOML: {error}"),
            )
        }),
    }
}

fn read_config_file(path: &Path) -> Result<String, ErrorEnvelope> {
    std::fs::read_to_string(path).map_err(|error| {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::new("config", "config_file_not_found"),
            std::io::ErrorKind::PermissionDenied => {
                ErrorCode::new("config", "config_file_permission_denied")
            },
            _ => ErrorCode::new("config", "config_file_io"),
        };

        ErrorEnvelope::expected(code, format!("failed to read rule set file: {error}"))
            .with_metadata("path", path.to_string_lossy().to_string())
    })
}
