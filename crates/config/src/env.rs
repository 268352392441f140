//! Environment variable parsing and env-to-config merging.
//!
//! The environment is read once into a [`RuleSetEnv`] snapshot. The snapshot
//! carries the `PROPCHECK_*` setting overrides and the variables that
//! `env` value sources read from, so a whole rule set is checked against one
//! consistent view of the process environment.

use crate::schema::{RuleSetConfig, ValidatedRuleSet};
use propcheck_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fmt;

/// Env var: stop at the first violated rule.
pub const ENV_FAIL_FAST: &str = "PROPCHECK_FAIL_FAST";
/// Env var: include hex dumps in reports.
pub const ENV_DIAGNOSTICS: &str = "PROPCHECK_DIAGNOSTICS";
/// Env var: reuse the first default mismatch message per rule.
pub const ENV_LEGACY_MESSAGE_CACHE: &str = "PROPCHECK_LEGACY_MESSAGE_CACHE";

/// Snapshot of the environment plus parsed setting overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSetEnv {
    /// Override for `settings.failFast`.
    pub fail_fast: Option<bool>,
    /// Override for `settings.diagnostics`.
    pub diagnostics: Option<bool>,
    /// Override for `settings.legacyMessageCache`.
    pub legacy_message_cache: Option<bool>,
    vars: BTreeMap<String, OsString>,
}

impl RuleSetEnv {
    /// Snapshot the process environment.
    ///
    /// Variables whose names are not valid Unicode are skipped; values are
    /// kept raw so sources can report non-Unicode contents.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let vars = std::env::vars_os()
            .filter_map(|(key, value)| key.into_string().ok().map(|key| (key, value)))
            .collect();
        Self::from_os_map(vars)
    }

    /// Parse from a key/value map (useful for tests and fixtures).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Self::from_os_map(
            map.iter()
                .map(|(key, value)| (key.clone(), OsString::from(value)))
                .collect(),
        )
    }

    /// Parse from a map of raw values.
    pub fn from_os_map(vars: BTreeMap<String, OsString>) -> Result<Self, EnvParseError> {
        Ok(Self {
            fail_fast: parse_optional_bool(&vars, ENV_FAIL_FAST)?,
            diagnostics: parse_optional_bool(&vars, ENV_DIAGNOSTICS)?,
            legacy_message_cache: parse_optional_bool(&vars, ENV_LEGACY_MESSAGE_CACHE)?,
            vars,
        })
    }

    /// Add a variable to the snapshot without touching the parsed overrides.
    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Raw value of a variable in the snapshot.
    #[must_use]
    pub fn var(&self, name: &str) -> Option<&OsStr> {
        self.vars.get(name).map(OsString::as_os_str)
    }
}

/// Apply env overrides on top of a parsed rule set, then validate it.
pub fn apply_env_overrides(
    config: RuleSetConfig,
    env: &RuleSetEnv,
) -> Result<ValidatedRuleSet, ErrorEnvelope> {
    let mut config = config;
    if let Some(value) = env.fail_fast {
        config.settings.fail_fast = value;
    }
    if let Some(value) = env.diagnostics {
        config.settings.diagnostics = value;
    }
    if let Some(value) = env.legacy_message_cache {
        config.settings.legacy_message_cache = value;
    }

    config.validate_and_normalize().map_err(Into::into)
}

fn parse_optional_bool(
    vars: &BTreeMap<String, OsString>,
    var: &'static str,
) -> Result<Option<bool>, EnvParseError> {
    let Some(raw) = vars.get(var) else {
        return Ok(None);
    };
    let Some(raw) = raw.to_str() else {
        return Err(EnvParseError::NotUnicode { var });
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(EnvParseError::InvalidBool {
            var,
            value: raw.to_owned(),
        }),
    }
}

/// Typed env parsing errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Boolean env var had an invalid value.
    InvalidBool {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// An override var was not valid Unicode.
    NotUnicode {
        /// Env var name.
        var: &'static str,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "env_empty"),
            Self::InvalidBool { .. } => ErrorCode::new("config", "env_invalid_bool"),
            Self::NotUnicode { .. } => ErrorCode::new("config", "env_not_unicode"),
        }
    }

    const fn var(&self) -> &'static str {
        match self {
            Self::EmptyValue { var } | Self::InvalidBool { var, .. } | Self::NotUnicode { var } => {
                *var
            },
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} is set but empty"),
            Self::InvalidBool { var, value } => {
                write!(formatter, "{var} must be a boolean (got {value:?})")
            },
            Self::NotUnicode { var } => write!(formatter, "{var} is not valid unicode"),
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        Self::expected(error.error_code(), error.to_string()).with_metadata("var", error.var())
    }
}
