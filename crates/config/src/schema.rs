//! Rule-set schema.
//!
//! ```toml
//! version = 1
//!
//! [settings]
//! failFast = false
//! diagnostics = true
//!
//! [[rules]]
//! name = "java-version"
//! subject = "JDK Version"
//! property = "java.version"
//! regex = '1\.8\..*'
//! regexMessage = "This build needs Java 8"
//! source = { env = "JAVA_VERSION" }
//! ```

use crate::env::RuleSetEnv;
use crate::load::{ConfigFormat, parse_config_unvalidated};
use crate::source::{SourceError, ValueSource};
use propcheck_rules::{InvalidPattern, RuleOptions, ValidationOutcome, Validator};
use propcheck_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Rule-set schema version understood by this crate.
pub const CURRENT_RULE_SET_VERSION: u32 = 1;

/// Subject label used when a rule does not set one.
pub const DEFAULT_SUBJECT: &str = "Property";

/// Parse a rule set from JSON, applying validation and normalization.
pub fn parse_rule_set_json(input: &str) -> Result<ValidatedRuleSet, ErrorEnvelope> {
    parse_config_unvalidated(input, ConfigFormat::Json)?
        .validate_and_normalize()
        .map_err(Into::into)
}

/// Parse a rule set from TOML, applying validation and normalization.
pub fn parse_rule_set_toml(input: &str) -> Result<ValidatedRuleSet, ErrorEnvelope> {
    parse_config_unvalidated(input, ConfigFormat::Toml)?
        .validate_and_normalize()
        .map_err(Into::into)
}

/// Top-level rule-set file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleSetConfig {
    /// Schema version.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Evaluation settings.
    #[serde(default)]
    pub settings: RuleSettings,
    /// Rules, checked in file order.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

const fn default_version() -> u32 {
    CURRENT_RULE_SET_VERSION
}

/// How a rule set is evaluated and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct RuleSettings {
    /// Stop at the first violated rule.
    pub fail_fast: bool,
    /// Include hex dumps of mismatching values in reports.
    pub diagnostics: bool,
    /// Reuse the first default mismatch message of each rule.
    pub legacy_message_cache: bool,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            fail_fast: false,
            diagnostics: true,
            legacy_message_cache: false,
        }
    }
}

/// One rule in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleConfig {
    /// Unique rule name.
    pub name: String,
    /// What is being validated; defaults to [`DEFAULT_SUBJECT`].
    #[serde(default = "default_subject")]
    pub subject: String,
    /// Property name used in default messages.
    pub property: String,
    /// Full-string pattern the value must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    /// Message used when the value is missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Message used when the value does not match `regex`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_message: Option<String>,
    /// Where the value comes from.
    pub source: ValueSource,
}

fn default_subject() -> String {
    DEFAULT_SUBJECT.to_owned()
}

impl RuleConfig {
    fn normalize(&mut self) {
        self.name = self.name.trim().to_owned();
        self.subject = self.subject.trim().to_owned();
        self.property = self.property.trim().to_owned();
        if let ValueSource::Env(name) = &mut self.source {
            *name = name.trim().to_owned();
        }
    }

    fn validate(&self, index: usize) -> Result<(), RuleSetSchemaError> {
        let empty = |field: &'static str| RuleSetSchemaError::EmptyField { index, field };
        if self.name.is_empty() {
            return Err(empty("name"));
        }
        if self.subject.is_empty() {
            return Err(empty("subject"));
        }
        if self.property.is_empty() {
            return Err(empty("property"));
        }
        if matches!(&self.source, ValueSource::Env(name) if name.is_empty()) {
            return Err(empty("source.env"));
        }
        Ok(())
    }

    fn options(&self, settings: RuleSettings) -> RuleOptions {
        RuleOptions {
            subject: self.subject.clone(),
            property: self.property.clone(),
            regex: self.regex.clone(),
            missing_message: self.message.clone(),
            regex_message: self.regex_message.clone(),
            cache_default_message: settings.legacy_message_cache,
        }
    }
}

impl RuleSetConfig {
    /// Validate, normalize, and compile every rule.
    pub fn validate_and_normalize(mut self) -> Result<ValidatedRuleSet, RuleSetSchemaError> {
        if self.version != CURRENT_RULE_SET_VERSION {
            return Err(RuleSetSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_RULE_SET_VERSION,
            });
        }
        if self.rules.is_empty() {
            return Err(RuleSetSchemaError::NoRules);
        }

        let mut seen = BTreeSet::new();
        let mut compiled = Vec::with_capacity(self.rules.len());
        for (index, rule) in self.rules.iter_mut().enumerate() {
            rule.normalize();
            rule.validate(index)?;
            if !seen.insert(rule.name.clone()) {
                return Err(RuleSetSchemaError::DuplicateRule {
                    name: rule.name.clone(),
                });
            }
            let validator = Validator::new(rule.options(self.settings)).map_err(|source| {
                RuleSetSchemaError::InvalidPattern {
                    rule: rule.name.clone(),
                    source,
                }
            })?;
            compiled.push(CompiledRule {
                name: rule.name.clone(),
                source: rule.source.clone(),
                validator,
            });
        }

        tracing::debug!(rules = compiled.len(), "rule set validated");
        Ok(ValidatedRuleSet {
            raw: self,
            rules: compiled,
        })
    }
}

/// A rule with its pattern compiled and ready to run.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    name: String,
    source: ValueSource,
    validator: Validator,
}

impl CompiledRule {
    /// Rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value source.
    #[must_use]
    pub const fn source(&self) -> &ValueSource {
        &self.source
    }

    /// The underlying validator.
    #[must_use]
    pub const fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Resolve the value from `env` and validate it.
    pub fn check(&self, env: &RuleSetEnv) -> Result<ValidationOutcome, SourceError> {
        self.validator.enforce(&self.source.resolver(env))
    }
}

/// A rule set that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedRuleSet {
    raw: RuleSetConfig,
    rules: Vec<CompiledRule>,
}

impl ValidatedRuleSet {
    /// Effective settings.
    #[must_use]
    pub const fn settings(&self) -> RuleSettings {
        self.raw.settings
    }

    /// All compiled rules, in file order.
    #[must_use]
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Rules named in `names` (in file order), or all rules when `names` is empty.
    pub fn select(&self, names: &[String]) -> Result<Vec<&CompiledRule>, RuleSetSchemaError> {
        if let Some(unknown) = names
            .iter()
            .find(|name| !self.rules.iter().any(|rule| rule.name == **name))
        {
            return Err(RuleSetSchemaError::UnknownRule {
                name: unknown.clone(),
            });
        }

        Ok(self
            .rules
            .iter()
            .filter(|rule| names.is_empty() || names.contains(&rule.name))
            .collect())
    }

    /// Borrow the normalized config.
    #[must_use]
    pub const fn as_config(&self) -> &RuleSetConfig {
        &self.raw
    }

    /// Consume the wrapper and return the normalized config.
    #[must_use]
    pub fn into_inner(self) -> RuleSetConfig {
        self.raw
    }
}

/// Typed validation errors for the rule-set schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSetSchemaError {
    /// The file's version is not supported.
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
        /// Version supported by this crate.
        supported: u32,
    },
    /// The file declares no rules.
    NoRules,
    /// A required string field is empty.
    EmptyField {
        /// Position of the rule in the file.
        index: usize,
        /// Field name.
        field: &'static str,
    },
    /// Two rules share a name.
    DuplicateRule {
        /// The repeated name.
        name: String,
    },
    /// A rule's regex does not compile.
    InvalidPattern {
        /// Rule name.
        rule: String,
        /// Regex engine error.
        source: InvalidPattern,
    },
    /// A rule was requested that the file does not define.
    UnknownRule {
        /// Requested name.
        name: String,
    },
}

impl RuleSetSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::new("config", "unsupported_version"),
            Self::NoRules => ErrorCode::new("config", "no_rules"),
            Self::EmptyField { .. } => ErrorCode::new("config", "empty_field"),
            Self::DuplicateRule { .. } => ErrorCode::new("config", "duplicate_rule"),
            Self::InvalidPattern { .. } => ErrorCode::new("config", "invalid_pattern"),
            Self::UnknownRule { .. } => ErrorCode::new("config", "unknown_rule"),
        }
    }
}

impl fmt::Display for RuleSetSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => write!(
                formatter,
                "unsupported rule set version: {found} (supported: {supported})"
            ),
            Self::NoRules => formatter.write_str("rule set must declare at least one rule"),
            Self::EmptyField { index, field } => {
                write!(formatter, "rules[{index}].{field} must not be empty")
            },
            Self::DuplicateRule { name } => write!(formatter, "duplicate rule name: {name}"),
            Self::InvalidPattern { rule, source } => write!(formatter, "rule {rule}: {source}"),
            Self::UnknownRule { name } => write!(formatter, "unknown rule: {name}"),
        }
    }
}

impl std::error::Error for RuleSetSchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<RuleSetSchemaError> for ErrorEnvelope {
    fn from(error: RuleSetSchemaError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());

        match error {
            RuleSetSchemaError::UnsupportedVersion { found, supported } => envelope
                .with_metadata("found", found.to_string())
                .with_metadata("supported", supported.to_string()),
            RuleSetSchemaError::EmptyField { index, field } => envelope
                .with_metadata("index", index.to_string())
                .with_metadata("field", field),
            RuleSetSchemaError::DuplicateRule { name } | RuleSetSchemaError::UnknownRule { name } => {
                envelope.with_metadata("rule", name)
            },
            RuleSetSchemaError::InvalidPattern { rule, source } => envelope
                .with_metadata("rule", rule)
                .with_metadata("pattern", source.pattern()),
            RuleSetSchemaError::NoRules => envelope,
        }
    }
}
