//! # propcheck-config
//!
//! Rule-set schema, validation, and loading for the CLI, plus the two value
//! sources a rule can read from (a literal or an environment variable).
//! This crate depends on `rules` and `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Rule-set loading helpers (file + env).
pub mod load;
/// Rule-set schema types and validation.
pub mod schema;
/// Value sources backing each rule.
pub mod source;

pub use env::{
    ENV_DIAGNOSTICS, ENV_FAIL_FAST, ENV_LEGACY_MESSAGE_CACHE, EnvParseError, RuleSetEnv,
    apply_env_overrides,
};
pub use load::{
    ConfigFormat, load_rule_set_from_path, load_rule_set_from_str, load_rule_set_std_env,
    to_pretty_json, to_pretty_toml,
};
pub use schema::{
    CURRENT_RULE_SET_VERSION, CompiledRule, DEFAULT_SUBJECT, RuleConfig, RuleSetConfig,
    RuleSetSchemaError, RuleSettings, ValidatedRuleSet, parse_rule_set_json, parse_rule_set_toml,
};
pub use source::{SourceError, SourceResolver, ValueSource};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use propcheck_rules::rules_crate_version;
    use propcheck_shared::shared_crate_version;

    #[test]
    fn config_can_use_rules_and_shared() {
        assert!(!config_crate_version().is_empty());
        assert!(!rules_crate_version().is_empty());
        assert!(!shared_crate_version().is_empty());
    }
}
