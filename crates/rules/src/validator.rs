//! The property validator.
//!
//! A [`Validator`] is built once from [`RuleOptions`] and can then check any
//! number of values:
//!
//! 1. presence: an absent or empty value fails with
//!    [`FailureKind::MissingValue`]
//! 2. pattern: when a regex is configured, the value must match it end to
//!    end or the check fails with [`FailureKind::PatternMismatch`], carrying
//!    a hex dump of the value's bytes
//!
//! Presence always wins over the pattern check.

use crate::error::{FailureKind, InvalidPattern, ValidationFailure};
use crate::pattern::FullMatchPattern;
use crate::resolver::ValueResolver;
use std::sync::OnceLock;

/// Result of a single validation: success, or one terminal failure.
pub type ValidationOutcome = Result<(), ValidationFailure>;

/// Configuration for a validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOptions {
    /// What is being validated (e.g. `Property`, `JDK Version`).
    pub subject: String,
    /// Name of the property, used in default messages.
    pub property: String,
    /// Pattern the whole value must match. `None` accepts any present value.
    pub regex: Option<String>,
    /// Replaces the default message when the value is missing.
    pub missing_message: Option<String>,
    /// Replaces the default message when the pattern does not match.
    pub regex_message: Option<String>,
    /// Legacy behaviour: build the default mismatch message on the first
    /// mismatch and reuse it for every later one.
    pub cache_default_message: bool,
}

impl RuleOptions {
    /// Options with only the labels set.
    pub fn new(subject: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            property: property.into(),
            regex: None,
            missing_message: None,
            regex_message: None,
            cache_default_message: false,
        }
    }

    /// Require values to match `regex`.
    #[must_use]
    pub fn with_regex(mut self, regex: impl Into<String>) -> Self {
        self.regex = Some(regex.into());
        self
    }

    /// Override the missing-value message.
    #[must_use]
    pub fn with_missing_message(mut self, message: impl Into<String>) -> Self {
        self.missing_message = Some(message.into());
        self
    }

    /// Override the pattern-mismatch message.
    #[must_use]
    pub fn with_regex_message(mut self, message: impl Into<String>) -> Self {
        self.regex_message = Some(message.into());
        self
    }

    /// Toggle legacy caching of the default mismatch message.
    #[must_use]
    pub const fn with_cached_default_message(mut self, enabled: bool) -> Self {
        self.cache_default_message = enabled;
        self
    }

    /// Default message for an absent value.
    #[must_use]
    pub fn default_missing_message(&self) -> String {
        format!(
            "{} \"{}\" is required for this build.",
            self.subject, self.property
        )
    }

    /// Default message for a value that does not match `regex`.
    #[must_use]
    pub fn default_mismatch_message(&self, value: &str, regex: &str) -> String {
        format!(
            "{} \"{}\" evaluates to \"{value}\".  This does not match the regular expression \"{regex}\"",
            self.subject, self.property
        )
    }
}

/// A single validation request: a value plus the rule it is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    /// The resolved value, if any.
    pub value: Option<String>,
    /// Constraints and labels.
    pub options: RuleOptions,
}

impl ValidationRequest {
    /// Build a request.
    pub fn new(value: Option<String>, options: RuleOptions) -> Self {
        Self { value, options }
    }
}

/// Validate a one-off request.
///
/// The outer `Result` reports a malformed pattern; the inner one is the
/// validation outcome.
pub fn validate(request: &ValidationRequest) -> Result<ValidationOutcome, InvalidPattern> {
    let validator = Validator::new(request.options.clone())?;
    Ok(validator.validate(request.value.as_deref()))
}

/// Reusable, pre-compiled validator.
///
/// `Validator` is `Send + Sync`; concurrent calls need no locking.
#[derive(Debug, Clone)]
pub struct Validator {
    options: RuleOptions,
    pattern: Option<FullMatchPattern>,
    cached_mismatch: OnceLock<String>,
}

impl Validator {
    /// Compile the options. A malformed regex is rejected here.
    pub fn new(options: RuleOptions) -> Result<Self, InvalidPattern> {
        let pattern = options
            .regex
            .as_deref()
            .map(FullMatchPattern::new)
            .transpose()?;

        Ok(Self {
            options,
            pattern,
            cached_mismatch: OnceLock::new(),
        })
    }

    /// The options this validator was built from.
    #[must_use]
    pub const fn options(&self) -> &RuleOptions {
        &self.options
    }

    /// The compiled pattern, if one is configured.
    #[must_use]
    pub const fn pattern(&self) -> Option<&FullMatchPattern> {
        self.pattern.as_ref()
    }

    /// Check a resolved value.
    pub fn validate(&self, value: Option<&str>) -> ValidationOutcome {
        let outcome = self.check(value);
        match &outcome {
            Ok(()) => tracing::debug!(
                subject = %self.options.subject,
                property = %self.options.property,
                "rule passed"
            ),
            Err(failure) => tracing::info!(
                subject = %self.options.subject,
                property = %self.options.property,
                code = failure.kind().code(),
                "rule failed"
            ),
        }
        outcome
    }

    /// Resolve the value once and check it.
    ///
    /// Resolver errors are returned as-is in the outer `Result`.
    pub fn enforce<R>(&self, resolver: &R) -> Result<ValidationOutcome, R::Error>
    where
        R: ValueResolver + ?Sized,
    {
        let value = resolver.resolve()?;
        Ok(self.validate(value.as_deref()))
    }

    fn check(&self, value: Option<&str>) -> ValidationOutcome {
        let Some(value) = value.filter(|value| !value.is_empty()) else {
            let message = self
                .options
                .missing_message
                .clone()
                .unwrap_or_else(|| self.options.default_missing_message());
            return Err(ValidationFailure::missing(message));
        };

        match &self.pattern {
            Some(pattern) if !pattern.is_full_match(value) => {
                let message = self.mismatch_message(value, pattern);
                Err(ValidationFailure::mismatch(message, value))
            },
            _ => Ok(()),
        }
    }

    fn mismatch_message(&self, value: &str, pattern: &FullMatchPattern) -> String {
        if let Some(message) = &self.options.regex_message {
            return message.clone();
        }
        if self.options.cache_default_message {
            return self
                .cached_mismatch
                .get_or_init(|| {
                    self.options
                        .default_mismatch_message(value, pattern.as_str())
                })
                .clone();
        }
        self.options
            .default_mismatch_message(value, pattern.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::StaticValue;
    use std::error::Error as _;

    fn version_rule() -> RuleOptions {
        RuleOptions::new("JDK Version", "java.version")
    }

    #[test]
    fn absent_value_uses_default_missing_message() -> Result<(), InvalidPattern> {
        let validator = Validator::new(version_rule())?;
        let failure = validator.validate(None).err();

        assert_eq!(failure.as_ref().map(ValidationFailure::kind), Some(FailureKind::MissingValue));
        assert_eq!(
            failure.as_ref().map(ValidationFailure::message),
            Some("JDK Version \"java.version\" is required for this build.")
        );
        Ok(())
    }

    #[test]
    fn empty_value_counts_as_missing() -> Result<(), InvalidPattern> {
        let validator = Validator::new(version_rule())?;
        let failure = validator.validate(Some("")).err();

        assert_eq!(failure.map(|failure| failure.kind()), Some(FailureKind::MissingValue));
        Ok(())
    }

    #[test]
    fn custom_missing_message_is_used_verbatim() -> Result<(), InvalidPattern> {
        let validator = Validator::new(version_rule().with_missing_message("X is mandatory"))?;
        let failure = validator.validate(None).err();

        assert_eq!(failure.map(|failure| failure.to_string()), Some("X is mandatory".to_owned()));
        Ok(())
    }

    #[test]
    fn presence_check_wins_over_pattern() -> Result<(), InvalidPattern> {
        let validator = Validator::new(version_rule().with_regex("never"))?;
        let failure = validator.validate(None).err();

        assert_eq!(failure.map(|failure| failure.kind()), Some(FailureKind::MissingValue));
        Ok(())
    }

    #[test]
    fn present_value_without_regex_passes() -> Result<(), InvalidPattern> {
        let validator = Validator::new(version_rule())?;
        assert_eq!(validator.validate(Some("anything at all")), Ok(()));
        Ok(())
    }

    #[test]
    fn mismatch_uses_default_message_and_attaches_dump() -> Result<(), InvalidPattern> {
        let validator = Validator::new(version_rule().with_regex(r"1\.5.*"))?;
        let failure = validator.validate(Some("1.4")).err();

        assert_eq!(
            failure.as_ref().map(ValidationFailure::message),
            Some(
                "JDK Version \"java.version\" evaluates to \"1.4\".  This does not match the regular expression \"1\\.5.*\""
            )
        );
        assert_eq!(
            failure
                .as_ref()
                .and_then(ValidationFailure::diagnostic)
                .map(|dump| dump.as_str().to_owned()),
            Some(format!("0001  |  31 2E 34 {}", crate::hexdump::LINE_SEPARATOR))
        );
        assert!(failure.as_ref().and_then(|failure| failure.source()).is_some());
        Ok(())
    }

    #[test]
    fn custom_regex_message_is_used_verbatim() -> Result<(), InvalidPattern> {
        let validator = Validator::new(
            version_rule()
                .with_regex("8")
                .with_regex_message("Java 8 only"),
        )?;
        let failure = validator.validate(Some("11")).err();

        assert_eq!(failure.as_ref().map(ValidationFailure::message), Some("Java 8 only"));
        assert!(failure.and_then(|failure| failure.diagnostic().cloned()).is_some());
        Ok(())
    }

    #[test]
    fn partial_match_fails() -> Result<(), InvalidPattern> {
        let validator = Validator::new(version_rule().with_regex("1.8"))?;

        assert!(validator.validate(Some("1.8")).is_ok());
        assert!(validator.validate(Some("1.8.0_192")).is_err());
        Ok(())
    }

    #[test]
    fn trailing_whitespace_is_visible_in_dump() -> Result<(), InvalidPattern> {
        let validator = Validator::new(version_rule().with_regex(r"1\.8"))?;
        let dump = validator
            .validate(Some("1.8 "))
            .err()
            .and_then(|failure| failure.diagnostic().map(|dump| dump.as_str().to_owned()));

        assert!(dump.is_some_and(|dump| dump.contains("31 2E 38 20 ")));
        Ok(())
    }

    #[test]
    fn default_message_is_recomputed_per_call() -> Result<(), InvalidPattern> {
        let validator = Validator::new(version_rule().with_regex("9"))?;
        let first = validator.validate(Some("7")).err().map(|failure| failure.to_string());
        let second = validator.validate(Some("8")).err().map(|failure| failure.to_string());

        assert!(first.is_some_and(|message| message.contains("evaluates to \"7\"")));
        assert!(second.is_some_and(|message| message.contains("evaluates to \"8\"")));
        Ok(())
    }

    #[test]
    fn legacy_cache_reuses_first_default_message() -> Result<(), InvalidPattern> {
        let validator = Validator::new(
            version_rule()
                .with_regex("9")
                .with_cached_default_message(true),
        )?;
        let first = validator.validate(Some("7")).err();
        let second = validator.validate(Some("8")).err();

        assert_eq!(
            first.as_ref().map(ValidationFailure::message),
            second.as_ref().map(ValidationFailure::message)
        );
        // The dump still reflects the value of each call.
        assert_ne!(
            first.and_then(|failure| failure.diagnostic().cloned()),
            second.and_then(|failure| failure.diagnostic().cloned())
        );
        Ok(())
    }

    #[test]
    fn invalid_pattern_is_rejected_at_construction() {
        let error = Validator::new(version_rule().with_regex("(")).err();
        assert_eq!(error.as_ref().map(InvalidPattern::pattern), Some("("));
    }

    #[test]
    fn enforce_resolves_once_and_validates() -> Result<(), InvalidPattern> {
        let calls = std::cell::Cell::new(0_u32);
        let resolver = || {
            calls.set(calls.get() + 1);
            Ok::<_, std::convert::Infallible>(Some("1.4".to_owned()))
        };
        let validator = Validator::new(version_rule().with_regex(r"1\.5.*"))?;
        let outcome = validator.enforce(&resolver);

        assert_eq!(calls.get(), 1);
        assert!(matches!(outcome, Ok(Err(ref failure)) if failure.kind() == FailureKind::PatternMismatch));
        Ok(())
    }

    #[test]
    fn enforce_passes_resolver_errors_through() -> Result<(), InvalidPattern> {
        #[derive(Debug, PartialEq, Eq)]
        struct LookupFailed(&'static str);

        let resolver = || Err::<Option<String>, _>(LookupFailed("no such property"));
        let validator = Validator::new(version_rule())?;

        assert_eq!(
            validator.enforce(&resolver).err(),
            Some(LookupFailed("no such property"))
        );
        Ok(())
    }

    #[test]
    fn enforce_accepts_static_values() -> Result<(), InvalidPattern> {
        let validator = Validator::new(version_rule())?;
        assert_eq!(validator.enforce(&StaticValue::new("1.8")), Ok(Ok(())));
        assert!(matches!(validator.enforce(&StaticValue::absent()), Ok(Err(_))));
        Ok(())
    }

    #[test]
    fn one_shot_validate_reports_bad_patterns() {
        let request = ValidationRequest::new(Some("x".to_owned()), version_rule().with_regex("["));
        assert!(validate(&request).is_err());
    }

    #[test]
    fn validator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validator>();
    }
}
