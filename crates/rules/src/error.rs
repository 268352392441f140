//! Validation failures and configuration errors.

use crate::hexdump::HexDump;
use propcheck_shared::{ErrorCode, ErrorEnvelope};
use std::fmt;

/// Error namespace used for rule failures.
pub const RULE_ERROR_NAMESPACE: &str = "rule";

/// Why a value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// No value was resolved (absent or empty).
    MissingValue,
    /// A value was resolved but does not fully match the configured pattern.
    PatternMismatch,
}

impl FailureKind {
    /// Stable code identifier (without namespace).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingValue => "missing_value",
            Self::PatternMismatch => "pattern_mismatch",
        }
    }

    /// Stable error code in the `rule` namespace.
    #[must_use]
    pub fn error_code(self) -> ErrorCode {
        ErrorCode::new(RULE_ERROR_NAMESPACE, self.code())
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.code())
    }
}

/// A terminal validation failure.
///
/// `Display` yields only the primary message; the hex dump of a mismatching
/// value is exposed through [`std::error::Error::source`] and
/// [`ValidationFailure::diagnostic`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationFailure {
    kind: FailureKind,
    message: String,
    #[source]
    diagnostic: Option<HexDump>,
}

impl ValidationFailure {
    pub(crate) fn missing(message: String) -> Self {
        Self {
            kind: FailureKind::MissingValue,
            message,
            diagnostic: None,
        }
    }

    pub(crate) fn mismatch(message: String, value: &str) -> Self {
        Self {
            kind: FailureKind::PatternMismatch,
            message,
            diagnostic: Some(HexDump::of_str(value)),
        }
    }

    /// Failure kind.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Primary, human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Hex dump of the rejected value, present for pattern mismatches.
    #[must_use]
    pub const fn diagnostic(&self) -> Option<&HexDump> {
        self.diagnostic.as_ref()
    }
}

impl From<&ValidationFailure> for ErrorEnvelope {
    fn from(failure: &ValidationFailure) -> Self {
        let envelope = Self::expected(failure.kind.error_code(), failure.message.clone());
        match &failure.diagnostic {
            Some(dump) => envelope.with_metadata("hexDump", dump.as_str()),
            None => envelope,
        }
    }
}

impl From<ValidationFailure> for ErrorEnvelope {
    fn from(failure: ValidationFailure) -> Self {
        Self::from(&failure)
    }
}

/// A regular expression that failed to compile.
///
/// Raised when a validator is configured, never while validating.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid regular expression \"{pattern}\": {reason}")]
pub struct InvalidPattern {
    pattern: String,
    reason: String,
}

impl InvalidPattern {
    pub(crate) fn new(pattern: &str, error: &impl fmt::Display) -> Self {
        Self {
            pattern: pattern.to_owned(),
            reason: error.to_string(),
        }
    }

    /// The rejected pattern, as supplied.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Regex engine diagnostic.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl From<InvalidPattern> for ErrorEnvelope {
    fn from(error: InvalidPattern) -> Self {
        Self::expected(
            ErrorCode::new(RULE_ERROR_NAMESPACE, "invalid_pattern"),
            error.to_string(),
        )
        .with_metadata("pattern", error.pattern)
    }
}
