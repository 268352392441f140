//! # propcheck-rules
//!
//! Validation of a single resolved property value against presence and
//! full-string regex constraints, with a hex dump of the value attached to
//! pattern mismatches so invisible characters (trailing whitespace,
//! non-breaking spaces, stray control bytes) show up in the report.
//!
//! ```
//! use propcheck_rules::{FailureKind, RuleOptions, Validator};
//!
//! let validator = Validator::new(RuleOptions::new("Property", "java.version").with_regex(r"1\.8.*"))?;
//!
//! assert!(validator.validate(Some("1.8.0_392")).is_ok());
//!
//! let failure = validator.validate(Some("1.8\u{a0}")).err();
//! assert_eq!(failure.map(|failure| failure.kind()), Some(FailureKind::PatternMismatch));
//! # Ok::<(), propcheck_rules::InvalidPattern>(())
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod error;
pub mod hexdump;
pub mod pattern;
pub mod resolver;
pub mod validator;

pub use error::{FailureKind, InvalidPattern, RULE_ERROR_NAMESPACE, ValidationFailure};
pub use hexdump::{HexDump, LINE_SEPARATOR, hex_dump};
pub use pattern::FullMatchPattern;
pub use resolver::{StaticValue, ValueResolver};
pub use validator::{RuleOptions, ValidationOutcome, ValidationRequest, Validator, validate};

/// Returns the rules crate version.
#[must_use]
pub const fn rules_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
