//! # propcheck-shared
//!
//! Error envelope and result types shared by every propcheck crate.
//!
//! Each crate keeps its own typed errors and converts them into an
//! [`ErrorEnvelope`] at its boundary, so callers (the CLI in particular) only
//! ever deal with one error shape.
//!
//! ## Design Principles
//!
//! 1. **No workspace dependencies** - This crate only depends on external crates
//! 2. **Stable codes** - `namespace:code` identifiers never change meaning
//! 3. **Serde-compatible** - Envelopes serialize for JSON output

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod errors;
pub mod result;

pub use errors::{ErrorCode, ErrorEnvelope, ErrorKind, ErrorMetadata};
pub use result::{Result, ResultExt};

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::errors::{ErrorCode, ErrorEnvelope, ErrorKind};
    use super::result::Result;

    #[test]
    fn shared_error_types_are_available() {
        let error = ErrorEnvelope::expected(ErrorCode::new("rule", "missing_value"), "invalid");
        assert_eq!(error.kind, ErrorKind::Expected);
    }

    #[test]
    fn shared_result_defaults_to_envelope() {
        let value: Result<i32> = Err(ErrorEnvelope::expected(ErrorCode::internal(), "boom"));
        assert!(value.is_err());
    }
}
