//! # propcheck-core
//!
//! Build metadata for the `propcheck` binary and libraries.
//!
//! Nothing in here depends on another workspace crate, so it can be
//! imported from anywhere. The CLI passes its own package name and version
//! to [`build_info`] and reports the result from `propcheck info`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

/// Compile-time facts about the running binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    /// Binary or package name supplied by the caller.
    pub name: &'static str,
    /// Version supplied by the caller (semver).
    pub version: &'static str,
    /// Minimum supported rustc version declared by the workspace.
    pub rust_version: &'static str,
    /// Target OS family (`unix`, `windows`, ...).
    pub os_family: &'static str,
    /// Target architecture (e.g. `x86_64`).
    pub arch: &'static str,
    /// Build profile (`debug` or `release`).
    pub profile: &'static str,
    /// Short git commit hash, when provided by the build environment.
    pub git_hash: Option<&'static str>,
}

impl BuildInfo {
    /// `name version` or `name version (hash)`.
    ///
    /// ```
    /// use propcheck_core::build_info;
    ///
    /// let info = build_info("propcheck", "0.1.0");
    /// assert!(info.version_string().starts_with("propcheck 0.1.0"));
    /// ```
    #[must_use]
    pub fn version_string(&self) -> String {
        self.git_hash.map_or_else(
            || format!("{} {}", self.name, self.version),
            |hash| format!("{} {} ({hash})", self.name, self.version),
        )
    }

    /// `arch-os_family`, e.g. `x86_64-unix`.
    #[must_use]
    pub fn platform(&self) -> String {
        format!("{}-{}", self.arch, self.os_family)
    }
}

/// Returns build-time information for the binary called `name`.
///
/// `name` and `version` come from the caller, since `env!` here would
/// name this crate. The remaining values are fixed at compile time.
#[must_use]
pub const fn build_info(name: &'static str, version: &'static str) -> BuildInfo {
    BuildInfo {
        name,
        version,
        rust_version: env!("CARGO_PKG_RUST_VERSION"),
        os_family: std::env::consts::FAMILY,
        arch: std::env::consts::ARCH,
        profile: if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
        git_hash: option_env!("PROPCHECK_GIT_HASH"),
    }
}

// =============================================================================
// TESTS
// =============================================================================
