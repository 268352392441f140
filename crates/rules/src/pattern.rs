//! Full-string regular expressions.

use crate::error::InvalidPattern;
use regex_automata::meta::{self, Regex};
use regex_syntax::hir::{Hir, Look};
use std::fmt;

/// A compiled pattern that only accepts input it matches end to end.
///
/// `1\.5.*` accepts `1.5.0` but rejects `v1.5.0`, even though the latter
/// contains a match.
#[derive(Debug, Clone)]
pub struct FullMatchPattern {
    source: String,
    anchored: Regex,
}

impl FullMatchPattern {
    /// Compile `pattern`, anchoring it at both ends.
    ///
    /// Anchors are added to the parsed syntax tree rather than the text, so
    /// verbose-mode comments and inline flags cannot swallow them.
    pub fn new(pattern: &str) -> Result<Self, InvalidPattern> {
        let hir = regex_syntax::parse(pattern).map_err(|error| InvalidPattern::new(pattern, &error))?;
        let anchored = Hir::concat(vec![Hir::look(Look::Start), hir, Hir::look(Look::End)]);
        let anchored = meta::Builder::new()
            .build_from_hir(&anchored)
            .map_err(|error| InvalidPattern::new(pattern, &error))?;

        Ok(Self {
            source: pattern.to_owned(),
            anchored,
        })
    }

    /// The pattern text as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true when the whole of `value` matches.
    #[must_use]
    pub fn is_full_match(&self, value: &str) -> bool {
        self.anchored.is_match(value)
    }
}

impl fmt::Display for FullMatchPattern {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.source)
    }
}

impl PartialEq for FullMatchPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for FullMatchPattern {}
