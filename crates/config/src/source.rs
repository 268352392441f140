use crate::env::RuleSetEnv;
use propcheck_rules::ValueResolver;
use propcheck_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a rule's value comes from.
///
/// In TOML: `source = { value = "1.8" }`, `source = { env = "JAVA_VERSION" }`
/// or `source = "unset"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueSource {
    /// A literal value.
    Value(String),
    /// An environment variable; unset means the value is absent.
    Env(String),
    /// Always absent.
    Unset,
}

impl ValueSource {
    /// Bind the source to an environment snapshot.
    #[must_use]
    pub const fn resolver<'a>(&'a self, env: &'a RuleSetEnv) -> SourceResolver<'a> {
        SourceResolver { source: self, env }
    }
}

impl fmt::Display for ValueSource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(_) => formatter.write_str("literal"),
            Self::Env(name) => write!(formatter, "env:{name}"),
            Self::Unset => formatter.write_str("unset"),
        }
    }
}

/// A [`ValueSource`] bound to the environment it reads from.
#[derive(Debug, Clone, Copy)]
pub struct SourceResolver<'a> {
    source: &'a ValueSource,
    env: &'a RuleSetEnv,
}

impl ValueResolver for SourceResolver<'_> {
    type Error = SourceError;

    fn resolve(&self) -> Result<Option<String>, SourceError> {
        match self.source {
            ValueSource::Value(value) => Ok(Some(value.clone())),
            ValueSource::Unset => Ok(None),
            ValueSource::Env(name) => match self.env.var(name) {
                None => Ok(None),
                Some(raw) => raw
                    .to_str()
                    .map(|value| Some(value.to_owned()))
                    .ok_or_else(|| SourceError::NotUnicode { name: name.clone() }),
            },
        }
    }
}

/// Failure to read a value from its source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The variable is set but its contents are not valid Unicode.
    #[error("environment variable {name} is not valid unicode")]
    NotUnicode {
        /// Variable name.
        name: String,
    },
}

impl From<SourceError> for ErrorEnvelope {
    fn from(error: SourceError) -> Self {
        let message = error.to_string();
        match error {
            SourceError::NotUnicode { name } => {
                Self::expected(ErrorCode::new("source", "env_not_unicode"), message)
                    .with_metadata("var", name)
            },
        }
    }
}
