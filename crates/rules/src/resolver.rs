//! Value resolution port.
//!
//! The validator never looks values up itself. A resolver supplies the
//! string to check (or `None` when the property is unset), and any error it
//! raises reaches the caller untouched.

use std::convert::Infallible;

/// Supplies the value a rule validates.
pub trait ValueResolver {
    /// Resolution failure type, propagated verbatim by the validator.
    type Error;

    /// Resolve the value. `Ok(None)` means the property is absent.
    fn resolve(&self) -> Result<Option<String>, Self::Error>;
}

impl<F, E> ValueResolver for F
where
    F: Fn() -> Result<Option<String>, E>,
{
    type Error = E;

    fn resolve(&self) -> Result<Option<String>, E> {
        self()
    }
}

/// Resolver returning a value fixed at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticValue(Option<String>);

impl StaticValue {
    /// A present value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(Some(value.into()))
    }

    /// An absent value.
    #[must_use]
    pub const fn absent() -> Self {
        Self(None)
    }
}

impl From<Option<String>> for StaticValue {
    fn from(value: Option<String>) -> Self {
        Self(value)
    }
}

impl ValueResolver for StaticValue {
    type Error = Infallible;

    fn resolve(&self) -> Result<Option<String>, Infallible> {
        Ok(self.0.clone())
    }
}
