use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Name of a single Tarot card, e.g. `"El Mago"` or `"As de Copas"`.
///
/// Names are the only identifier a card has: they key lesson requests,
/// completion records and the navigation selection.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardName(String);

impl CardName {
    /// Creates a new `CardName`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CardName({:?})", self.0)
    }
}

impl fmt::Display for CardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CardName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CardName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CardName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for CardName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CardName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
