//! Traded instrument identifiers.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Identifier of a traded symbol (e.g., "btcusdt", "ethbtc").
///
/// Identifiers are trimmed and lower-cased on construction so that feed and
/// seed sources spelling the same symbol differently route to the same chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize)]
#[serde(transparent)]
pub struct InstrumentId(String);

impl InstrumentId {
    /// Creates a normalized instrument identifier.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_lowercase())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the upper-case ticker form used by exchange APIs.
    #[must_use]
    pub fn symbol(&self) -> String {
        self.0.to_uppercase()
    }

    /// Returns true if the identifier is empty after normalization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for InstrumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for InstrumentId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl AsRef<str> for InstrumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for InstrumentId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}
