//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Account identifier - newtype for type safety.
///
/// Construction does not check syntax; entry points run the host's
/// account rules before trusting a caller-supplied identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new `AccountId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the account ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Name of the quantity a wager is struck on, e.g. `"BTC"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new `Symbol` from a string.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Get the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, as compared against the configured bound.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Unique wager identifier.
///
/// Allocated from a monotonic counter starting at [`WagerId::FIRST`];
/// an id is never handed out twice.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WagerId(u64);

impl WagerId {
    /// The first id a fresh ledger allocates.
    pub const FIRST: Self = Self(1);

    /// Create a new `WagerId` from a u64 value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// The id allocated after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl Default for WagerId {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for WagerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for WagerId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wager_ids_start_at_one_and_advance() {
        let first = WagerId::default();
        assert_eq!(first, WagerId::FIRST);
        assert_eq!(first.value(), 1);
        assert_eq!(first.next().value(), 2);
    }

    #[test]
    fn symbol_length_counts_characters() {
        assert_eq!(Symbol::from("BTC").len(), 3);
        assert_eq!(Symbol::from("€UR").len(), 3);
        assert!(Symbol::from("").is_empty());
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&AccountId::from("alice")).unwrap();
        assert_eq!(json, "\"alice\"");

        let id: WagerId = serde_json::from_str("7").unwrap();
        assert_eq!(id, WagerId::new(7));
    }
}
