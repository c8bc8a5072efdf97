//! Host primitives the ledger consumes per call.

use crate::domain::{AccountId, Timestamp};

/// Source of the ambient time reading.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Syntax check for account identifiers supplied as call arguments.
pub trait AccountRules: Send + Sync {
    fn is_valid_account(&self, raw: &str) -> bool;
}

/// Caller identity and clock reading for one ledger call.
///
/// Built once per call by the host; the ledger never advances `now`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    caller: AccountId,
    now: Timestamp,
}

impl CallContext {
    #[must_use]
    pub fn new(caller: impl Into<AccountId>, now: Timestamp) -> Self {
        Self {
            caller: caller.into(),
            now,
        }
    }

    /// Read the clock once and pin it for the call.
    #[must_use]
    pub fn at(clock: &dyn Clock, caller: impl Into<AccountId>) -> Self {
        Self::new(caller, clock.now())
    }

    #[must_use]
    pub fn caller(&self) -> &AccountId {
        &self.caller
    }

    #[must_use]
    pub fn now(&self) -> Timestamp {
        self.now
    }
}
