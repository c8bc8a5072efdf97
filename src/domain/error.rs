//! Ledger errors raised when an entry point's preconditions are violated.
//!
//! Every variant aborts the whole call: the application layer rolls back
//! any mutation the call attempted before the error is returned.
//!
//! # Examples
//!
//! ```
//! use overunder::domain::error::LedgerError;
//!
//! let err = LedgerError::AlreadyMinted;
//! assert_eq!(err.code(), "AlreadyMinted");
//! assert_eq!(err.to_string(), "ledger has already been minted");
//! ```

use std::fmt;

use thiserror::Error;

use super::id::{AccountId, WagerId};
use super::money::{Amount, Timestamp};

/// Why an account was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountIssue {
    /// The identifier fails the host's syntax check.
    Malformed,
    /// The account has never held a balance.
    NoBalanceRecord,
    /// The caller is not the reporter recorded at mint.
    NotReporter,
}

impl AccountIssue {
    /// Stable description used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "not a valid account identifier",
            Self::NoBalanceRecord => "no balance record",
            Self::NotReporter => "not the authorized reporter",
        }
    }
}

impl fmt::Display for AccountIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a wager could not be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptRefusal {
    /// The wager's expiry has been reached.
    Expired,
    /// Both sides are already taken.
    AlreadyMatched,
    /// The caller holds the other side.
    OwnWager,
}

impl AcceptRefusal {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expired => "wager has expired",
            Self::AlreadyMatched => "wager is already matched",
            Self::OwnWager => "caller already holds the other side",
        }
    }
}

impl fmt::Display for AcceptRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a wager could not be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelRefusal {
    /// The caller holds neither side.
    NotParticipant,
    /// The wager is matched and its cancel-after threshold has not elapsed
    /// (or it has none).
    Matched,
}

impl CancelRefusal {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotParticipant => "caller does not hold a side",
            Self::Matched => "wager is matched and not yet cancellable",
        }
    }
}

impl fmt::Display for CancelRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that reject a ledger call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// `mint` may run only once per ledger lifetime.
    #[error("ledger has already been minted")]
    AlreadyMinted,

    #[error("invalid account '{account}': {issue}")]
    InvalidAccount {
        account: AccountId,
        issue: AccountIssue,
    },

    /// Amounts and strike values must be strictly positive.
    #[error("{field} must be positive, got {amount}")]
    InvalidAmount { field: &'static str, amount: Amount },

    #[error("{field} {value} must be after {after}")]
    InvalidTime {
        field: &'static str,
        value: Timestamp,
        after: Timestamp,
    },

    #[error("unknown wager {id}")]
    InvalidWager { id: WagerId },

    #[error("invalid symbol '{symbol}': {reason}")]
    InvalidSymbol { symbol: String, reason: String },

    #[error("cannot accept wager {id}: {reason}")]
    CannotAccept { id: WagerId, reason: AcceptRefusal },

    #[error("cannot cancel wager {id}: {reason}")]
    CannotCancel { id: WagerId, reason: CancelRefusal },

    #[error("insufficient balance for {account}: {available} < {required}")]
    InsufficientBalance {
        account: AccountId,
        available: Amount,
        required: Amount,
    },
}

impl LedgerError {
    /// Stable error-kind name, used for JSON output and diagnostics.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::AlreadyMinted => "AlreadyMinted",
            Self::InvalidAccount { .. } => "InvalidAccount",
            Self::InvalidAmount { .. } => "InvalidAmount",
            Self::InvalidTime { .. } => "InvalidTime",
            Self::InvalidWager { .. } => "InvalidWager",
            Self::InvalidSymbol { .. } => "InvalidSymbol",
            Self::CannotAccept { .. } => "CannotAccept",
            Self::CannotCancel { .. } => "CannotCancel",
            Self::InsufficientBalance { .. } => "InsufficientBalance",
        }
    }

    pub(crate) fn account(account: &AccountId, issue: AccountIssue) -> Self {
        Self::InvalidAccount {
            account: account.clone(),
            issue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = LedgerError::InsufficientBalance {
            account: AccountId::from("bob"),
            available: 5,
            required: 10,
        };
        assert_eq!(err.to_string(), "insufficient balance for bob: 5 < 10");
        assert_eq!(err.code(), "InsufficientBalance");

        let err = LedgerError::CannotAccept {
            id: WagerId::new(3),
            reason: AcceptRefusal::OwnWager,
        };
        assert_eq!(
            err.to_string(),
            "cannot accept wager 3: caller already holds the other side"
        );
    }
}
