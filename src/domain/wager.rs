//! Wager records and their two-slot state machine.
//!
//! A wager is Open while exactly one of its `over` / `under` slots is
//! filled and Matched once both are, each by a distinct account. Terminal
//! wagers are deleted rather than represented, so no state exists for them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::AcceptRefusal;
use super::id::{AccountId, Symbol, WagerId};
use super::money::{Amount, Timestamp, Value};

/// The two positions of a wager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Bets the reported value ends above the strike.
    Over,
    /// Bets the reported value ends below the strike.
    Under,
}

impl Side {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Over => Self::Under,
            Self::Under => Self::Over,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Over => "over",
            Self::Under => "under",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a live wager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WagerState {
    /// One side filled, waiting for a counterparty.
    Open,
    /// Both sides filled, waiting for settlement.
    Matched,
}

impl WagerState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Matched => "matched",
        }
    }
}

impl fmt::Display for WagerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terms requested by the creator of a wager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWager {
    pub symbol: Symbol,
    pub side: Side,
    pub strike: Value,
    pub bet: Amount,
    pub expires_at: Timestamp,
    pub cancel_after: Option<Timestamp>,
}

impl NewWager {
    /// Terms without a cancel-after threshold.
    pub fn new(
        symbol: impl Into<Symbol>,
        side: Side,
        strike: Value,
        bet: Amount,
        expires_at: Timestamp,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            strike,
            bet,
            expires_at,
            cancel_after: None,
        }
    }

    /// Allow either participant to cancel once `at` has been reached.
    #[must_use]
    pub fn cancel_after(mut self, at: Timestamp) -> Self {
        self.cancel_after = Some(at);
        self
    }
}

/// A credit owed to one account when a wager leaves escrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
    pub account: AccountId,
    pub amount: Amount,
}

impl Credit {
    #[must_use]
    pub fn new(account: AccountId, amount: Amount) -> Self {
        Self { account, amount }
    }
}

/// A live wager.
///
/// The identity fields never change after creation; only the empty slot
/// is filled, once, by [`Wager::fill`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wager {
    id: WagerId,
    symbol: Symbol,
    strike: Value,
    expires_at: Timestamp,
    bet: Amount,
    cancel_after: Option<Timestamp>,
    over: Option<AccountId>,
    under: Option<AccountId>,
}

impl Wager {
    /// Create an Open wager with `creator` on the requested side.
    #[must_use]
    pub fn open(id: WagerId, terms: NewWager, creator: AccountId) -> Self {
        let (over, under) = match terms.side {
            Side::Over => (Some(creator), None),
            Side::Under => (None, Some(creator)),
        };
        Self {
            id,
            symbol: terms.symbol,
            strike: terms.strike,
            expires_at: terms.expires_at,
            bet: terms.bet,
            cancel_after: terms.cancel_after,
            over,
            under,
        }
    }

    #[must_use]
    pub fn id(&self) -> WagerId {
        self.id
    }

    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    #[must_use]
    pub fn strike(&self) -> Value {
        self.strike
    }

    #[must_use]
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Amount each participant escrows.
    #[must_use]
    pub fn bet(&self) -> Amount {
        self.bet
    }

    #[must_use]
    pub fn cancel_after(&self) -> Option<Timestamp> {
        self.cancel_after
    }

    #[must_use]
    pub fn over(&self) -> Option<&AccountId> {
        self.over.as_ref()
    }

    #[must_use]
    pub fn under(&self) -> Option<&AccountId> {
        self.under.as_ref()
    }

    /// The account holding `side`, if any.
    #[must_use]
    pub fn holder(&self, side: Side) -> Option<&AccountId> {
        match side {
            Side::Over => self.over(),
            Side::Under => self.under(),
        }
    }

    #[must_use]
    pub fn state(&self) -> WagerState {
        if self.over.is_some() && self.under.is_some() {
            WagerState::Matched
        } else {
            WagerState::Open
        }
    }

    /// The unfilled side of an Open wager.
    #[must_use]
    pub fn open_side(&self) -> Option<Side> {
        match (&self.over, &self.under) {
            (None, Some(_)) => Some(Side::Over),
            (Some(_), None) => Some(Side::Under),
            _ => None,
        }
    }

    /// Accounts currently holding a side, over first.
    pub fn participants(&self) -> impl Iterator<Item = &AccountId> {
        self.over.iter().chain(self.under.iter())
    }

    #[must_use]
    pub fn is_participant(&self, account: &AccountId) -> bool {
        self.participants().any(|held| held == account)
    }

    /// Total amount this wager holds in escrow.
    #[must_use]
    pub fn escrowed(&self) -> Amount {
        self.bet * self.participants().count() as Amount
    }

    /// Whether the wager can no longer be accepted at `now`.
    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }

    /// Whether the cancel-after threshold has been reached at `now`.
    #[must_use]
    pub fn cancel_unlocked(&self, now: Timestamp) -> bool {
        self.cancel_after.is_some_and(|at| now >= at)
    }

    /// Fill the empty side with `account`, moving the wager to Matched.
    ///
    /// # Errors
    ///
    /// Refuses when the wager is already matched or `account` holds the
    /// filled side.
    pub fn fill(&mut self, account: AccountId) -> Result<Side, AcceptRefusal> {
        let side = self.open_side().ok_or(AcceptRefusal::AlreadyMatched)?;
        if self.is_participant(&account) {
            return Err(AcceptRefusal::OwnWager);
        }
        match side {
            Side::Over => self.over = Some(account),
            Side::Under => self.under = Some(account),
        }
        Ok(side)
    }

    /// Credits returning every escrowed bet to its depositor.
    #[must_use]
    pub fn refunds(&self) -> Vec<Credit> {
        self.participants()
            .map(|account| Credit::new(account.clone(), self.bet))
            .collect()
    }
}
