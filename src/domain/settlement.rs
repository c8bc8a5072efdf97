//! Payout rules for a matched wager against a reported value.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::{Symbol, WagerId};
use super::money::Value;
use super::wager::{Credit, Side, Wager};

/// Result of comparing a reported value with a wager's strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Reported value above the strike: over wins.
    Over,
    /// Reported value below the strike: under wins.
    Under,
    /// Reported value equals the strike: both refunded.
    Push,
}

impl Outcome {
    #[must_use]
    pub fn decide(value: Value, strike: Value) -> Self {
        match value.cmp(&strike) {
            std::cmp::Ordering::Greater => Self::Over,
            std::cmp::Ordering::Less => Self::Under,
            std::cmp::Ordering::Equal => Self::Push,
        }
    }

    /// The winning side, if there is one.
    #[must_use]
    pub const fn winner(self) -> Option<Side> {
        match self {
            Self::Over => Some(Side::Over),
            Self::Under => Some(Side::Under),
            Self::Push => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Over => "over",
            Self::Under => "under",
            Self::Push => "push",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved wager and the credits its resolution pays out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub wager_id: WagerId,
    pub symbol: Symbol,
    pub strike: Value,
    pub value: Value,
    pub outcome: Outcome,
    pub credits: Vec<Credit>,
}

impl Settlement {
    /// Compute the payout of `wager` for a reported `value`.
    ///
    /// The winner receives both bets; a push refunds each side its own.
    /// Returns `None` for a wager that is not matched.
    #[must_use]
    pub fn compute(wager: &Wager, value: Value) -> Option<Self> {
        let (over, under) = (wager.over()?, wager.under()?);
        let outcome = Outcome::decide(value, wager.strike());
        // Both bets were drawn from the fixed supply, so the doubled bet fits.
        let credits = match outcome.winner() {
            Some(Side::Over) => vec![Credit::new(over.clone(), wager.bet() * 2)],
            Some(Side::Under) => vec![Credit::new(under.clone(), wager.bet() * 2)],
            None => wager.refunds(),
        };

        Some(Self {
            wager_id: wager.id(),
            symbol: wager.symbol().clone(),
            strike: wager.strike(),
            value,
            outcome,
            credits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::AccountId;
    use crate::domain::wager::NewWager;

    fn matched(strike: Value, bet: u64) -> Wager {
        let terms = NewWager::new("X", Side::Over, strike, bet, 10);
        let mut wager = Wager::open(WagerId::FIRST, terms, AccountId::from("over"));
        wager.fill(AccountId::from("under")).unwrap();
        wager
    }

    #[test]
    fn value_above_strike_pays_over_double() {
        let settlement = Settlement::compute(&matched(100, 50), 120).unwrap();
        assert_eq!(settlement.outcome, Outcome::Over);
        assert_eq!(settlement.credits, vec![Credit::new("over".into(), 100)]);
    }

    #[test]
    fn value_below_strike_pays_under_double() {
        let settlement = Settlement::compute(&matched(100, 50), 80).unwrap();
        assert_eq!(settlement.outcome, Outcome::Under);
        assert_eq!(settlement.credits, vec![Credit::new("under".into(), 100)]);
    }

    #[test]
    fn value_at_strike_refunds_both() {
        let settlement = Settlement::compute(&matched(100, 50), 100).unwrap();
        assert_eq!(settlement.outcome, Outcome::Push);
        assert_eq!(
            settlement.credits,
            vec![Credit::new("over".into(), 50), Credit::new("under".into(), 50)]
        );
    }

    #[test]
    fn open_wager_has_no_settlement() {
        let terms = NewWager::new("X", Side::Under, 100, 50, 10);
        let wager = Wager::open(WagerId::FIRST, terms, AccountId::from("under"));
        assert!(Settlement::compute(&wager, 120).is_none());
    }

    #[test]
    fn credits_always_sum_to_escrow() {
        let wager = matched(100, 37);
        for value in [0, 99, 100, 101, u64::MAX] {
            let settlement = Settlement::compute(&wager, value).unwrap();
            let paid: u64 = settlement.credits.iter().map(|c| c.amount).sum();
            assert_eq!(paid, wager.escrowed(), "value {value}");
        }
    }
}
