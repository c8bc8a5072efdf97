//! Conservation and index consistency check.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::{Amount, WagerId, WagerState};
use crate::error::{Error, Result};
use crate::port::LedgerStore;

/// Snapshot of the ledger's books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub total_supply: Amount,
    /// Sum of every balance.
    pub circulating: Amount,
    /// Sum of bets held by live wagers.
    pub escrowed: Amount,
    pub open_wagers: usize,
    pub matched_wagers: usize,
    /// Index entries that reference no live wager.
    pub dangling: Vec<WagerId>,
    /// Live wagers missing from an index they belong in.
    pub unindexed: Vec<WagerId>,
}

impl AuditReport {
    /// Balances plus escrow account for exactly the supply.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.circulating.checked_add(self.escrowed) == Some(self.total_supply)
    }

    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.dangling.is_empty() && self.unindexed.is_empty()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.is_balanced() && self.is_consistent()
    }
}

/// Walk every table and cross-check balances, escrow and indexes.
pub fn audit<S: LedgerStore + ?Sized>(store: &S) -> Result<AuditReport> {
    let overflow = || Error::Storage("audit sum overflowed".to_string());

    let balances = store.balances()?;
    let circulating = balances
        .iter()
        .try_fold(0u64, |sum, (_, amount)| sum.checked_add(*amount))
        .ok_or_else(overflow)?;

    let wagers = store.wagers()?;
    let escrowed = wagers
        .iter()
        .try_fold(0u64, |sum, wager| sum.checked_add(wager.escrowed()))
        .ok_or_else(overflow)?;
    let live: BTreeSet<WagerId> = wagers.iter().map(|wager| wager.id()).collect();

    let mut dangling = BTreeSet::new();
    let mut unindexed = BTreeSet::new();

    let mut open_ids = BTreeSet::new();
    let mut matched_ids = BTreeSet::new();
    for symbol in store.symbols()? {
        open_ids.extend(store.open_wagers(&symbol)?);
        matched_ids.extend(
            store
                .matched_wagers(&symbol)?
                .into_iter()
                .map(|entry| entry.wager_id()),
        );
    }
    for (account, _) in &balances {
        dangling.extend(
            store
                .account_wagers(account)?
                .into_iter()
                .filter(|id| !live.contains(id)),
        );
    }
    dangling.extend(open_ids.difference(&live).copied());
    dangling.extend(matched_ids.difference(&live).copied());

    let mut open_wagers = 0;
    let mut matched_wagers = 0;
    for wager in &wagers {
        let id = wager.id();
        let queued = match wager.state() {
            WagerState::Open => {
                open_wagers += 1;
                open_ids.contains(&id) && !matched_ids.contains(&id)
            }
            WagerState::Matched => {
                matched_wagers += 1;
                matched_ids.contains(&id) && !open_ids.contains(&id)
            }
        };
        let mut linked = true;
        for account in wager.participants() {
            linked &= store.account_wagers(account)?.contains(&id);
        }
        if !(queued && linked) {
            unindexed.insert(id);
        }
    }

    Ok(AuditReport {
        total_supply: store.total_supply()?,
        circulating,
        escrowed,
        open_wagers,
        matched_wagers,
        dangling: dangling.into_iter().collect(),
        unindexed: unindexed.into_iter().collect(),
    })
}
