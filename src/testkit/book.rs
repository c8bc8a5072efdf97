//! Wager book fixtures.
//!
//! Every fixture mints with [`REPORTER`] at time zero, so `report_symbol`
//! calls in tests come from that account.

use super::domain::{account, ctx};
use crate::adapter::outbound::MemoryStore;
use crate::application::{BookSettings, WagerBook};
use crate::domain::{Amount, NewWager, Timestamp, WagerId};

/// Account that mints and reports in every fixture.
pub const REPORTER: &str = "oracle";

/// Supply used by [`minted`].
pub const SUPPLY: Amount = 1_000_000;

/// Empty book over a memory store with a small supply.
pub fn empty() -> WagerBook<MemoryStore> {
    WagerBook::new(
        MemoryStore::new(),
        BookSettings {
            total_supply: SUPPLY,
            ..BookSettings::default()
        },
    )
}

/// Book minted by [`REPORTER`].
pub fn minted() -> WagerBook<MemoryStore> {
    let book = empty();
    book.mint(&ctx(REPORTER, 0)).expect("mint fixture");
    book
}

/// Minted book where each of `accounts` received `amount` from the reporter.
pub fn funded(accounts: &[&str], amount: Amount) -> WagerBook<MemoryStore> {
    let book = minted();
    for name in accounts {
        fund(&book, name, amount);
    }
    book
}

/// Transfer `amount` from the reporter to `name`.
pub fn fund(book: &WagerBook<MemoryStore>, name: &str, amount: Amount) {
    book.transfer(&ctx(REPORTER, 0), &account(name), amount).expect("fund fixture");
}

/// Create `terms` as `maker` and accept them as `taker`, both at `now`.
pub fn matched(
    book: &WagerBook<MemoryStore>,
    maker: &str,
    taker: &str,
    terms: NewWager,
    now: Timestamp,
) -> WagerId {
    let id = book
        .create_wager(&ctx(maker, now), terms)
        .expect("create fixture");
    book.accept_wager(&ctx(taker, now), id).expect("accept fixture");
    id
}
