//! Overunder - a deterministic over/under wager ledger.
//!
//! Accounts hold balances of a fixed-supply token minted once. Any funded
//! account may open a wager on a symbol by escrowing a bet on the *over*
//! or *under* side of a strike; another account matches it by escrowing an
//! equal bet on the opposite side. The account that minted the supply is
//! the sole reporter: each report of a symbol's value settles every
//! matched wager on that symbol whose expiry is strictly in the past,
//! earliest expiry first, paying both bets to the winner or refunding
//! both on a push.
//!
//! Balances plus escrow always equal the minted supply.
//!
//! # Modules
//!
//! - [`domain`] - Identifiers, wagers, payouts and the expiry queue
//! - [`port`] - Store and host traits the ledger runs on
//! - [`application`] - Ledger services and the [`WagerBook`](application::WagerBook) facade
//! - [`adapter`] - In-memory store, state file, clocks and the CLI
//! - [`infrastructure`] - Configuration, logging and account syntax
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```
//! use overunder::adapter::outbound::MemoryStore;
//! use overunder::application::{BookSettings, WagerBook};
//! use overunder::domain::{NewWager, Side};
//! use overunder::port::CallContext;
//!
//! let book = WagerBook::new(MemoryStore::new(), BookSettings::default());
//! book.mint(&CallContext::new("oracle", 0)).unwrap();
//! book.transfer(&CallContext::new("oracle", 0), &"alice".into(), 100).unwrap();
//! book.transfer(&CallContext::new("oracle", 0), &"bob".into(), 100).unwrap();
//!
//! let id = book
//!     .create_wager(
//!         &CallContext::new("alice", 1),
//!         NewWager::new("BTC", Side::Over, 50_000, 10, 20),
//!     )
//!     .unwrap();
//! book.accept_wager(&CallContext::new("bob", 2), id).unwrap();
//!
//! let summary = book
//!     .report_symbol(&CallContext::new("oracle", 21), &"BTC".into(), 51_000)
//!     .unwrap();
//! assert_eq!(summary.settlements.len(), 1);
//! assert_eq!(book.balance(&"alice".into()).unwrap(), 110);
//! assert!(book.audit().unwrap().is_balanced());
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
