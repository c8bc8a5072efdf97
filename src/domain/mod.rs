//! Ledger domain: identifiers, wagers, payouts and the expiry queue.
//!
//! Nothing here touches storage; the application layer moves these values
//! through the store ports.

pub mod error;
pub mod id;
pub mod money;
pub mod queue;
pub mod settlement;
pub mod wager;

pub use error::{AcceptRefusal, AccountIssue, CancelRefusal, LedgerError};
pub use id::{AccountId, Symbol, WagerId};
pub use money::{Amount, Timestamp, Value};
pub use queue::{ExpiryQueue, QueueEntry};
pub use settlement::{Outcome, Settlement};
pub use wager::{Credit, NewWager, Side, Wager, WagerState};
