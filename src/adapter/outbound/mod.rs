//! Outbound adapters implementing the host ports.

pub mod clock;
pub mod memory;
pub mod snapshot;

pub use clock::{FixedClock, SystemClock};
pub use memory::{LedgerTables, MemoryStore};
pub use snapshot::StateFile;
