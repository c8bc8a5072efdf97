//! Integer quantity types for amounts, reported values and time.
//!
//! The ledger has a single currency unit and never divides, so plain
//! unsigned integers are exact.

/// Token amount in the ledger's only currency unit.
pub type Amount = u64;

/// A symbol value: the strike a wager is struck at, or an oracle report.
pub type Value = u64;

/// Host clock reading, in seconds. Only ever compared, never advanced.
pub type Timestamp = u64;
