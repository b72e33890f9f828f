//! The entry ledger.
//!
//! Keeps the authoritative in-memory list of box production entries, derives
//! the financial fields from raw inputs, and synchronizes with the remote
//! store over HTTP. All mutations are pessimistic: the cache changes only
//! after the store has returned the canonical row.

pub use client::{Client, ClientError, Credentials};
pub use entry::{RawEntry, UNIT_COST};
pub use error::{LedgerError, Result};
pub use ledger::{Ledger, TypeStats};

mod client;
mod entry;
mod error;
pub mod exports;
mod ledger;
