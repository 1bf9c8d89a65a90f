#![warn(clippy::uninlined_format_args)]

pub mod roster;
pub mod snapshot;
pub mod store;

pub use roster::InMemoryGroupRoster;
pub use snapshot::{GroupRecord, LedgerSnapshot, SnapshotError};
pub use store::InMemoryExpenseStore;
