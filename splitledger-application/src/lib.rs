#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod ledger_service;
pub mod model;
pub mod ports;

pub use error::{LedgerServiceError, StoreError};
pub use ledger_service::LedgerService;
pub use model::{GroupSummary, LedgerConfig, ResidualPolicy};
pub use ports::{ExpenseStore, GroupRoster};
