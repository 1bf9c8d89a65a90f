#![warn(clippy::uninlined_format_args)]
//! Ledger reconciliation and settlement.
//!
//! Everything here is a pure function of the expense records handed in by the
//! caller: nothing is cached and inputs are never mutated.

pub mod error;
pub mod model;
pub mod services;

pub use error::{
    AmountOverflow, ParseMoneyError, SettlementError, SplitSide, SplitValidationError,
};
pub use model::{
    BeneficiaryShare, Expense, ExpenseDraft, ExpenseId, GroupId, Money, PayerShare, Transfer,
    UserBalances, UserId,
};
pub use services::{
    GroupBalanceAggregator, GroupBalances, PairwiseAccounting, PairwiseBalanceCalculator,
    SettlementOptimizer, SplitValidator,
};
