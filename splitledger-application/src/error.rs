use splitledger_domain::{
    AmountOverflow, ExpenseId, GroupId, SettlementError, SplitValidationError, UserId,
};
use thiserror::Error;

/// Failures reported by the ports that back the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Expense {0} already exists")]
    DuplicateExpense(ExpenseId),
    #[error("Expense {0} not found")]
    UnknownExpense(ExpenseId),
    #[error("Group {0} not found")]
    UnknownGroup(GroupId),
    #[error("Ledger store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerServiceError {
    #[error(transparent)]
    Validation(#[from] SplitValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Settlement(#[from] SettlementError),
    #[error(transparent)]
    Overflow(#[from] AmountOverflow),
    #[error("Former members still hold balances: {}", join_users(.users))]
    FormerMemberResidual { users: Vec<UserId> },
}

fn join_users(users: &[UserId]) -> String {
    users
        .iter()
        .map(UserId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
