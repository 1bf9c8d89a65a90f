use std::fmt;
use thiserror::Error;

use crate::model::{Money, UserId};

/// Which half of a split an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplitSide {
    Payers,
    Beneficiaries,
}

impl fmt::Display for SplitSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payers => f.write_str("payer"),
            Self::Beneficiaries => f.write_str("beneficiary"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitValidationError {
    #[error("Expense amount must be positive (found {0})")]
    NonPositiveAmount(Money),
    #[error("Expense must have at least one payer")]
    NoPayers,
    #[error("Negative {side} share for {user} (found {amount})")]
    NegativeShare {
        side: SplitSide,
        user: UserId,
        amount: Money,
    },
    #[error("Split mismatch on {side} side: expected {expected}, found {actual}")]
    SplitMismatch {
        side: SplitSide,
        expected: Money,
        actual: Money,
    },
    #[error("Sum of {side} shares exceeds the representable amount range")]
    AmountOverflow { side: SplitSide },
}

impl SplitValidationError {
    /// Signed gap between the side's sum and the expense total, for mismatches.
    pub fn difference(&self) -> Option<Money> {
        match self {
            Self::SplitMismatch {
                expected, actual, ..
            } => Some(*actual - *expected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// Balances handed to settlement do not net to zero. Any transfer list
    /// built from them would be wrong, so none is produced.
    #[error("Inconsistent ledger: balances must sum to zero (found {total})")]
    InconsistentLedger { total: Money },
    #[error(transparent)]
    Overflow(#[from] AmountOverflow),
}

/// A running balance left the range [`Money`] can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Balance exceeds the representable amount range")]
pub struct AmountOverflow;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid amount: {0:?}")]
pub struct ParseMoneyError(pub(crate) String);
