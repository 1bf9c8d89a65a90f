use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
    sync::Arc,
};

use crate::{
    error::{ParseMoneyError, SplitValidationError},
    services::SplitValidator,
};

/// Signed balance table keyed by user.
///
/// Iteration follows insertion order, so callers that build it from a member
/// list get a deterministic settlement order.
pub type UserBalances = IndexMap<UserId, Money>;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(value: impl Into<Arc<str>>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(Arc::from(value))
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(Arc::from(value))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_id!(
    /// Identifier of a ledger participant.
    UserId
);
opaque_id!(
    /// Identifier of a group that expenses can be tagged with.
    GroupId
);
opaque_id!(
    /// Identifier of an expense record.
    ExpenseId
);

/// Exact decimal money amount.
///
/// Wraps [`Decimal`] so that split sums compare exactly. Equality is numeric:
/// `50.00` and `50` are the same amount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates an amount from a mantissa and a scale, e.g. `Money::new(1250, 2)` is `12.50`.
    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn checked_mul(self, rhs: Decimal) -> Option<Self> {
        self.0.checked_mul(rhs).map(Self)
    }

    pub fn checked_div(self, rhs: Decimal) -> Option<Self> {
        self.0.checked_div(rhs).map(Self)
    }

    /// Totals `amounts`, or `None` if the total cannot be represented.
    ///
    /// Credits and debits are accumulated apart and netted once, so the
    /// outcome does not depend on iteration order.
    pub fn checked_sum<I>(amounts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        let (mut credit, mut debit) = (Decimal::ZERO, Decimal::ZERO);
        for amount in amounts {
            if amount.is_negative() {
                debit = debit.checked_add(amount.0)?;
            } else {
                credit = credit.checked_add(amount.0)?;
            }
        }
        Some(Self(credit + debit))
    }

    pub fn signum(self) -> i64 {
        if self.is_positive() {
            1
        } else if self.is_negative() {
            -1
        } else {
            0
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Decimal::from_str_exact(trimmed)
            .map(Self)
            .map_err(|_| ParseMoneyError(trimmed.to_string()))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// One contribution towards an expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayerShare {
    pub payer_id: UserId,
    pub amount_paid: Money,
}

impl PayerShare {
    pub fn new(payer_id: impl Into<UserId>, amount_paid: Money) -> Self {
        Self {
            payer_id: payer_id.into(),
            amount_paid,
        }
    }
}

/// One owed portion of an expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryShare {
    pub beneficiary_id: UserId,
    pub amount_owed: Money,
}

impl BeneficiaryShare {
    pub fn new(beneficiary_id: impl Into<UserId>, amount_owed: Money) -> Self {
        Self {
            beneficiary_id: beneficiary_id.into(),
            amount_owed,
        }
    }
}

/// Unvalidated expense as received from a host.
///
/// Shares are kept as ordered lists; a user may appear more than once on
/// either side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub id: ExpenseId,
    pub amount: Money,
    pub paid_by: Vec<PayerShare>,
    pub paid_for: Vec<BeneficiaryShare>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    pub created_by: UserId,
}

/// Expense whose split has passed [`SplitValidator`].
///
/// The only ways to obtain one are `Expense::try_from(draft)` and
/// deserialization, which goes through the same check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ExpenseDraft", into = "ExpenseDraft")]
pub struct Expense {
    id: ExpenseId,
    amount: Money,
    paid_by: Vec<PayerShare>,
    paid_for: Vec<BeneficiaryShare>,
    group_id: Option<GroupId>,
    created_by: UserId,
}

impl Expense {
    pub fn id(&self) -> &ExpenseId {
        &self.id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn paid_by(&self) -> &[PayerShare] {
        &self.paid_by
    }

    pub fn paid_for(&self) -> &[BeneficiaryShare] {
        &self.paid_for
    }

    pub fn group_id(&self) -> Option<&GroupId> {
        self.group_id.as_ref()
    }

    pub fn created_by(&self) -> &UserId {
        &self.created_by
    }

    pub fn belongs_to(&self, group_id: &GroupId) -> bool {
        self.group_id.as_ref() == Some(group_id)
    }

    pub fn has_payer(&self, user: &UserId) -> bool {
        self.paid_by.iter().any(|share| &share.payer_id == user)
    }

    pub fn has_beneficiary(&self, user: &UserId) -> bool {
        self.paid_for.iter().any(|share| &share.beneficiary_id == user)
    }

    /// Returns `true` if `user` appears on either side of the split.
    pub fn involves(&self, user: &UserId) -> bool {
        self.has_payer(user) || self.has_beneficiary(user)
    }

    pub fn into_draft(self) -> ExpenseDraft {
        ExpenseDraft {
            id: self.id,
            amount: self.amount,
            paid_by: self.paid_by,
            paid_for: self.paid_for,
            group_id: self.group_id,
            created_by: self.created_by,
        }
    }
}

impl TryFrom<ExpenseDraft> for Expense {
    type Error = SplitValidationError;

    fn try_from(draft: ExpenseDraft) -> Result<Self, Self::Error> {
        SplitValidator.validate(draft.amount, &draft.paid_by, &draft.paid_for)?;
        Ok(Self {
            id: draft.id,
            amount: draft.amount,
            paid_by: draft.paid_by,
            paid_for: draft.paid_for,
            group_id: draft.group_id,
            created_by: draft.created_by,
        })
    }
}

impl From<Expense> for ExpenseDraft {
    fn from(expense: Expense) -> Self {
        expense.into_draft()
    }
}

/// Suggested payment: `from` pays `to` the given amount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: UserId,
    pub to: UserId,
    pub amount: Money,
}
