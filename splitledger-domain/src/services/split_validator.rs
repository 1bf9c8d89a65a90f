use crate::{
    error::{SplitSide, SplitValidationError},
    model::{BeneficiaryShare, Money, PayerShare},
};

/// Gatekeeper for expense writes.
///
/// Both sides of a split must add up to the expense total exactly. Amounts are
/// decimal, so there is no tolerance.
pub struct SplitValidator;

impl SplitValidator {
    /// Checks a proposed split.
    ///
    /// Checks run in a fixed order: total, payer presence, share signs, payer
    /// sum, beneficiary sum. The first failure is returned.
    pub fn validate(
        &self,
        amount: Money,
        paid_by: &[PayerShare],
        paid_for: &[BeneficiaryShare],
    ) -> Result<(), SplitValidationError> {
        if !amount.is_positive() {
            return Err(SplitValidationError::NonPositiveAmount(amount));
        }
        if paid_by.is_empty() {
            return Err(SplitValidationError::NoPayers);
        }

        if let Some(share) = paid_by.iter().find(|share| share.amount_paid.is_negative()) {
            return Err(SplitValidationError::NegativeShare {
                side: SplitSide::Payers,
                user: share.payer_id.clone(),
                amount: share.amount_paid,
            });
        }
        if let Some(share) = paid_for
            .iter()
            .find(|share| share.amount_owed.is_negative())
        {
            return Err(SplitValidationError::NegativeShare {
                side: SplitSide::Beneficiaries,
                user: share.beneficiary_id.clone(),
                amount: share.amount_owed,
            });
        }

        let paid = Money::checked_sum(paid_by.iter().map(|share| share.amount_paid)).ok_or(
            SplitValidationError::AmountOverflow {
                side: SplitSide::Payers,
            },
        )?;
        if paid != amount {
            return Err(SplitValidationError::SplitMismatch {
                side: SplitSide::Payers,
                expected: amount,
                actual: paid,
            });
        }

        let owed = Money::checked_sum(paid_for.iter().map(|share| share.amount_owed)).ok_or(
            SplitValidationError::AmountOverflow {
                side: SplitSide::Beneficiaries,
            },
        )?;
        if owed != amount {
            return Err(SplitValidationError::SplitMismatch {
                side: SplitSide::Beneficiaries,
                expected: amount,
                actual: owed,
            });
        }

        Ok(())
    }
}
