use crate::{
    error::{AmountOverflow, SettlementError},
    model::{Money, Transfer, UserBalances, UserId},
};

/// Greedy largest-first debt simplification.
///
/// Produces at most `debtors + creditors - 1` transfers. It is not guaranteed
/// to be the global minimum for every distribution.
pub struct SettlementOptimizer;

struct Position<'a> {
    user: &'a UserId,
    remaining: Money,
}

impl SettlementOptimizer {
    /// Builds transfers that bring every balance in `balances` to zero.
    ///
    /// Positive balances are creditors, negative ones debtors. Both sides are
    /// sorted by magnitude, largest first; ties keep the input order. Input
    /// that does not sum to exactly zero is rejected.
    pub fn settle(&self, balances: &UserBalances) -> Result<Vec<Transfer>, SettlementError> {
        let Some(total) = Money::checked_sum(balances.values().copied()) else {
            tracing::error!(
                reject_reason = "amount_overflow",
                member_count = balances.len(),
                "Settlement rejected because the balance total is out of range"
            );
            return Err(AmountOverflow.into());
        };
        if !total.is_zero() {
            tracing::error!(
                reject_reason = "input_imbalance",
                member_count = balances.len(),
                total = %total,
                "Settlement rejected due to non-zero balance total"
            );
            return Err(SettlementError::InconsistentLedger { total });
        }

        let mut debtors = Vec::new();
        let mut creditors = Vec::new();
        for (user, balance) in balances {
            if balance.is_negative() {
                debtors.push(Position {
                    user,
                    remaining: balance.abs(),
                });
            } else if balance.is_positive() {
                creditors.push(Position {
                    user,
                    remaining: *balance,
                });
            }
        }

        debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
        creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

        let mut transfers = Vec::with_capacity(debtors.len() + creditors.len());
        let (mut i, mut j) = (0, 0);
        while i < debtors.len() && j < creditors.len() {
            let debtor = &mut debtors[i];
            let creditor = &mut creditors[j];
            let amount = debtor.remaining.min(creditor.remaining);

            debtor.remaining -= amount;
            creditor.remaining -= amount;
            transfers.push(Transfer {
                from: debtor.user.clone(),
                to: creditor.user.clone(),
                amount,
            });

            if debtor.remaining.is_zero() {
                i += 1;
            }
            if creditor.remaining.is_zero() {
                j += 1;
            }
        }
        debug_assert!(i == debtors.len() && j == creditors.len());

        tracing::debug!(
            debtor_count = debtors.len(),
            creditor_count = creditors.len(),
            transfer_count = transfers.len(),
            "Settlement transfers built"
        );

        Ok(transfers)
    }
}
