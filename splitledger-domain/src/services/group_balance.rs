use fxhash::FxHashSet;

use crate::{
    error::{AmountOverflow, SettlementError},
    model::{Expense, GroupId, Money, UserBalances, UserId},
};

/// Net positions of a group, split by current membership.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupBalances {
    members: UserBalances,
    former_members: UserBalances,
    total: Money,
}

impl GroupBalances {
    /// Balances of current members, in membership order.
    pub fn members(&self) -> &UserBalances {
        &self.members
    }

    /// Non-zero balances held by users that are no longer members.
    pub fn former_members(&self) -> &UserBalances {
        &self.former_members
    }

    /// Sum over every contributing user, members or not.
    pub fn total(&self) -> Money {
        self.total
    }

    pub fn is_zero_sum(&self) -> bool {
        self.total.is_zero()
    }

    pub fn ensure_zero_sum(&self) -> Result<(), SettlementError> {
        if self.is_zero_sum() {
            Ok(())
        } else {
            Err(SettlementError::InconsistentLedger { total: self.total })
        }
    }

    pub fn has_former_member_residuals(&self) -> bool {
        !self.former_members.is_empty()
    }

    /// Members followed by former members with residuals.
    pub fn all_participants(&self) -> UserBalances {
        self.members
            .iter()
            .chain(self.former_members.iter())
            .map(|(user, balance)| (user.clone(), *balance))
            .collect()
    }

    pub fn into_members(self) -> UserBalances {
        self.members
    }

    pub fn into_parts(self) -> (UserBalances, UserBalances) {
        (self.members, self.former_members)
    }
}

/// Sums raw paid and owed amounts of a group's expenses per user.
pub struct GroupBalanceAggregator;

impl GroupBalanceAggregator {
    /// Aggregates every expense tagged with `group_id`.
    ///
    /// Every member starts at zero, payers are credited with what they paid and
    /// beneficiaries debited with what they owe. Users outside `members` are
    /// reported separately instead of being reconciled.
    pub fn aggregate<'e, I>(
        &self,
        group_id: &GroupId,
        members: &[UserId],
        expenses: I,
    ) -> Result<GroupBalances, AmountOverflow>
    where
        I: IntoIterator<Item = &'e Expense>,
    {
        let mut balances: UserBalances = members
            .iter()
            .cloned()
            .map(|member| (member, Money::ZERO))
            .collect();
        let mut expense_count = 0usize;

        for expense in expenses
            .into_iter()
            .filter(|expense| expense.belongs_to(group_id))
        {
            expense_count += 1;
            for payer in expense.paid_by() {
                let slot = balances.entry(payer.payer_id.clone()).or_insert(Money::ZERO);
                *slot = slot.checked_add(payer.amount_paid).ok_or(AmountOverflow)?;
            }
            for beneficiary in expense.paid_for() {
                let slot = balances
                    .entry(beneficiary.beneficiary_id.clone())
                    .or_insert(Money::ZERO);
                *slot = slot
                    .checked_sub(beneficiary.amount_owed)
                    .ok_or(AmountOverflow)?;
            }
        }

        let Some(total) = Money::checked_sum(balances.values().copied()) else {
            tracing::error!(
                reject_reason = "amount_overflow",
                group_id = %group_id,
                expense_count,
                "Group total exceeds the representable amount range"
            );
            return Err(AmountOverflow);
        };
        let member_lookup: FxHashSet<&UserId> = members.iter().collect();
        let mut member_balances = UserBalances::with_capacity(members.len());
        let mut former_members = UserBalances::new();

        for (user, balance) in balances {
            if member_lookup.contains(&user) {
                member_balances.insert(user, balance);
            } else if !balance.is_zero() {
                former_members.insert(user, balance);
            }
        }

        if !total.is_zero() {
            tracing::warn!(
                group_id = %group_id,
                expense_count,
                total = %total,
                "Group balances do not sum to zero"
            );
        }
        if !former_members.is_empty() {
            tracing::debug!(
                group_id = %group_id,
                former_member_count = former_members.len(),
                "Group has residual balances outside current membership"
            );
        }
        tracing::debug!(
            group_id = %group_id,
            member_count = member_balances.len(),
            expense_count,
            "Group balances aggregated"
        );

        Ok(GroupBalances {
            members: member_balances,
            former_members,
            total,
        })
    }
}
