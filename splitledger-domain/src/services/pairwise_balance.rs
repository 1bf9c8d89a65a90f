use crate::{
    error::AmountOverflow,
    model::{BeneficiaryShare, Expense, Money, PayerShare, UserBalances, UserId},
};

/// How a single `(payer, beneficiary)` pair of an expense is weighted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PairwiseAccounting {
    /// Every payer is credited with the beneficiary's full owed amount.
    ///
    /// With more than one payer this counts a beneficiary's share once per
    /// payer, so `paidBy=[A:60, C:40], paidFor=[B:100]` gives `B owes A 100`.
    /// Existing balances depend on these numbers, so it stays the default.
    #[default]
    CrossProduct,
    /// The owed amount is scaled by the payer's share of the total
    /// (`amountOwed * amountPaid / amount`), giving `B owes A 60` above.
    Proportional,
}

/// Signed net amount owed between two users.
///
/// Positive means the counterpart owes the subject user, negative means the
/// subject user owes the counterpart.
#[derive(Clone, Copy, Debug, Default)]
pub struct PairwiseBalanceCalculator {
    accounting: PairwiseAccounting,
}

impl PairwiseBalanceCalculator {
    pub fn new(accounting: PairwiseAccounting) -> Self {
        Self { accounting }
    }

    pub fn accounting(&self) -> PairwiseAccounting {
        self.accounting
    }

    /// Net balance between `user` and `friend` over `expenses`.
    ///
    /// Only expenses where one of the two pays and one of the two benefits are
    /// considered. Within each, every payer/beneficiary pair made of exactly
    /// these two users contributes; self-pairs never do.
    pub fn balance<'e, I>(
        &self,
        user: &UserId,
        friend: &UserId,
        expenses: I,
    ) -> Result<Money, AmountOverflow>
    where
        I: IntoIterator<Item = &'e Expense>,
    {
        let mut total = Money::ZERO;
        let mut expense_count = 0usize;

        for expense in expenses
            .into_iter()
            .filter(|expense| touches_pair(expense, user, friend))
        {
            expense_count += 1;
            for payer in expense.paid_by() {
                let (sign, counterpart) = if &payer.payer_id == user {
                    (1, friend)
                } else if &payer.payer_id == friend {
                    (-1, user)
                } else {
                    continue;
                };

                for beneficiary in expense.paid_for() {
                    if beneficiary.beneficiary_id == payer.payer_id
                        || &beneficiary.beneficiary_id != counterpart
                    {
                        continue;
                    }
                    let share = self.share(expense, payer, beneficiary)?;
                    total = if sign > 0 {
                        total.checked_add(share)
                    } else {
                        total.checked_sub(share)
                    }
                    .ok_or(AmountOverflow)?;
                }
            }
        }

        tracing::debug!(
            user = %user,
            friend = %friend,
            accounting = ?self.accounting,
            expense_count,
            balance = %total,
            "Pairwise balance computed"
        );

        Ok(total)
    }

    /// Pairwise balance of `user` against every counterpart found in `expenses`.
    ///
    /// Counterparts appear in first-seen order. An entry's value equals
    /// `self.balance(user, counterpart, expenses)`; counterparts that net out
    /// to zero are kept.
    pub fn counterpart_balances<'e, I>(
        &self,
        user: &UserId,
        expenses: I,
    ) -> Result<UserBalances, AmountOverflow>
    where
        I: IntoIterator<Item = &'e Expense>,
    {
        let mut balances = UserBalances::new();

        for expense in expenses.into_iter().filter(|expense| expense.involves(user)) {
            for payer in expense.paid_by() {
                let user_pays = &payer.payer_id == user;
                for beneficiary in expense.paid_for() {
                    if beneficiary.beneficiary_id == payer.payer_id {
                        continue;
                    }
                    let (counterpart, signed) = if user_pays {
                        (
                            &beneficiary.beneficiary_id,
                            self.share(expense, payer, beneficiary)?,
                        )
                    } else if &beneficiary.beneficiary_id == user {
                        (&payer.payer_id, -self.share(expense, payer, beneficiary)?)
                    } else {
                        continue;
                    };
                    let slot = balances.entry(counterpart.clone()).or_insert(Money::ZERO);
                    *slot = slot.checked_add(signed).ok_or(AmountOverflow)?;
                }
            }
        }

        Ok(balances)
    }

    fn share(
        &self,
        expense: &Expense,
        payer: &PayerShare,
        beneficiary: &BeneficiaryShare,
    ) -> Result<Money, AmountOverflow> {
        match self.accounting {
            PairwiseAccounting::CrossProduct => Ok(beneficiary.amount_owed),
            PairwiseAccounting::Proportional => {
                let owed = beneficiary.amount_owed;
                let paid = payer.amount_paid.as_decimal();
                let amount = expense.amount().as_decimal();
                // Divide first only when the product overflows; paid / amount is at most one.
                owed.checked_mul(paid)
                    .and_then(|scaled| scaled.checked_div(amount))
                    .or_else(|| {
                        paid.checked_div(amount)
                            .and_then(|ratio| owed.checked_mul(ratio))
                    })
                    .ok_or(AmountOverflow)
            }
        }
    }
}

fn touches_pair(expense: &Expense, user: &UserId, friend: &UserId) -> bool {
    (expense.has_payer(user) || expense.has_payer(friend))
        && (expense.has_beneficiary(user) || expense.has_beneficiary(friend))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExpenseDraft, ExpenseId, GroupId};
    use rstest::rstest;

    fn expense(id: &str, payers: &[(&str, i64)], beneficiaries: &[(&str, i64)]) -> Expense {
        let amount = payers.iter().map(|(_, value)| Money::from_i64(*value)).sum();
        Expense::try_from(ExpenseDraft {
            id: ExpenseId::from(id),
            amount,
            paid_by: payers
                .iter()
                .map(|(user, value)| PayerShare::new(*user, Money::from_i64(*value)))
                .collect(),
            paid_for: beneficiaries
                .iter()
                .map(|(user, value)| BeneficiaryShare::new(*user, Money::from_i64(*value)))
                .collect(),
            group_id: Some(GroupId::from("g")),
            created_by: UserId::from(payers[0].0),
        })
        .expect("test expense must be balanced")
    }

    fn uid(value: &str) -> UserId {
        UserId::from(value)
    }

    #[rstest]
    #[case::payer_covers_half_for_friend(
        vec![expense("e1", &[("a", 100)], &[("a", 50), ("b", 50)])],
        "a", "b", 50
    )]
    #[case::reverse_direction(
        vec![expense("e1", &[("a", 100)], &[("a", 50), ("b", 50)])],
        "b", "a", -50
    )]
    #[case::multi_payer_counts_full_share_per_payer(
        vec![expense("e1", &[("a", 60), ("c", 40)], &[("b", 100)])],
        "a", "b", 100
    )]
    #[case::both_directions_net_out(
        vec![
            expense("e1", &[("a", 30)], &[("b", 30)]),
            expense("e2", &[("b", 20)], &[("a", 20)]),
        ],
        "a", "b", 10
    )]
    #[case::unrelated_expense_ignored(
        vec![expense("e1", &[("c", 40)], &[("d", 40)])],
        "a", "b", 0
    )]
    #[case::third_party_payer_ignored(
        vec![expense("e1", &[("c", 90)], &[("a", 45), ("b", 45)])],
        "a", "b", 0
    )]
    #[case::self_payment_is_not_debt(
        vec![expense("e1", &[("a", 70)], &[("a", 70)])],
        "a", "b", 0
    )]
    #[case::both_pay_each_other_in_one_expense(
        vec![expense("e1", &[("a", 50), ("b", 50)], &[("a", 50), ("b", 50)])],
        "a", "b", 0
    )]
    #[case::same_user_is_zero(
        vec![expense("e1", &[("a", 100)], &[("a", 50), ("b", 50)])],
        "a", "a", 0
    )]
    fn cross_product_balance(
        #[case] expenses: Vec<Expense>,
        #[case] user: &str,
        #[case] friend: &str,
        #[case] expected: i64,
    ) {
        let calculator = PairwiseBalanceCalculator::default();
        let balance = calculator.balance(&uid(user), &uid(friend), &expenses);
        assert_eq!(balance, Ok(Money::from_i64(expected)));
    }

    #[rstest]
    #[case::multi_payer_is_scaled(
        vec![expense("e1", &[("a", 60), ("c", 40)], &[("b", 100)])],
        "a", "b", 60
    )]
    #[case::single_payer_matches_cross_product(
        vec![expense("e1", &[("a", 100)], &[("a", 50), ("b", 50)])],
        "a", "b", 50
    )]
    #[case::friend_pays_back_partially(
        vec![
            expense("e1", &[("a", 60), ("c", 40)], &[("b", 100)]),
            expense("e2", &[("b", 20), ("c", 20)], &[("a", 40)]),
        ],
        "a", "b", 40
    )]
    #[case::product_past_decimal_range(
        vec![expense("e1", &[("a", 1_000_000_000_000_000)], &[("b", 1_000_000_000_000_000)])],
        "a", "b", 1_000_000_000_000_000
    )]
    #[case::large_multi_payer(
        vec![expense(
            "e1",
            &[("a", 600_000_000_000_000_000), ("c", 400_000_000_000_000_000)],
            &[("b", 1_000_000_000_000_000_000)],
        )],
        "b", "a", -600_000_000_000_000_000
    )]
    fn proportional_balance(
        #[case] expenses: Vec<Expense>,
        #[case] user: &str,
        #[case] friend: &str,
        #[case] expected: i64,
    ) {
        let calculator = PairwiseBalanceCalculator::new(PairwiseAccounting::Proportional);
        let balance = calculator.balance(&uid(user), &uid(friend), &expenses);
        assert_eq!(balance, Ok(Money::from_i64(expected)));
    }

    #[test]
    fn counterpart_balances_match_pairwise_queries() {
        let expenses = vec![
            expense("e1", &[("a", 90)], &[("a", 30), ("b", 30), ("c", 30)]),
            expense("e2", &[("b", 40), ("d", 20)], &[("a", 60)]),
            expense("e3", &[("c", 10)], &[("c", 10)]),
        ];
        let calculator = PairwiseBalanceCalculator::default();

        let balances = calculator
            .counterpart_balances(&uid("a"), &expenses)
            .expect("small amounts");

        let order: Vec<&str> = balances.keys().map(UserId::as_str).collect();
        assert_eq!(order, ["b", "c", "d"]);
        for (counterpart, value) in &balances {
            assert_eq!(
                Ok(*value),
                calculator.balance(&uid("a"), counterpart, &expenses),
                "counterpart {counterpart}"
            );
        }
        assert_eq!(balances[&uid("b")], Money::from_i64(-30));
        assert_eq!(balances[&uid("c")], Money::from_i64(30));
        assert_eq!(balances[&uid("d")], Money::from_i64(-60));
    }

    #[test]
    fn counterpart_balances_keep_settled_pairs() {
        let expenses = vec![
            expense("e1", &[("a", 25)], &[("b", 25)]),
            expense("e2", &[("b", 25)], &[("a", 25)]),
        ];

        let balances = PairwiseBalanceCalculator::default()
            .counterpart_balances(&uid("a"), &expenses)
            .expect("small amounts");

        assert_eq!(balances.len(), 1);
        assert_eq!(balances[&uid("b")], Money::ZERO);
    }

    #[rstest]
    #[case(PairwiseAccounting::CrossProduct)]
    #[case(PairwiseAccounting::Proportional)]
    fn running_total_past_decimal_range_is_an_error(#[case] accounting: PairwiseAccounting) {
        let near_max = Money::from_decimal(rust_decimal::Decimal::MAX);
        let expenses: Vec<Expense> = ["e1", "e2"]
            .into_iter()
            .map(|id| {
                Expense::try_from(ExpenseDraft {
                    id: ExpenseId::from(id),
                    amount: near_max,
                    paid_by: vec![PayerShare::new("a", near_max)],
                    paid_for: vec![BeneficiaryShare::new("b", near_max)],
                    group_id: None,
                    created_by: uid("a"),
                })
                .expect("each expense fits on its own")
            })
            .collect();
        let calculator = PairwiseBalanceCalculator::new(accounting);

        assert_eq!(
            calculator.balance(&uid("a"), &uid("b"), &expenses),
            Err(AmountOverflow)
        );
        assert_eq!(
            calculator.counterpart_balances(&uid("b"), &expenses),
            Err(AmountOverflow)
        );
    }
}
