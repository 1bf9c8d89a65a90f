use crate::{
    error::LedgerServiceError,
    model::{GroupSummary, LedgerConfig, ResidualPolicy},
    ports::{ExpenseStore, GroupRoster},
};
use splitledger_domain::{
    Expense, ExpenseDraft, ExpenseId, GroupBalanceAggregator, GroupBalances, GroupId, Money,
    PairwiseBalanceCalculator, SettlementOptimizer, UserBalances, UserId,
};

/// Entry point for hosts: gates writes through split validation and answers
/// balance queries by recomputing from the store on every call.
#[derive(Clone, Copy)]
pub struct LedgerService<'a> {
    store: &'a dyn ExpenseStore,
    roster: &'a dyn GroupRoster,
    config: LedgerConfig,
}

impl<'a> LedgerService<'a> {
    pub fn new(store: &'a dyn ExpenseStore, roster: &'a dyn GroupRoster) -> Self {
        Self::with_config(store, roster, LedgerConfig::default())
    }

    pub fn with_config(
        store: &'a dyn ExpenseStore,
        roster: &'a dyn GroupRoster,
        config: LedgerConfig,
    ) -> Self {
        Self {
            store,
            roster,
            config,
        }
    }

    pub fn config(&self) -> LedgerConfig {
        self.config
    }

    /// Validates and stores a new expense. Rejected drafts never reach the store.
    pub fn record_expense(&self, draft: ExpenseDraft) -> Result<Expense, LedgerServiceError> {
        let expense = Self::validate(draft)?;
        self.store.insert(expense.clone())?;
        tracing::info!(
            expense_id = %expense.id(),
            group_id = ?expense.group_id().map(GroupId::as_str),
            amount = %expense.amount(),
            "Expense recorded"
        );
        Ok(expense)
    }

    /// Validates a new version of an existing expense and swaps it in.
    pub fn update_expense(&self, draft: ExpenseDraft) -> Result<Expense, LedgerServiceError> {
        let expense = Self::validate(draft)?;
        let previous = self.store.replace(expense.clone())?;
        tracing::info!(
            expense_id = %expense.id(),
            previous_amount = %previous.amount(),
            amount = %expense.amount(),
            "Expense updated"
        );
        Ok(expense)
    }

    pub fn delete_expense(&self, id: &ExpenseId) -> Result<Expense, LedgerServiceError> {
        let removed = self.store.remove(id)?;
        tracing::info!(expense_id = %id, "Expense deleted");
        Ok(removed)
    }

    /// Signed amount `friend` owes `user` (negative when `user` owes `friend`).
    pub fn pairwise_balance(
        &self,
        user: &UserId,
        friend: &UserId,
    ) -> Result<Money, LedgerServiceError> {
        let expenses = self.store.expenses_for_user(user)?;
        Ok(self.pairwise().balance(user, friend, &expenses)?)
    }

    /// Pairwise balance of `user` against everyone they share an expense with.
    pub fn counterpart_balances(&self, user: &UserId) -> Result<UserBalances, LedgerServiceError> {
        let expenses = self.store.expenses_for_user(user)?;
        Ok(self.pairwise().counterpart_balances(user, &expenses)?)
    }

    pub fn group_balances(&self, group: &GroupId) -> Result<GroupBalances, LedgerServiceError> {
        let members = self.roster.members(group)?;
        let expenses = self.store.expenses_for_group(group)?;
        Ok(GroupBalanceAggregator.aggregate(group, &members, &expenses)?)
    }

    /// Net balances of a group plus the transfers that settle it.
    pub fn group_summary(&self, group: &GroupId) -> Result<GroupSummary, LedgerServiceError> {
        let balances = self.group_balances(group)?;
        if let Err(err) = balances.ensure_zero_sum() {
            tracing::error!(
                reject_reason = "inconsistent_ledger",
                group_id = %group,
                total = %balances.total(),
                "Refusing to settle group with non-zero total"
            );
            return Err(err.into());
        }

        let settle_input = match self.config.residual_policy {
            ResidualPolicy::Reject => {
                if balances.has_former_member_residuals() {
                    let users: Vec<UserId> = balances.former_members().keys().cloned().collect();
                    tracing::warn!(
                        reject_reason = "former_member_residual",
                        group_id = %group,
                        former_member_count = users.len(),
                        "Refusing to settle group with residual balances outside membership"
                    );
                    return Err(LedgerServiceError::FormerMemberResidual { users });
                }
                balances.members().clone()
            }
            ResidualPolicy::IncludeFormerMembers => balances.all_participants(),
        };

        let transfers = SettlementOptimizer.settle(&settle_input)?;
        let (members, former_members) = balances.into_parts();

        Ok(GroupSummary {
            group_id: group.clone(),
            balances: members,
            former_members,
            transfers,
        })
    }

    fn pairwise(&self) -> PairwiseBalanceCalculator {
        PairwiseBalanceCalculator::new(self.config.pairwise_accounting)
    }

    fn validate(draft: ExpenseDraft) -> Result<Expense, LedgerServiceError> {
        let expense_id = draft.id.clone();
        Expense::try_from(draft).map_err(|err| {
            tracing::warn!(
                reject_reason = "split_validation",
                expense_id = %expense_id,
                difference = ?err.difference().map(|diff| diff.to_string()),
                "Expense write rejected: {err}"
            );
            err.into()
        })
    }
}
