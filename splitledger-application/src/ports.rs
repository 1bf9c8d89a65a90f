use crate::error::StoreError;
use splitledger_domain::{Expense, ExpenseId, GroupId, UserId};
use std::collections::HashMap;

/// Persistence collaborator holding the expense records.
///
/// Only validated [`Expense`] values cross this boundary.
pub trait ExpenseStore: Send + Sync {
    /// Every expense where `user` is a payer or a beneficiary.
    fn expenses_for_user(&self, user: &UserId) -> Result<Vec<Expense>, StoreError>;

    /// Every expense tagged with `group`.
    fn expenses_for_group(&self, group: &GroupId) -> Result<Vec<Expense>, StoreError>;

    fn get(&self, id: &ExpenseId) -> Result<Option<Expense>, StoreError>;

    fn insert(&self, expense: Expense) -> Result<(), StoreError>;

    /// Replaces an existing record and returns the previous version.
    fn replace(&self, expense: Expense) -> Result<Expense, StoreError>;

    fn remove(&self, id: &ExpenseId) -> Result<Expense, StoreError>;
}

/// Source of current group membership.
pub trait GroupRoster: Send + Sync {
    fn members(&self, group: &GroupId) -> Result<Vec<UserId>, StoreError>;
}

impl GroupRoster for HashMap<GroupId, Vec<UserId>> {
    fn members(&self, group: &GroupId) -> Result<Vec<UserId>, StoreError> {
        self.get(group)
            .cloned()
            .ok_or_else(|| StoreError::UnknownGroup(group.clone()))
    }
}
