use dashmap::{DashMap, mapref::entry::Entry};
use splitledger_application::{ExpenseStore, StoreError};
use splitledger_domain::{Expense, ExpenseId, GroupId, UserId};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

struct StoredExpense {
    sequence: u64,
    expense: Expense,
}

/// Thread-safe in-memory expense ledger.
///
/// Reads return records in insertion order. Replacing a record keeps its
/// original position.
#[derive(Clone, Default)]
pub struct InMemoryExpenseStore {
    inner: Arc<DashMap<ExpenseId, StoredExpense>>,
    next_sequence: Arc<AtomicU64>,
}

impl InMemoryExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn collect_where<F>(&self, predicate: F) -> Vec<Expense>
    where
        F: Fn(&Expense) -> bool,
    {
        let mut matched: Vec<(u64, Expense)> = self
            .inner
            .iter()
            .filter(|stored| predicate(&stored.expense))
            .map(|stored| (stored.sequence, stored.expense.clone()))
            .collect();
        matched.sort_unstable_by_key(|(sequence, _)| *sequence);
        matched.into_iter().map(|(_, expense)| expense).collect()
    }
}

impl ExpenseStore for InMemoryExpenseStore {
    fn expenses_for_user(&self, user: &UserId) -> Result<Vec<Expense>, StoreError> {
        Ok(self.collect_where(|expense| expense.involves(user)))
    }

    fn expenses_for_group(&self, group: &GroupId) -> Result<Vec<Expense>, StoreError> {
        Ok(self.collect_where(|expense| expense.belongs_to(group)))
    }

    fn get(&self, id: &ExpenseId) -> Result<Option<Expense>, StoreError> {
        Ok(self.inner.get(id).map(|stored| stored.expense.clone()))
    }

    fn insert(&self, expense: Expense) -> Result<(), StoreError> {
        match self.inner.entry(expense.id().clone()) {
            Entry::Occupied(entry) => Err(StoreError::DuplicateExpense(entry.key().clone())),
            Entry::Vacant(entry) => {
                let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
                entry.insert(StoredExpense { sequence, expense });
                Ok(())
            }
        }
    }

    fn replace(&self, expense: Expense) -> Result<Expense, StoreError> {
        let id = expense.id().clone();
        match self.inner.get_mut(&id) {
            Some(mut stored) => Ok(std::mem::replace(&mut stored.expense, expense)),
            None => Err(StoreError::UnknownExpense(id)),
        }
    }

    fn remove(&self, id: &ExpenseId) -> Result<Expense, StoreError> {
        self.inner
            .remove(id)
            .map(|(_, stored)| stored.expense)
            .ok_or_else(|| StoreError::UnknownExpense(id.clone()))
    }
}
