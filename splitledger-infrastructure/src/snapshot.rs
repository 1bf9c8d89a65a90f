//! JSON snapshots of a ledger.
//!
//! A snapshot is what a host would export from its document store: group
//! memberships plus raw expense records. Loading one replays every expense
//! through [`LedgerService::record_expense`], so a snapshot with an
//! unbalanced split is rejected as a whole at the first bad record.

use crate::roster::InMemoryGroupRoster;
use serde::{Deserialize, Serialize};
use splitledger_application::{ExpenseStore, LedgerService, LedgerServiceError};
use splitledger_domain::{ExpenseDraft, ExpenseId, GroupId, UserId};
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Malformed ledger snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Expense #{index} ({id}) rejected: {source}")]
    RejectedExpense {
        index: usize,
        id: ExpenseId,
        #[source]
        source: LedgerServiceError,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: GroupId,
    pub members: Vec<UserId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub groups: Vec<GroupRecord>,
    #[serde(default)]
    pub expenses: Vec<ExpenseDraft>,
}

impl LedgerSnapshot {
    pub fn from_json_str(source: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Registers the groups in `roster` and records every expense in `store`.
    ///
    /// Returns the number of expenses recorded.
    pub fn load_into(
        self,
        store: &dyn ExpenseStore,
        roster: &InMemoryGroupRoster,
    ) -> Result<usize, SnapshotError> {
        for group in self.groups {
            roster.set_members(group.id, group.members);
        }

        let service = LedgerService::new(store, roster);
        let mut recorded = 0usize;
        for (index, draft) in self.expenses.into_iter().enumerate() {
            let id = draft.id.clone();
            service
                .record_expense(draft)
                .map_err(|source| SnapshotError::RejectedExpense { index, id, source })?;
            recorded += 1;
        }

        tracing::debug!(recorded, "Ledger snapshot loaded");
        Ok(recorded)
    }
}
