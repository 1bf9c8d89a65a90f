use dashmap::DashMap;
use splitledger_application::{GroupRoster, StoreError};
use splitledger_domain::{GroupId, UserId};
use std::sync::Arc;

/// Thread-safe in-memory group membership.
#[derive(Clone, Default)]
pub struct InMemoryGroupRoster {
    inner: Arc<DashMap<GroupId, Vec<UserId>>>,
}

impl InMemoryGroupRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the membership of `group`. Duplicate ids are dropped, first one wins.
    pub fn set_members<I>(&self, group: GroupId, members: I)
    where
        I: IntoIterator<Item = UserId>,
    {
        let mut unique: Vec<UserId> = Vec::new();
        for member in members {
            if !unique.contains(&member) {
                unique.push(member);
            }
        }
        self.inner.insert(group, unique);
    }

    /// Appends `user` to `group`, creating the group if needed.
    pub fn add_member(&self, group: GroupId, user: UserId) {
        let mut members = self.inner.entry(group).or_default();
        if !members.contains(&user) {
            members.push(user);
        }
    }

    /// Returns `false` if `user` was not a member.
    pub fn remove_member(&self, group: &GroupId, user: &UserId) -> bool {
        let Some(mut members) = self.inner.get_mut(group) else {
            return false;
        };
        let before = members.len();
        members.retain(|member| member != user);
        members.len() != before
    }
}

impl GroupRoster for InMemoryGroupRoster {
    fn members(&self, group: &GroupId) -> Result<Vec<UserId>, StoreError> {
        self.inner
            .get(group)
            .map(|members| members.value().clone())
            .ok_or_else(|| StoreError::UnknownGroup(group.clone()))
    }
}
