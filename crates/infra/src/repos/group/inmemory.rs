use super::IGroupRepo;
use crate::repos::shared::inmemory_repo::*;
use remindd_domain::{Group, GroupMembership, ID};
use std::sync::atomic::AtomicI64;
use std::sync::Mutex;

pub struct InMemoryGroupRepo {
    groups: Mutex<Vec<Group>>,
    memberships: Mutex<Vec<GroupMembership>>,
    next_id: AtomicI64,
}

impl InMemoryGroupRepo {
    pub fn new() -> Self {
        Self {
            groups: Mutex::new(vec![]),
            memberships: Mutex::new(vec![]),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait::async_trait]
impl IGroupRepo for InMemoryGroupRepo {
    async fn insert(&self, group: &Group) -> anyhow::Result<Group> {
        let mut group = group.clone();
        group.id = next_id(&self.next_id);
        insert(&group, &self.groups);
        Ok(group)
    }

    async fn add_member(&self, group_id: ID, user_id: ID) -> anyhow::Result<()> {
        insert(&GroupMembership { group_id, user_id }, &self.memberships);
        Ok(())
    }

    async fn members(&self, group_id: ID) -> anyhow::Result<Vec<ID>> {
        Ok(find_by(&self.memberships, |m| m.group_id == group_id)
            .into_iter()
            .map(|m| m.user_id)
            .collect())
    }
}
