use crate::shared::entity::{Entity, ID};

/// Users are organized into `Group`s. Group membership only affects which
/// reminders a user may see through the read API; dispatch addresses
/// recipients directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: ID,
    pub name: String,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ID::new(0),
            name: name.into(),
        }
    }
}

impl Entity for Group {
    fn id(&self) -> ID {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupMembership {
    pub group_id: ID,
    pub user_id: ID,
}
