//! Groups, memberships and member profiles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{GroupId, UserId};

/// A user's public profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl Profile {
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}

/// An expense-sharing group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub description: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Creates a group owned by `created_by`
    pub fn new(name: impl Into<String>, created_by: UserId) -> Self {
        Self {
            id: GroupId::new_v7(),
            name: name.into(),
            description: None,
            created_by,
            created_at: Utc::now(),
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Role of a member inside a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Admin,
    #[default]
    Member,
}

/// Membership of a user in a group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMember {
    pub group_id: GroupId,
    pub user_id: UserId,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

impl GroupMember {
    /// Creates a regular membership starting now
    pub fn new(group_id: GroupId, user_id: UserId) -> Self {
        Self {
            group_id,
            user_id,
            role: MemberRole::Member,
            joined_at: Utc::now(),
        }
    }

    /// Creates an admin membership starting now
    pub fn admin(group_id: GroupId, user_id: UserId) -> Self {
        Self {
            role: MemberRole::Admin,
            ..Self::new(group_id, user_id)
        }
    }
}

/// Returns the user ids of a member list, in list order
pub fn roster(members: &[GroupMember]) -> Vec<UserId> {
    members.iter().map(|m| m.user_id).collect()
}
