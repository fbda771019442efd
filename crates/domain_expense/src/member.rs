//! Group members
//!
//! Members are owned by the roster collaborator; the engine only reads them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use core_kernel::MemberId;
use crate::error::ValidationError;

/// A member of an expense-sharing group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Unique identifier
    pub id: MemberId,
    /// Name shown to other members
    pub display_name: String,
    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Member {
    /// Creates a member with a fresh identifier
    pub fn new(display_name: impl Into<String>) -> Self {
        Self::with_id(MemberId::new(), display_name)
    }

    /// Creates a member with a known identifier
    pub fn with_id(id: MemberId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            email: None,
            avatar: None,
        }
    }

    /// Sets the contact email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the avatar URL
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

/// Returns the identifiers of a roster in iteration order
pub fn roster_ids(roster: &[Member]) -> Vec<MemberId> {
    roster.iter().map(|m| m.id).collect()
}

/// Fails on the first member that appears more than once
pub fn ensure_unique_members(members: impl IntoIterator<Item = MemberId>) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for member in members {
        if !seen.insert(member) {
            return Err(ValidationError::DuplicateMember(member));
        }
    }
    Ok(())
}
