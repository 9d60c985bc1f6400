//! User entity - identity record owned by the profile subsystem
//!
//! The chat core only reads users to check that a recipient exists and to
//! attach a display name to outgoing events.

use crate::value_objects::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub nickname: String,
}

impl User {
    pub fn new(id: UserId, nickname: impl Into<String>) -> Self {
        Self {
            id,
            nickname: nickname.into(),
        }
    }

    /// Name shown to other users, falls back to the numeric id
    pub fn display_name(&self) -> String {
        if self.nickname.trim().is_empty() {
            self.id.to_string()
        } else {
            self.nickname.clone()
        }
    }
}
