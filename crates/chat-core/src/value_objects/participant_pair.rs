//! Participant pair - the unordered pair of users sharing a room
//!
//! The pair is stored normalized (`low < high`) so that `(a, b)` and `(b, a)`
//! compare equal and map onto the same unique key in storage.

use crate::error::DomainError;
use crate::value_objects::UserId;

/// Normalized unordered pair of two distinct users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticipantPair {
    low: UserId,
    high: UserId,
}

impl ParticipantPair {
    /// Build a pair from two user ids in any order
    ///
    /// # Errors
    /// Returns `DomainError::SelfConversation` if both ids are the same
    pub fn new(a: UserId, b: UserId) -> Result<Self, DomainError> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Ok(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Ok(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => Err(DomainError::SelfConversation),
        }
    }

    /// Build a pair from a client supplied participant list
    ///
    /// The requester is added when missing and duplicates are ignored.
    /// Exactly two distinct users must remain.
    pub fn from_request(participants: &[UserId], requester: UserId) -> Result<Self, DomainError> {
        let mut ids: Vec<UserId> = participants.to_vec();
        if !ids.contains(&requester) {
            ids.push(requester);
        }
        ids.sort_unstable();
        ids.dedup();

        match ids.as_slice() {
            [a, b] => Self::new(*a, *b),
            [_] => Err(DomainError::SelfConversation),
            _ => Err(DomainError::InvalidParticipants(format!(
                "a room needs exactly two participants, got {}",
                ids.len()
            ))),
        }
    }

    /// Smaller user id of the pair
    pub fn low(&self) -> UserId {
        self.low
    }

    /// Larger user id of the pair
    pub fn high(&self) -> UserId {
        self.high
    }

    /// Check whether a user is one of the two participants
    pub fn contains(&self, user_id: UserId) -> bool {
        self.low == user_id || self.high == user_id
    }

    /// Get the participant that is not `user_id`
    pub fn other(&self, user_id: UserId) -> Option<UserId> {
        if self.low == user_id {
            Some(self.high)
        } else if self.high == user_id {
            Some(self.low)
        } else {
            None
        }
    }

    /// Both participants, ascending
    pub fn to_vec(&self) -> Vec<UserId> {
        vec![self.low, self.high]
    }
}
