//! Room entity <-> model mapper

use chat_core::entities::{NewRoom, Room};
use chat_core::error::DomainError;
use chat_core::value_objects::{ParticipantPair, RoomId, UserId};

use crate::models::RoomModel;

/// Convert RoomModel to Room entity
///
/// Fails only if a row violates the pair invariant, which the table's
/// check constraint rules out.
impl TryFrom<RoomModel> for Room {
    type Error = DomainError;

    fn try_from(model: RoomModel) -> Result<Self, Self::Error> {
        let participants =
            ParticipantPair::new(UserId::new(model.participant_low), UserId::new(model.participant_high))
                .map_err(|_| {
                    DomainError::DatabaseError(format!("room {} has an invalid participant pair", model.id))
                })?;

        Ok(Room {
            id: RoomId::new(model.id),
            name: model.name,
            participants,
            created_by: model.created_by.map(UserId::new),
            created_at: model.created_at,
        })
    }
}

/// Values bound when inserting a room
pub struct RoomInsert<'a> {
    pub name: &'a str,
    pub participant_low: i64,
    pub participant_high: i64,
    pub created_by: Option<i64>,
}

impl<'a> RoomInsert<'a> {
    pub fn new(room: &'a NewRoom) -> Self {
        Self {
            name: &room.name,
            participant_low: room.participants.low().into_inner(),
            participant_high: room.participants.high().into_inner(),
            created_by: room.created_by.map(UserId::into_inner),
        }
    }
}
