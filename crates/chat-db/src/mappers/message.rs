//! Message entity <-> model mapper

use chat_core::entities::Message;
use chat_core::value_objects::{MessageId, RoomId, UserId};

use crate::models::MessageModel;

/// Convert MessageModel to Message entity
impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: MessageId::new(model.id),
            room_id: RoomId::new(model.room_id),
            sender_id: UserId::new(model.sender_id),
            content: model.content,
            created_at: model.created_at,
            read: model.read,
        }
    }
}
