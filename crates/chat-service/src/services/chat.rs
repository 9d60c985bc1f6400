//! Chat service
//!
//! One-to-one room creation, message ingestion and history reads. Sending
//! a message persists it and publishes one fan-out event; sockets are never
//! written to from here.

use chat_core::entities::{derive_room_name, Message, NewMessage, NewRoom, Room};
use chat_core::events::FanoutEvent;
use chat_core::{DomainError, ParticipantPair, RoomId, UserId};
use tracing::{debug, info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Chat service
pub struct ChatService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChatService<'a> {
    /// Create a new ChatService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create or get the room shared by the requester and one other user
    ///
    /// The requester is added to `participants` when absent. A blank label is
    /// replaced by "<requester> and <recipient>".
    #[instrument(skip(self))]
    pub async fn create_room(
        &self,
        requester: UserId,
        participants: &[UserId],
        label: &str,
    ) -> ServiceResult<Room> {
        let pair = ParticipantPair::from_request(participants, requester)?;
        let recipient_id = pair
            .other(requester)
            .ok_or_else(|| DomainError::InvalidParticipants("requester must take part".into()))?;

        let recipient = self
            .ctx
            .user_directory()
            .find_by_id(recipient_id)
            .await?
            .ok_or(DomainError::RecipientNotFound(recipient_id))?;

        let label = label.trim();
        let name = if label.is_empty() {
            let requester_name = self.display_name(requester, None).await?;
            derive_room_name(&requester_name, &recipient.display_name())
        } else {
            label.to_string()
        };

        let room = self
            .ctx
            .room_repo()
            .create(&NewRoom::new(name, pair).with_creator(requester))
            .await?;

        info!(room_id = %room.id, low = %pair.low(), high = %pair.high(), "Room ready");

        Ok(room)
    }

    /// Get a room the requester participates in
    #[instrument(skip(self))]
    pub async fn get_room(&self, requester: UserId, room_id: RoomId) -> ServiceResult<Room> {
        let room = self.find_room(room_id).await?;
        ensure_participant(&room, requester)?;
        Ok(room)
    }

    /// List the rooms of a user, newest first
    #[instrument(skip(self))]
    pub async fn list_rooms(&self, user_id: UserId) -> ServiceResult<Vec<Room>> {
        Ok(self.ctx.room_repo().list_for_user(user_id).await?)
    }

    /// Persist a message and publish its fan-out event
    ///
    /// `fallback_name` is used as the sender's display name when the user
    /// directory has no entry. A publish failure is returned as
    /// `BusUnavailable` even though the message stays saved.
    #[instrument(skip(self, content, fallback_name))]
    pub async fn send_message(
        &self,
        room_id: RoomId,
        sender: UserId,
        content: &str,
        fallback_name: Option<&str>,
    ) -> ServiceResult<Message> {
        let room = self.find_room(room_id).await?;
        ensure_participant(&room, sender)?;

        let new_message = NewMessage::new(room_id, sender, content)?;
        let message = self.ctx.message_repo().save(&new_message).await?;

        debug!(message_id = %message.id, room_id = %room_id, "Message persisted");

        let sender_name = self.display_name(sender, fallback_name).await?;
        let event = FanoutEvent::from_message(&message, sender_name);

        if let Err(e) = self.ctx.event_bus().publish(&event).await {
            warn!(message_id = %message.id, room_id = %room_id, error = %e, "Message saved but not published");
            return Err(e.into());
        }

        Ok(message)
    }

    /// List the messages of a room in ascending order
    #[instrument(skip(self))]
    pub async fn list_messages(
        &self,
        requester: UserId,
        room_id: RoomId,
    ) -> ServiceResult<Vec<Message>> {
        let room = self.find_room(room_id).await?;
        ensure_participant(&room, requester)?;
        Ok(self.ctx.message_repo().list_by_room(room_id).await?)
    }

    /// Participants of a room, if it exists
    #[instrument(skip(self))]
    pub async fn room_participants(&self, room_id: RoomId) -> ServiceResult<Option<ParticipantPair>> {
        let room = self.ctx.room_repo().find_by_id(room_id).await?;
        Ok(room.map(|r| r.participants))
    }

    async fn find_room(&self, room_id: RoomId) -> ServiceResult<Room> {
        Ok(self
            .ctx
            .room_repo()
            .find_by_id(room_id)
            .await?
            .ok_or(DomainError::RoomNotFound(room_id))?)
    }

    async fn display_name(&self, user_id: UserId, fallback: Option<&str>) -> ServiceResult<String> {
        let user = self.ctx.user_directory().find_by_id(user_id).await?;

        let name = match (user, fallback.map(str::trim)) {
            (Some(user), Some(fallback)) if user.nickname.trim().is_empty() && !fallback.is_empty() => {
                fallback.to_string()
            }
            (Some(user), _) => user.display_name(),
            (None, Some(fallback)) if !fallback.is_empty() => fallback.to_string(),
            (None, _) => user_id.to_string(),
        };

        Ok(name)
    }
}

/// Reject callers that are not one of the room's two participants
pub(crate) fn ensure_participant(room: &Room, user_id: UserId) -> Result<(), DomainError> {
    if room.has_participant(user_id) {
        Ok(())
    } else {
        Err(DomainError::NotParticipant {
            room_id: room.id,
            user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chat_common::JwtService;
    use chat_core::testing::{
        InMemoryEventBus, InMemoryFavoriteRepository, InMemoryMessageRepository,
        InMemoryRoomRepository, InMemoryUserDirectory,
    };

    use super::*;
    use crate::services::{ServiceContextBuilder, ServiceError};

    struct Fixture {
        ctx: ServiceContext,
        rooms: Arc<InMemoryRoomRepository>,
        messages: Arc<InMemoryMessageRepository>,
        bus: Arc<InMemoryEventBus>,
    }

    fn fixture() -> Fixture {
        let rooms = Arc::new(InMemoryRoomRepository::default());
        let messages = Arc::new(InMemoryMessageRepository::new(rooms.clone()));
        let bus = Arc::new(InMemoryEventBus::default());
        let users = InMemoryUserDirectory::with_users(&[(1, "ann"), (2, "bob"), (3, "cid"), (4, "")]);

        let ctx = ServiceContextBuilder::new()
            .room_repo(rooms.clone())
            .message_repo(messages.clone())
            .user_directory(Arc::new(users))
            .favorite_repo(Arc::new(InMemoryFavoriteRepository::default()))
            .event_bus(bus.clone())
            .jwt_service(Arc::new(JwtService::new("secret", 900)))
            .build()
            .unwrap();

        Fixture {
            ctx,
            rooms,
            messages,
            bus,
        }
    }

    fn uid(id: i64) -> UserId {
        UserId::new(id)
    }

    fn domain(err: ServiceError) -> DomainError {
        match err {
            ServiceError::Domain(e) => e,
            other => panic!("expected domain error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_room_is_idempotent_in_either_order() {
        let f = fixture();
        let service = ChatService::new(&f.ctx);

        let first = service.create_room(uid(1), &[uid(1), uid(2)], "").await.unwrap();
        let second = service.create_room(uid(2), &[uid(1)], "other label").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.name, "ann and bob");
        assert_eq!(second.name, "ann and bob");
        assert_eq!(f.rooms.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_create_room_yields_one_room() {
        let Fixture { ctx, rooms, .. } = fixture();
        let ctx = Arc::new(ctx);

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let ctx = ctx.clone();
                let (requester, other) = if i % 2 == 0 { (1, 2) } else { (2, 1) };
                tokio::spawn(async move {
                    ChatService::new(&ctx)
                        .create_room(uid(requester), &[uid(other)], "")
                        .await
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }

        assert!(ids.iter().all(|id| *id == ids[0]));
        assert_eq!(rooms.len(), 1);
    }

    #[tokio::test]
    async fn test_create_room_adds_requester() {
        let f = fixture();
        let service = ChatService::new(&f.ctx);

        let room = service.create_room(uid(3), &[uid(2)], "  work  ").await.unwrap();

        assert!(room.has_participant(uid(3)));
        assert!(room.has_participant(uid(2)));
        assert_eq!(room.name, "work");
        assert_eq!(room.created_by, Some(uid(3)));
    }

    #[tokio::test]
    async fn test_create_room_rejects_self_and_third_parties() {
        let f = fixture();
        let service = ChatService::new(&f.ctx);

        let err = service.create_room(uid(1), &[uid(1)], "").await.unwrap_err();
        assert_eq!(domain(err), DomainError::SelfConversation);

        let err = service.create_room(uid(1), &[uid(2), uid(3)], "").await.unwrap_err();
        assert!(matches!(domain(err), DomainError::InvalidParticipants(_)));
        assert!(f.rooms.is_empty());
    }

    #[tokio::test]
    async fn test_create_room_unknown_recipient() {
        let f = fixture();
        let service = ChatService::new(&f.ctx);

        let err = service.create_room(uid(1), &[uid(99)], "").await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(domain(err), DomainError::RecipientNotFound(uid(99)));
        assert!(f.rooms.is_empty());
    }

    #[tokio::test]
    async fn test_send_message_persists_and_publishes() {
        let f = fixture();
        let service = ChatService::new(&f.ctx);
        let mut events = f.bus.subscribe();
        let room = service.create_room(uid(1), &[uid(2)], "").await.unwrap();

        let message = service.send_message(room.id, uid(1), "  hello  ", None).await.unwrap();

        assert_eq!(message.content, "hello");
        assert!(!message.read);
        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            FanoutEvent {
                sender: "ann".to_string(),
                content: "hello".to_string(),
                room: room.id,
                read: false,
            }
        );
    }

    #[tokio::test]
    async fn test_send_blank_message_is_rejected() {
        let f = fixture();
        let service = ChatService::new(&f.ctx);
        let room = service.create_room(uid(1), &[uid(2)], "").await.unwrap();

        let err = service.send_message(room.id, uid(1), " \n\t ", None).await.unwrap_err();

        assert_eq!(domain(err), DomainError::EmptyMessage);
        assert!(f.messages.is_empty());
        assert!(f.bus.published().is_empty());
    }

    #[tokio::test]
    async fn test_send_to_unknown_room() {
        let f = fixture();
        let service = ChatService::new(&f.ctx);

        let err = service.send_message(RoomId::new(42), uid(1), "hi", None).await.unwrap_err();

        assert_eq!(domain(err), DomainError::RoomNotFound(RoomId::new(42)));
        assert!(f.messages.is_empty());
        assert!(f.bus.published().is_empty());
    }

    #[tokio::test]
    async fn test_send_by_non_participant() {
        let f = fixture();
        let service = ChatService::new(&f.ctx);
        let room = service.create_room(uid(1), &[uid(2)], "").await.unwrap();

        let err = service.send_message(room.id, uid(3), "hi", None).await.unwrap_err();

        assert_eq!(err.status_code(), 403);
        assert!(f.messages.is_empty());
    }

    #[tokio::test]
    async fn test_send_uses_fallback_name() {
        let f = fixture();
        let service = ChatService::new(&f.ctx);
        let room = service.create_room(uid(4), &[uid(2)], "").await.unwrap();

        service.send_message(room.id, uid(4), "hey", Some("dee")).await.unwrap();
        service.send_message(room.id, uid(4), "hey again", None).await.unwrap();

        let published = f.bus.published();
        assert_eq!(published[0].sender, "dee");
        assert_eq!(published[1].sender, "4");
    }

    #[tokio::test]
    async fn test_publish_failure_keeps_message() {
        let f = fixture();
        let service = ChatService::new(&f.ctx);
        let room = service.create_room(uid(1), &[uid(2)], "").await.unwrap();
        f.bus.set_unavailable(true);

        let err = service.send_message(room.id, uid(1), "hi", None).await.unwrap_err();

        assert!(matches!(domain(err), DomainError::BusUnavailable(_)));
        assert_eq!(f.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_publishes_nothing() {
        let f = fixture();
        let service = ChatService::new(&f.ctx);
        let room = service.create_room(uid(1), &[uid(2)], "").await.unwrap();
        f.messages.set_unavailable(true);

        let err = service.send_message(room.id, uid(1), "hi", None).await.unwrap_err();

        assert!(domain(err).is_infrastructure());
        assert!(f.bus.published().is_empty());
    }

    #[tokio::test]
    async fn test_list_messages_ascending_and_empty() {
        let f = fixture();
        let service = ChatService::new(&f.ctx);
        let room = service.create_room(uid(1), &[uid(2)], "").await.unwrap();

        assert!(service.list_messages(uid(1), room.id).await.unwrap().is_empty());

        service.send_message(room.id, uid(1), "one", None).await.unwrap();
        service.send_message(room.id, uid(2), "two", None).await.unwrap();

        let contents: Vec<String> = service
            .list_messages(uid(2), room.id)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_list_messages_unknown_room() {
        let f = fixture();
        let service = ChatService::new(&f.ctx);

        let err = service.list_messages(uid(1), RoomId::new(5)).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_get_room_and_list_rooms() {
        let f = fixture();
        let service = ChatService::new(&f.ctx);
        let with_bob = service.create_room(uid(1), &[uid(2)], "").await.unwrap();
        let with_cid = service.create_room(uid(3), &[uid(1)], "").await.unwrap();
        service.create_room(uid(2), &[uid(3)], "").await.unwrap();

        assert_eq!(service.get_room(uid(2), with_bob.id).await.unwrap().id, with_bob.id);
        assert!(service.get_room(uid(3), with_bob.id).await.is_err());

        let ids: Vec<RoomId> = service.list_rooms(uid(1)).await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&with_bob.id));
        assert!(ids.contains(&with_cid.id));

        assert_eq!(
            service.room_participants(with_cid.id).await.unwrap(),
            Some(ParticipantPair::new(uid(1), uid(3)).unwrap())
        );
        assert_eq!(service.room_participants(RoomId::new(99)).await.unwrap(), None);
    }
}
