//! REST API integration tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Room Tests
// ============================================================================

#[tokio::test]
async fn test_rooms_require_token() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let response = server.get("/chat/rooms").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_create_room_once_per_pair() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let ann = seed_user(&server.pool, "ann").await.unwrap();
    let bob = seed_user(&server.pool, "bob").await.unwrap();

    let response = server
        .post_auth("/chat/rooms", ann, &CreateRoomBody::with(bob))
        .await
        .unwrap();
    let first: RoomCreated = assert_json(response, StatusCode::OK).await.unwrap();

    // Same pair from the other side
    let response = server
        .post_auth("/chat/rooms", bob, &CreateRoomBody::with(ann))
        .await
        .unwrap();
    let second: RoomCreated = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(first.room_id, second.room_id);

    let response = server
        .get_auth(&format!("/chat/rooms/{}", first.room_id), bob)
        .await
        .unwrap();
    let room: RoomBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(room.room_id, first.room_id);
    assert_eq!(room.chatroom_name, "ann and bob");
    assert_eq!(room.participants, vec![ann.min(bob), ann.max(bob)]);

    let response = server.get_auth("/chat/rooms", ann).await.unwrap();
    let rooms: Vec<RoomBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(rooms.len(), 1);
}

#[tokio::test]
async fn test_create_room_with_unknown_recipient() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let ann = seed_user(&server.pool, "ann").await.unwrap();
    let ghost = unique_user_id();

    let response = server
        .post_auth("/chat/rooms", ann, &CreateRoomBody::with(ghost))
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "RECIPIENT_NOT_FOUND");
}

#[tokio::test]
async fn test_get_unknown_room() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let ann = seed_user(&server.pool, "ann").await.unwrap();

    let response = server.get_auth("/chat/rooms/0", ann).await.unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body.error.code, "ROOM_NOT_FOUND");
}

// ============================================================================
// Message Tests
// ============================================================================

#[tokio::test]
async fn test_send_and_list_messages() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let ann = seed_user(&server.pool, "ann").await.unwrap();
    let bob = seed_user(&server.pool, "bob").await.unwrap();

    let response = server
        .post_auth("/chat/rooms", ann, &CreateRoomBody::with(bob))
        .await
        .unwrap();
    let room: RoomCreated = assert_json(response, StatusCode::OK).await.unwrap();

    let messages_path = format!("/chat/rooms/{}/messages", room.room_id);
    let response = server.get_auth(&messages_path, ann).await.unwrap();
    let empty: Vec<MessageBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(empty.is_empty());

    let send_path = format!("/chat/rooms/{}/send", room.room_id);
    for text in ["hello", "how are you?"] {
        let response = server
            .post_auth(&send_path, ann, &SendMessageBody::new(ann, text))
            .await
            .unwrap();
        let sent: MessageBody = assert_json(response, StatusCode::CREATED).await.unwrap();
        assert_eq!(sent.room_id, room.room_id);
        assert_eq!(sent.sender_id, ann);
        assert!(!sent.read);
    }

    let response = server.get_auth(&messages_path, bob).await.unwrap();
    let messages: Vec<MessageBody> = assert_json(response, StatusCode::OK).await.unwrap();
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["hello", "how are you?"]);
    assert!(messages[0].id < messages[1].id);
}

#[tokio::test]
async fn test_send_rejects_blank_and_impersonation() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let ann = seed_user(&server.pool, "ann").await.unwrap();
    let bob = seed_user(&server.pool, "bob").await.unwrap();

    let response = server
        .post_auth("/chat/rooms", ann, &CreateRoomBody::with(bob))
        .await
        .unwrap();
    let room: RoomCreated = assert_json(response, StatusCode::OK).await.unwrap();
    let send_path = format!("/chat/rooms/{}/send", room.room_id);

    let response = server
        .post_auth(&send_path, ann, &SendMessageBody::new(ann, "   "))
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "EMPTY_MESSAGE");

    let response = server
        .post_auth(&send_path, ann, &SendMessageBody::new(bob, "as bob"))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_outsider_cannot_read_messages() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let ann = seed_user(&server.pool, "ann").await.unwrap();
    let bob = seed_user(&server.pool, "bob").await.unwrap();
    let eve = seed_user(&server.pool, "eve").await.unwrap();

    let response = server
        .post_auth("/chat/rooms", ann, &CreateRoomBody::with(bob))
        .await
        .unwrap();
    let room: RoomCreated = assert_json(response, StatusCode::OK).await.unwrap();

    let response = server
        .get_auth(&format!("/chat/rooms/{}/messages", room.room_id), eve)
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "NOT_PARTICIPANT");
}

// ============================================================================
// Favorite Tests
// ============================================================================

#[tokio::test]
async fn test_favorites() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let ann = seed_user(&server.pool, "ann").await.unwrap();
    let bob = seed_user(&server.pool, "bob").await.unwrap();

    let response = server
        .post_auth("/chat/rooms", ann, &CreateRoomBody::with(bob))
        .await
        .unwrap();
    let room: RoomCreated = assert_json(response, StatusCode::OK).await.unwrap();
    let favorite_path = format!("/chat/rooms/{}/favorite", room.room_id);

    let response = server.put_auth(&favorite_path, ann).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get_auth("/chat/favorites", ann).await.unwrap();
    let favorites: Vec<FavoriteBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].room_id, room.room_id);

    let response = server.get_auth("/chat/favorites", bob).await.unwrap();
    let favorites: Vec<FavoriteBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(favorites.is_empty());

    let response = server.delete_auth(&favorite_path, ann).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get_auth("/chat/favorites", ann).await.unwrap();
    let favorites: Vec<FavoriteBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(favorites.is_empty());
}
