//! WebSocket gateway integration tests
//!
//! Same requirements as `api_tests`: PostgreSQL, Redis, and the
//! DATABASE_URL, REDIS_URL and JWT_SECRET variables.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::time::Duration;

use integration_tests::{
    assert_json, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_handshake_requires_token() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    assert_eq!(server.reject_status("").await.unwrap(), 401);
    assert_eq!(server.reject_status("?token=garbage").await.unwrap(), 401);
}

#[tokio::test]
async fn test_create_room_over_socket() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let ann = seed_user(&server.pool, "ann").await.unwrap();
    let bob = seed_user(&server.pool, "bob").await.unwrap();

    let mut ann_socket = server.connect_socket(ann).await.unwrap();
    let mut bob_socket = server.connect_socket(bob).await.unwrap();

    ann_socket
        .emit("createRoom", json!({ "participants": [bob], "chatroomName": "" }))
        .await
        .unwrap();
    let created = ann_socket.expect_event("roomCreated").await.unwrap();
    assert_eq!(created["chatroomName"], "ann and bob");

    // Only the requester hears about the room
    assert!(bob_socket.is_quiet(Duration::from_millis(300)).await);

    // The REST path resolves the same pair to the same room
    let response = server
        .post_auth("/chat/rooms", bob, &CreateRoomBody::with(ann))
        .await
        .unwrap();
    let room: RoomCreated = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(created["roomId"], room.room_id);
}

#[tokio::test]
async fn test_message_fans_out_to_both_participants() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let ann = seed_user(&server.pool, "ann").await.unwrap();
    let bob = seed_user(&server.pool, "bob").await.unwrap();
    let eve = seed_user(&server.pool, "eve").await.unwrap();

    let mut ann_socket = server.connect_socket(ann).await.unwrap();
    let mut bob_socket = server.connect_socket(bob).await.unwrap();
    let mut eve_socket = server.connect_socket(eve).await.unwrap();

    ann_socket
        .emit("createRoom", json!({ "participants": [ann, bob] }))
        .await
        .unwrap();
    let created = ann_socket.expect_event("roomCreated").await.unwrap();
    let room_id = created["roomId"].as_i64().unwrap();

    ann_socket
        .emit("sendMessage", json!({ "roomId": room_id, "content": "  hi bob  " }))
        .await
        .unwrap();

    for socket in [&mut ann_socket, &mut bob_socket] {
        let message = socket.expect_event("newMessage").await.unwrap();
        assert_eq!(message["sender"], "ann");
        assert_eq!(message["content"], "hi bob");
        assert_eq!(message["room"], room_id);
        assert_eq!(message["read"], false);
    }

    assert!(eve_socket.is_quiet(Duration::from_millis(300)).await);

    let response = server
        .get_auth(&format!("/chat/rooms/{room_id}/messages"), bob)
        .await
        .unwrap();
    let messages: Vec<MessageBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "hi bob");
}

#[tokio::test]
async fn test_rest_send_reaches_sockets() {
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

    // Connecting after the room exists registers it for delivery
    let mut bob_socket = server.connect_socket(bob).await.unwrap();

    let response = server
        .post_auth(
            &format!("/chat/rooms/{}/send", room.room_id),
            ann,
            &SendMessageBody::new(ann, "from rest"),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let message = bob_socket.expect_event("newMessage").await.unwrap();
    assert_eq!(message["content"], "from rest");
    assert_eq!(message["room"], room.room_id);
}

#[tokio::test]
async fn test_socket_errors_keep_connection_open() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let ann = seed_user(&server.pool, "ann").await.unwrap();
    let mut socket = server.connect_socket(ann).await.unwrap();

    socket
        .emit("sendMessage", json!({ "roomId": 0, "content": "hello" }))
        .await
        .unwrap();
    let error = socket.expect_event("error").await.unwrap();
    assert_eq!(error["code"], "ROOM_NOT_FOUND");

    socket.emit("noSuchEvent", json!({})).await.unwrap();
    let error = socket.expect_event("error").await.unwrap();
    assert_eq!(error["code"], "INVALID_PAYLOAD");

    socket
        .emit("createRoom", json!({ "participants": [ann] }))
        .await
        .unwrap();
    let error = socket.expect_event("error").await.unwrap();
    assert_eq!(error["code"], "SELF_CONVERSATION");

    socket.close().await.unwrap();
}
