//! Handshake and per-connection protocol tests

use crate::common::*;
use assert_matches::assert_matches;
use futures_util::SinkExt;
use gamechat::shared::{ErrorCode, ServerEvent};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{header, HeaderValue};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

#[tokio::test]
async fn test_upgrade_rejected_without_valid_token() {
    let server = TestServer::spawn().await;

    for url in [server.socket_base(), server.socket_url("not.a.jwt")] {
        let err = tokio_tungstenite::connect_async(url.as_str()).await.unwrap_err();
        match err {
            WsError::Http(response) => assert_eq!(response.status(), 401),
            other => panic!("Expected an HTTP rejection, got {:?}", other),
        }
    }

    // Nothing was registered
    assert_eq!(server.state.hub.stats().await.connections, 0);
}

#[tokio::test]
async fn test_upgrade_with_cookie() {
    let server = TestServer::spawn().await;
    let alice = create_test_user(&server.state, "Alice").await;

    let mut request = server.socket_base().into_client_request().unwrap();
    request.headers_mut().insert(
        header::COOKIE,
        HeaderValue::from_str(&format!("authToken={}", alice.token)).unwrap(),
    );
    let (mut ws, _) = tokio_tungstenite::connect_async(request).await.unwrap();

    send_json(&mut ws, json!({ "type": "getMessages" })).await;
    assert_eq!(next_event(&mut ws).await, ServerEvent::GetMessagesResponse { messages: vec![] });
}

#[tokio::test]
async fn test_send_before_join_then_join() {
    let server = TestServer::spawn().await;
    let alice = create_test_user(&server.state, "Alice").await;
    let room = server.state.hub.create_room(Some("Lobby"), alice.id).await.unwrap();
    let mut ws = connect(&server.socket_url(&alice.token)).await;

    send_json(&mut ws, json!({ "type": "sendMessage", "message": "too early" })).await;
    assert_matches!(
        next_event(&mut ws).await,
        ServerEvent::Error { code: ErrorCode::NotInRoom, .. }
    );

    // The connection stays usable
    send_json(&mut ws, json!({ "type": "joinGame", "gameId": room.id })).await;
    assert_eq!(
        next_event(&mut ws).await,
        ServerEvent::JoinGameResponse {
            game_id: room.id,
            name: "Lobby".to_string()
        }
    );
    assert_eq!(
        next_event(&mut ws).await,
        ServerEvent::PlayerJoinedChatNotification {
            screen_name: "Alice".to_string()
        }
    );

    send_json(&mut ws, json!({ "type": "sendMessage", "message": "hello" })).await;
    assert_eq!(
        next_event(&mut ws).await,
        ServerEvent::MessageReceivedNotification {
            screen_name: "Alice".to_string(),
            message: "hello".to_string()
        }
    );
}

#[tokio::test]
async fn test_unknown_room_is_acknowledged() {
    let server = TestServer::spawn().await;
    let alice = create_test_user(&server.state, "Alice").await;
    let mut ws = connect(&server.socket_url(&alice.token)).await;

    send_json(&mut ws, json!({ "type": "joinGame", "gameId": uuid::Uuid::new_v4() })).await;
    assert_matches!(
        next_event(&mut ws).await,
        ServerEvent::Error { code: ErrorCode::RoomNotFound, .. }
    );

    send_json(&mut ws, json!({ "type": "getPlayers" })).await;
    assert_eq!(
        next_event(&mut ws).await,
        ServerEvent::GetPlayersResponse { screen_names: vec![] }
    );
}

#[tokio::test]
async fn test_invalid_message_keeps_connection() {
    let server = TestServer::spawn().await;
    let alice = create_test_user(&server.state, "Alice").await;
    let room = server.state.hub.create_room(Some("Lobby"), alice.id).await.unwrap();
    let mut ws = connect(&server.socket_url(&alice.token)).await;

    send_json(&mut ws, json!({ "type": "joinGame", "gameId": room.id })).await;
    next_event(&mut ws).await;
    next_event(&mut ws).await;

    send_json(&mut ws, json!({ "type": "sendMessage", "message": "   " })).await;
    assert_matches!(
        next_event(&mut ws).await,
        ServerEvent::Error { code: ErrorCode::InvalidMessage, .. }
    );

    let too_long = "x".repeat(server.state.config.max_message_len + 1);
    send_json(&mut ws, json!({ "type": "sendMessage", "message": too_long })).await;
    assert_matches!(
        next_event(&mut ws).await,
        ServerEvent::Error { code: ErrorCode::InvalidMessage, .. }
    );

    send_json(&mut ws, json!({ "type": "getMessages" })).await;
    assert_eq!(next_event(&mut ws).await, ServerEvent::GetMessagesResponse { messages: vec![] });
}

#[tokio::test]
async fn test_malformed_frame_closes_with_1007() {
    let server = TestServer::spawn().await;
    let alice = create_test_user(&server.state, "Alice").await;
    let mut ws = connect(&server.socket_url(&alice.token)).await;

    ws.send(Message::text("{not json")).await.unwrap();

    assert_matches!(
        next_event(&mut ws).await,
        ServerEvent::Error { code: ErrorCode::MalformedFrame, .. }
    );
    assert_eq!(expect_close(&mut ws).await, 1007);
}

#[tokio::test]
async fn test_binary_frame_closes_with_1003() {
    let server = TestServer::spawn().await;
    let alice = create_test_user(&server.state, "Alice").await;
    let mut ws = connect(&server.socket_url(&alice.token)).await;

    ws.send(Message::binary(vec![1u8, 2, 3])).await.unwrap();

    assert_eq!(expect_close(&mut ws).await, 1003);
}

#[tokio::test]
async fn test_unknown_frame_type_is_ignored() {
    let server = TestServer::spawn().await;
    let alice = create_test_user(&server.state, "Alice").await;
    let mut ws = connect(&server.socket_url(&alice.token)).await;

    send_json(&mut ws, json!({ "type": "somethingNew", "value": 1 })).await;
    expect_silence(&mut ws).await;

    send_json(&mut ws, json!({ "type": "getMessages" })).await;
    assert_matches!(next_event(&mut ws).await, ServerEvent::GetMessagesResponse { .. });
}

#[tokio::test]
async fn test_screen_name_changes_sender_name() {
    let server = TestServer::spawn().await;
    let alice = create_test_user(&server.state, "Alice").await;
    let room = server.state.hub.create_room(Some("Lobby"), alice.id).await.unwrap();
    let mut ws = connect(&server.socket_url(&alice.token)).await;

    send_json(&mut ws, json!({ "type": "setScreenName", "screenName": "  " })).await;
    assert_matches!(
        next_event(&mut ws).await,
        ServerEvent::Error { code: ErrorCode::InvalidScreenName, .. }
    );

    send_json(&mut ws, json!({ "type": "setScreenName", "screenName": "QuizMaster" })).await;
    send_json(&mut ws, json!({ "type": "joinGame", "gameId": room.id })).await;
    next_event(&mut ws).await;
    assert_eq!(
        next_event(&mut ws).await,
        ServerEvent::PlayerJoinedChatNotification {
            screen_name: "QuizMaster".to_string()
        }
    );

    send_json(&mut ws, json!({ "type": "getPlayers" })).await;
    assert_eq!(
        next_event(&mut ws).await,
        ServerEvent::GetPlayersResponse {
            screen_names: vec!["QuizMaster".to_string()]
        }
    );
}

#[tokio::test]
async fn test_rest_join_moves_live_and_later_connections() {
    let server = TestServer::spawn().await;
    let alice = create_test_user(&server.state, "Alice").await;
    let room = server.state.hub.create_room(Some("Trivia Night"), alice.id).await.unwrap();
    let mut first = connect(&server.socket_url(&alice.token)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/games/join", server.http_url()))
        .bearer_auth(&alice.token)
        .json(&json!({ "playerId": alice.id, "gameId": room.id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["connections"], 1);

    assert_matches!(next_event(&mut first).await, ServerEvent::JoinGameResponse { .. });
    assert_matches!(next_event(&mut first).await, ServerEvent::PlayerJoinedChatNotification { .. });

    // A second tab lands in the selected room on connect
    let mut second = connect(&server.socket_url(&alice.token)).await;
    assert_eq!(
        next_event(&mut second).await,
        ServerEvent::JoinGameResponse {
            game_id: room.id,
            name: "Trivia Night".to_string()
        }
    );
    assert_matches!(next_event(&mut first).await, ServerEvent::PlayerJoinedChatNotification { .. });
    assert_eq!(room.member_count().await, 2);
}

#[tokio::test]
async fn test_leave_game() {
    let server = TestServer::spawn().await;
    let alice = create_test_user(&server.state, "Alice").await;
    let bob = create_test_user(&server.state, "Bob").await;
    let room = server.state.hub.create_room(Some("Lobby"), alice.id).await.unwrap();

    let mut a = connect(&server.socket_url(&alice.token)).await;
    let mut b = connect(&server.socket_url(&bob.token)).await;
    for ws in [&mut a, &mut b] {
        send_json(ws, json!({ "type": "joinGame", "gameId": room.id })).await;
        next_event(ws).await;
        next_event(ws).await;
    }
    // Alice also saw Bob join
    next_event(&mut a).await;

    send_json(&mut b, json!({ "type": "leaveGame" })).await;
    assert_eq!(
        next_event(&mut a).await,
        ServerEvent::PlayerLeftChatNotification {
            screen_name: "Bob".to_string()
        }
    );

    // Leaving again is a no-op
    send_json(&mut b, json!({ "type": "leaveGame" })).await;
    expect_silence(&mut a).await;
    assert_eq!(room.member_count().await, 1);
}
