//! Games API integration tests

use super::call;
use crate::common::{create_test_user, test_state};
use axum::http::{Method, StatusCode};
use gamechat::backend::server::create_app_with_state;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_create_and_list_games() {
    let state = test_state();
    let user = create_test_user(&state, "Alice").await;
    let app = create_app_with_state(state);

    let created = call(
        &app,
        Method::POST,
        "/games",
        Some(&user.token),
        Some(json!({ "playerId": user.id, "gameParameters": { "name": "Trivia Night" } })),
    )
    .await;
    assert_eq!(created.status, StatusCode::OK);
    let game_id = created.body["gameId"].as_str().unwrap().to_string();

    // Listing is public
    let listed = call(&app, Method::GET, "/games", None, None).await;
    assert_eq!(listed.status, StatusCode::OK);
    let games = listed.body.as_array().unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0]["gameId"], game_id);
    assert_eq!(games[0]["name"], "Trivia Night");
    assert_eq!(games[0]["creatorId"], user.id.to_string());
    assert!(games[0].get("createdAt").is_some());
}

#[tokio::test]
async fn test_games_listed_in_creation_order_with_default_names() {
    let state = test_state();
    let user = create_test_user(&state, "Alice").await;
    let app = create_app_with_state(state);

    for _ in 0..2 {
        let created = call(&app, Method::POST, "/games", Some(&user.token), Some(json!({ "playerId": user.id }))).await;
        assert_eq!(created.status, StatusCode::OK);
    }

    let listed = call(&app, Method::GET, "/games", None, None).await;
    let names: Vec<&str> = listed
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|game| game["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Game 1", "Game 2"]);
}

#[tokio::test]
async fn test_create_game_validation() {
    let state = test_state();
    let user = create_test_user(&state, "Alice").await;
    let app = create_app_with_state(state.clone());

    let unauthenticated = call(&app, Method::POST, "/games", None, Some(json!({ "playerId": user.id }))).await;
    assert_eq!(unauthenticated.status, StatusCode::UNAUTHORIZED);

    let missing_player = call(&app, Method::POST, "/games", Some(&user.token), Some(json!({}))).await;
    assert_eq!(missing_player.status, StatusCode::BAD_REQUEST);

    let other_player = call(
        &app,
        Method::POST,
        "/games",
        Some(&user.token),
        Some(json!({ "playerId": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(other_player.status, StatusCode::FORBIDDEN);

    let blank_name = call(
        &app,
        Method::POST,
        "/games",
        Some(&user.token),
        Some(json!({ "playerId": user.id, "gameParameters": { "name": "   " } })),
    )
    .await;
    assert_eq!(blank_name.status, StatusCode::BAD_REQUEST);

    // Nothing was created
    assert!(state.hub.list_rooms().await.is_empty());
}

#[tokio::test]
async fn test_join_game() {
    let state = test_state();
    let user = create_test_user(&state, "Alice").await;
    let app = create_app_with_state(state.clone());

    let created = call(&app, Method::POST, "/games", Some(&user.token), Some(json!({ "playerId": user.id }))).await;
    let game_id = created.body["gameId"].as_str().unwrap().to_string();

    let joined = call(
        &app,
        Method::POST,
        "/games/join",
        Some(&user.token),
        Some(json!({ "playerId": user.id, "gameId": game_id })),
    )
    .await;

    assert_eq!(joined.status, StatusCode::OK);
    assert_eq!(joined.body["status"], "joined");
    assert_eq!(joined.body["gameId"], game_id);
    // No live connections yet; the selection applies to later ones
    assert_eq!(joined.body["connections"], 0);
    assert_eq!(
        state.hub.directory().selected_room(user.id).await.map(|id| id.to_string()),
        Some(game_id)
    );
}

#[tokio::test]
async fn test_join_game_errors() {
    let state = test_state();
    let user = create_test_user(&state, "Alice").await;
    let app = create_app_with_state(state);

    let missing_game = call(
        &app,
        Method::POST,
        "/games/join",
        Some(&user.token),
        Some(json!({ "playerId": user.id })),
    )
    .await;
    assert_eq!(missing_game.status, StatusCode::BAD_REQUEST);

    let unknown_game = call(
        &app,
        Method::POST,
        "/games/join",
        Some(&user.token),
        Some(json!({ "playerId": user.id, "gameId": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(unknown_game.status, StatusCode::NOT_FOUND);

    let garbage_game = call(
        &app,
        Method::POST,
        "/games/join",
        Some(&user.token),
        Some(json!({ "playerId": user.id, "gameId": "no-such-game" })),
    )
    .await;
    assert_eq!(garbage_game.status, StatusCode::NOT_FOUND);
}
