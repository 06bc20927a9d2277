use holdem_web::server::{ServerConfig, WebServer};
use serde_json::{json, Value};
use std::time::Duration;
use warp::hyper::{self, Body, Client as HyperClient, Request};

async fn body_json(response: hyper::Response<Body>) -> Value {
    let bytes = hyper::body::to_bytes(response.into_body())
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("parse json body")
}

/// Drives the full command surface over real HTTP: start a game, read it
/// back, take a player action, and close it out via end-game.
#[tokio::test]
async fn game_api_lifecycle() {
    let server = WebServer::new(ServerConfig::for_tests());
    let handle = server.start().await.expect("start server");
    let address = handle.address();
    let client = HyperClient::new();

    tokio::time::sleep(Duration::from_millis(20)).await;

    let create_uri: hyper::Uri = format!("http://{address}/api/games").parse().unwrap();
    let create_request = Request::builder()
        .method(hyper::Method::POST)
        .uri(create_uri)
        .header(hyper::header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "blind_time_secs": 60,
                "starting_chips": 10000,
                "player_names": ["a", "b", "c", "d"],
            })
            .to_string(),
        ))
        .unwrap();

    let create_response = client.request(create_request).await.unwrap();
    assert_eq!(create_response.status(), hyper::StatusCode::CREATED);
    let snapshot = body_json(create_response).await;

    let game_id = snapshot["game"]["id"].as_str().unwrap().to_string();
    let hand_id = snapshot["hand"]["id"].as_str().unwrap().to_string();
    assert_eq!(snapshot["hand"]["pot"], 150);
    assert_eq!(snapshot["players"].as_array().unwrap().len(), 4);

    let active_uri: hyper::Uri = format!("http://{address}/api/games/active").parse().unwrap();
    let active_response = client.get(active_uri).await.unwrap();
    assert_eq!(active_response.status(), hyper::StatusCode::OK);
    let active_snapshot = body_json(active_response).await;
    assert_eq!(active_snapshot["game"]["id"], game_id);

    // Whoever the hand reports as on-turn folds; the API doesn't assume
    // the caller already knows seat order.
    let turn_seat = snapshot["hand"]["turn_seat"].as_u64().unwrap();
    let player_id = snapshot["players"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["seat"].as_u64().unwrap() == turn_seat)
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let action_uri: hyper::Uri = format!(
        "http://{address}/api/games/{game_id}/hands/{hand_id}/actions"
    )
    .parse()
    .unwrap();
    let action_request = Request::builder()
        .method(hyper::Method::POST)
        .uri(action_uri)
        .header(hyper::header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "player_id": player_id,
                "action_type": "fold",
            })
            .to_string(),
        ))
        .unwrap();
    let action_response = client.request(action_request).await.unwrap();
    assert_eq!(action_response.status(), hyper::StatusCode::OK);

    let end_uri: hyper::Uri = format!("http://{address}/api/games/{game_id}/end")
        .parse()
        .unwrap();
    let end_request = Request::builder()
        .method(hyper::Method::POST)
        .uri(end_uri)
        .body(Body::empty())
        .unwrap();
    let end_response = client.request(end_request).await.unwrap();
    assert_eq!(end_response.status(), hyper::StatusCode::OK);
    let end_body = body_json(end_response).await;
    assert_eq!(end_body["is_ended_game"], true);

    handle.shutdown().await.expect("graceful shutdown");
}

#[tokio::test]
async fn unknown_game_id_on_action_is_a_client_error_not_a_panic() {
    let server = WebServer::new(ServerConfig::for_tests());
    let handle = server.start().await.expect("start server");
    let address = handle.address();
    let client = HyperClient::new();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let random_id = uuid::Uuid::new_v4();
    let uri: hyper::Uri = format!(
        "http://{address}/api/games/{random_id}/hands/{random_id}/actions"
    )
    .parse()
    .unwrap();
    let request = Request::builder()
        .method(hyper::Method::POST)
        .uri(uri)
        .header(hyper::header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"player_id": random_id.to_string(), "action_type": "fold"}).to_string(),
        ))
        .unwrap();
    let response = client.request(request).await.unwrap();
    assert!(response.status().is_client_error());

    handle.shutdown().await.expect("graceful shutdown");
}
