//! Handlers for the six commands in spec.md §6 / SPEC_FULL.md §6a, bound
//! to `/api/games/...` routes in [`crate::server`]. Every handler is a
//! thin adapter: deserialize the request body, call the matching
//! [`TournamentEngine`] method, serialize the resulting
//! [`holdem_engine::snapshot::Snapshot`] (or propagate its error).

use crate::errors::IntoErrorResponse;
use holdem_engine::engine::TournamentEngine;
use holdem_engine::ids::{GameId, HandId, PlayerId};
use holdem_engine::player::PlayerActionRequest;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::Reply;

#[derive(Debug, Deserialize)]
pub struct StartGameRequest {
    pub blind_time_secs: u64,
    pub starting_chips: u64,
    pub player_names: Vec<String>,
}

/// `POST /api/games` — spec.md §6 `start-game`.
pub async fn start_game(engine: Arc<TournamentEngine>, request: StartGameRequest) -> Response {
    match engine
        .start_game(
            request.blind_time_secs,
            request.starting_chips,
            request.player_names,
        )
        .await
    {
        Ok(snapshot) => success(StatusCode::CREATED, &snapshot),
        Err(err) => err.into_http_response(),
    }
}

#[derive(Debug, Serialize)]
pub struct EndGameResponse {
    pub is_ended_game: bool,
}

/// `POST /api/games/:game_id/end` — spec.md §6 `end-game`.
pub async fn end_game(engine: Arc<TournamentEngine>, game_id: GameId) -> Response {
    match engine.end_game(game_id).await {
        Ok(()) => success(StatusCode::OK, &EndGameResponse { is_ended_game: true }),
        Err(err) => err.into_http_response(),
    }
}

/// `GET /api/games/active` — spec.md §6 `get-active-game`. Returns a JSON
/// `null` body (not a 404) when no game is active, matching the command
/// surface's "snapshot or null" result.
pub async fn get_active_game(engine: Arc<TournamentEngine>) -> Response {
    match engine.get_active_game().await {
        Ok(snapshot) => success(StatusCode::OK, &snapshot),
        Err(err) => err.into_http_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct PlayerActionBody {
    pub player_id: PlayerId,
    #[serde(flatten)]
    pub request: PlayerActionRequest,
}

/// `POST /api/games/:game_id/hands/:hand_id/actions` — spec.md §6
/// `player-action`.
pub async fn player_action(
    engine: Arc<TournamentEngine>,
    game_id: GameId,
    hand_id: HandId,
    body: PlayerActionBody,
) -> Response {
    match engine
        .player_action(game_id, hand_id, body.player_id, body.request)
        .await
    {
        Ok(snapshot) => success(StatusCode::OK, &snapshot),
        Err(err) => err.into_http_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct NextHandRequest {
    pub winners: Vec<WinnerShare>,
    pub game_level: u32,
    pub rebuy_players: Vec<PlayerId>,
}

#[derive(Debug, Deserialize)]
pub struct WinnerShare {
    pub id: PlayerId,
    pub amount: u64,
}

/// `POST /api/games/:game_id/hands/:hand_id/next` — spec.md §6 `next-hand`.
pub async fn next_hand(
    engine: Arc<TournamentEngine>,
    game_id: GameId,
    hand_id: HandId,
    request: NextHandRequest,
) -> Response {
    let winners = request.winners.into_iter().map(|w| (w.id, w.amount)).collect();
    match engine
        .next_hand(game_id, hand_id, winners, request.game_level, request.rebuy_players)
        .await
    {
        Ok(snapshot) => success(StatusCode::OK, &snapshot),
        Err(err) => err.into_http_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct RebuyRequest {
    pub player_id: PlayerId,
}

/// `POST /api/games/:game_id/hands/:hand_id/rebuy` — spec.md §6 `rebuy`.
pub async fn rebuy(
    engine: Arc<TournamentEngine>,
    game_id: GameId,
    hand_id: HandId,
    request: RebuyRequest,
) -> Response {
    match engine.rebuy(game_id, hand_id, request.player_id).await {
        Ok(snapshot) => success(StatusCode::OK, &snapshot),
        Err(err) => err.into_http_response(),
    }
}

fn success<T: Serialize>(status: StatusCode, body: &T) -> Response {
    reply::with_status(reply::json(body), status).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_engine::memory::InMemoryRepository;

    fn new_engine() -> Arc<TournamentEngine> {
        Arc::new(TournamentEngine::new(Arc::new(InMemoryRepository::new())))
    }

    #[tokio::test]
    async fn start_game_returns_201_with_a_hand() {
        let engine = new_engine();
        let response = start_game(
            engine,
            StartGameRequest {
                blind_time_secs: 60,
                starting_chips: 10_000,
                player_names: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            },
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn get_active_game_is_null_before_any_game_starts() {
        let engine = new_engine();
        let response = get_active_game(engine).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn player_action_out_of_turn_surfaces_as_client_error() {
        let engine = new_engine();
        let start = engine
            .start_game(60, 10_000, vec!["a".into(), "b".into(), "c".into(), "d".into()])
            .await
            .unwrap();
        let hand = start.hand.unwrap();
        // seat 0 is not on turn preflop (turn starts after the big blind).
        let wrong_player = start.players[0].id;
        let response = player_action(
            engine,
            start.game.id,
            hand.id,
            PlayerActionBody {
                player_id: wrong_player,
                request: PlayerActionRequest::Fold,
            },
        )
        .await;
        assert!(response.status().is_client_error());
    }
}
