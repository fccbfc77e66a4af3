use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Json;
use serde::Deserialize;

use racer_core::geometry::Move;
use racer_core::state::GameState;
use racer_engine::TrackInfo;
use racer_engine::moves::MoveOptions;

use crate::error::AppError;
use crate::state::AppState;

type Body<T> = Result<Json<T>, JsonRejection>;

/// Request body for a player move.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub state: GameState,
    #[serde(rename = "move")]
    pub mv: Move,
}

/// POST /api/game/new: start a race on the stock track.
pub async fn new_game(State(state): State<AppState>) -> Json<GameState> {
    Json(state.racer.new_game())
}

/// POST /api/game/moves: legal moves for whoever is to move.
pub async fn get_moves(
    State(state): State<AppState>,
    body: Body<GameState>,
) -> Result<Json<MoveOptions>, AppError> {
    let Json(game) = body?;
    let options = state.racer.get_moves(&game)?;
    tracing::debug!(
        game = %game.game_id,
        side = %game.current_turn,
        count = options.moves.len(),
        penalty = options.penalty,
        "Moves requested"
    );
    Ok(Json(options))
}

/// POST /api/game/move: apply the player's move.
pub async fn make_move(
    State(state): State<AppState>,
    body: Body<MoveRequest>,
) -> Result<Json<GameState>, AppError> {
    let Json(req) = body?;
    tracing::debug!(game = %req.state.game_id, mv = %req.mv, "Player move");
    Ok(Json(state.racer.make_move(&req.state, req.mv)?))
}

/// POST /api/game/ai-move: let the computer take its turn.
pub async fn ai_move(
    State(state): State<AppState>,
    body: Body<GameState>,
) -> Result<Json<GameState>, AppError> {
    let Json(game) = body?;
    Ok(Json(state.racer.ai_move(&game)?))
}

/// POST /api/game/skip: serve a penalty turn.
pub async fn skip_turn(
    State(state): State<AppState>,
    body: Body<GameState>,
) -> Result<Json<GameState>, AppError> {
    let Json(game) = body?;
    Ok(Json(state.racer.skip_turn(&game)?))
}

/// POST /api/game/end: call the race on progress.
pub async fn end_game(
    State(state): State<AppState>,
    body: Body<GameState>,
) -> Result<Json<GameState>, AppError> {
    let Json(game) = body?;
    Ok(Json(state.racer.curtail(&game)?))
}

/// GET /api/track: stock layout.
pub async fn get_track(State(state): State<AppState>) -> Json<TrackInfo> {
    Json(state.racer.track_info())
}
