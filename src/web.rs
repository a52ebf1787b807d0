use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower_http::services::ServeDir;

use crate::board::{Board, Player, SQUARE_COUNT, Square};
use crate::error::GameError;
use crate::game::{MoveOutcome, Session};
use crate::history::History;

#[derive(Clone)]
pub struct AppState {
    game: Arc<Mutex<WebGame>>,
}

struct WebGame {
    session: Session,
    history: History,
}

impl WebGame {
    fn new() -> Self {
        let session = Session::new();
        let mut history = History::new();
        history.record(session.snapshot());
        WebGame { session, history }
    }
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            game: Arc::new(Mutex::new(WebGame::new())),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct SquareRequest {
    /// Decimal row-major square index, "0".."63".
    square: String,
}

#[derive(Serialize, Deserialize)]
pub struct JumpRequest {
    index: usize,
}

#[derive(Serialize)]
pub struct GameResponse {
    /// 64 one-character cells in row-major order: "w", "b", "." for an
    /// empty playable square, " " for the unplayable half of the grid.
    board: Vec<String>,
    current_player: String,
    turn: usize,
    selected: Option<String>,
    /// Destinations of the current selection.
    targets: Vec<String>,
    /// Squares under capture obligation; when non-empty only these are
    /// selectable.
    forced: Vec<String>,
    history_index: usize,
    history_length: usize,
    message: String,
}

fn cell_to_string(board: &Board, index: u8) -> String {
    match Square::new(index) {
        Ok(square) => match board.occupant(square) {
            Some(Player::White) => "w".to_string(),
            Some(Player::Black) => "b".to_string(),
            None => ".".to_string(),
        },
        Err(_) => " ".to_string(),
    }
}

fn game_response(game: &WebGame, message: String) -> GameResponse {
    let session = &game.session;

    let board = (0..SQUARE_COUNT as u8)
        .map(|index| cell_to_string(session.board(), index))
        .collect();

    let mut forced: Vec<Square> = session.forced_squares().keys().copied().collect();
    forced.sort_unstable();

    GameResponse {
        board,
        current_player: session.active_player().token().to_string(),
        turn: session.turn(),
        selected: session.selected().map(|square| square.to_string()),
        targets: session
            .legal_targets()
            .iter()
            .map(|target| target.destination.to_string())
            .collect(),
        forced: forced.iter().map(|square| square.to_string()).collect(),
        history_index: game.history.index(),
        history_length: game.history.len(),
        message,
    }
}

fn error_response(err: GameError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({
            "error": err.to_string()
        })),
    )
        .into_response()
}

#[axum::debug_handler]
async fn new_game(State(app_state): State<AppState>) -> Json<GameResponse> {
    let mut game = app_state.game.lock().unwrap();
    *game = WebGame::new();
    Json(game_response(&game, "New game started".to_string()))
}

async fn get_game_state(State(app_state): State<AppState>) -> Json<GameResponse> {
    let game = app_state.game.lock().unwrap();
    Json(game_response(&game, String::new()))
}

#[axum::debug_handler]
async fn select_piece(
    State(app_state): State<AppState>,
    Json(req): Json<SquareRequest>,
) -> Response {
    let square = match req.square.parse::<Square>() {
        Ok(square) => square,
        Err(e) => return error_response(e),
    };

    let mut game = app_state.game.lock().unwrap();
    if let Err(e) = game.session.select_piece(square) {
        return error_response(e);
    }

    Json(game_response(&game, format!("Selected square {}", square))).into_response()
}

#[axum::debug_handler]
async fn make_move(State(app_state): State<AppState>, Json(req): Json<SquareRequest>) -> Response {
    let destination = match req.square.parse::<Square>() {
        Ok(square) => square,
        Err(e) => return error_response(e),
    };

    let mut game = app_state.game.lock().unwrap();
    match game.session.apply_move(destination) {
        Err(e) => error_response(e),
        Ok(MoveOutcome::ChainContinues) => Json(game_response(
            &game,
            "Capture! The jump must be continued".to_string(),
        ))
        .into_response(),
        Ok(MoveOutcome::TurnPassed) => {
            let snapshot = game.session.snapshot();
            game.history.record(snapshot);
            let message = format!("{} to play", game.session.active_player());
            Json(game_response(&game, message)).into_response()
        }
    }
}

#[axum::debug_handler]
async fn cancel_selection(State(app_state): State<AppState>) -> Json<GameResponse> {
    let mut game = app_state.game.lock().unwrap();
    game.session.cancel_selection();
    Json(game_response(&game, String::new()))
}

#[axum::debug_handler]
async fn jump_history(State(app_state): State<AppState>, Json(req): Json<JumpRequest>) -> Response {
    let mut game = app_state.game.lock().unwrap();

    let entry = match game.history.jump(req.index) {
        Some(entry) => entry.clone(),
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": format!("no history entry at index {}", req.index)
                })),
            )
                .into_response();
        }
    };

    game.session = Session::restore(&entry);
    Json(game_response(&game, format!("Jumped to turn {}", entry.turn))).into_response()
}

#[axum::debug_handler]
async fn history_back(State(app_state): State<AppState>) -> Response {
    let mut game = app_state.game.lock().unwrap();

    let entry = match game.history.back() {
        Some(entry) => entry.clone(),
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "already at the first recorded turn"
                })),
            )
                .into_response();
        }
    };

    game.session = Session::restore(&entry);
    Json(game_response(&game, format!("Jumped to turn {}", entry.turn))).into_response()
}

#[axum::debug_handler]
async fn history_forward(State(app_state): State<AppState>) -> Response {
    let mut game = app_state.game.lock().unwrap();

    let entry = match game.history.forward() {
        Some(entry) => entry.clone(),
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "already at the last recorded turn"
                })),
            )
                .into_response();
        }
    };

    game.session = Session::restore(&entry);
    Json(game_response(&game, format!("Jumped to turn {}", entry.turn))).into_response()
}

#[axum::debug_handler]
async fn history_reset(State(app_state): State<AppState>) -> Response {
    let mut game = app_state.game.lock().unwrap();

    let entry = match game.history.reset() {
        Some(entry) => entry.clone(),
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "no recorded history"
                })),
            )
                .into_response();
        }
    };

    game.session = Session::restore(&entry);
    Json(game_response(&game, "Back to the start".to_string())).into_response()
}

pub async fn run_server() -> Result<(), Box<dyn std::error::Error>> {
    let app_state = AppState::new();

    let app = Router::new()
        .route("/api/new-game", post(new_game))
        .route("/api/game-state", get(get_game_state))
        .route("/api/select", post(select_piece))
        .route("/api/move", post(make_move))
        .route("/api/cancel", post(cancel_selection))
        .route("/api/history/jump", post(jump_history))
        .route("/api/history/back", post(history_back))
        .route("/api/history/forward", post(history_forward))
        .route("/api/history/reset", post(history_reset))
        .nest_service("/", ServeDir::new("static"))
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    println!("Draughts server running at http://127.0.0.1:3000");

    axum::serve(listener, app).await?;
    Ok(())
}
