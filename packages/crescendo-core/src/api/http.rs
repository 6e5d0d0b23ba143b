//! HTTP route handlers.
//!
//! All handlers are thin - they delegate to the [`Jukebox`] for business logic.
//!
//! [`Jukebox`]: crate::services::Jukebox

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api::response::{api_error, api_success};
use crate::api::ws::ws_handler;
use crate::api::AppState;
use crate::constants::SERVICE_ID;
use crate::error::CrescendoResult;
use crate::room::{ControlCommand, NavigationDirection, RoomId, UserId};
use crate::services::PlayRequest;

// ─────────────────────────────────────────────────────────────────────────────
// Request Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct QueueRequest {
    requester: UserId,
}

#[derive(Deserialize)]
struct NavigateRequest {
    actor: UserId,
}

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Creates the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/rooms/{room}", get(get_snapshot))
        .route("/api/rooms/{room}/now", get(get_now_playing))
        .route("/api/rooms/{room}/play", post(handle_play))
        .route("/api/rooms/{room}/skip", post(handle_skip))
        .route("/api/rooms/{room}/pause", post(handle_pause))
        .route("/api/rooms/{room}/resume", post(handle_resume))
        .route("/api/rooms/{room}/clear", post(handle_clear))
        .route("/api/rooms/{room}/leave", post(handle_leave))
        .route("/api/rooms/{room}/queue", post(open_queue_view))
        .route("/api/views/{id}/next", post(next_page))
        .route("/api/views/{id}/previous", post(previous_page))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Liveness probe.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    api_success(json!({
        "status": "ok",
        "service": SERVICE_ID,
        "rooms": state.jukebox.registry().room_count()
    }))
}

async fn get_snapshot(
    State(state): State<AppState>,
    Path(room): Path<RoomId>,
) -> impl IntoResponse {
    api_success(state.jukebox.snapshot(room))
}

async fn get_now_playing(
    State(state): State<AppState>,
    Path(room): Path<RoomId>,
) -> impl IntoResponse {
    api_success(json!({ "track": state.jukebox.now(room) }))
}

async fn handle_play(
    State(state): State<AppState>,
    Path(room): Path<RoomId>,
    payload: Result<Json<PlayRequest>, JsonRejection>,
) -> CrescendoResult<impl IntoResponse> {
    let Json(request) = payload?;
    let receipt = state.jukebox.play(room, request).await?;
    Ok(api_success(receipt))
}

async fn control(state: &AppState, room: RoomId, command: ControlCommand) -> Response {
    api_success(state.jukebox.control(room, command).await).into_response()
}

async fn handle_skip(State(state): State<AppState>, Path(room): Path<RoomId>) -> Response {
    control(&state, room, ControlCommand::Skip).await
}

async fn handle_pause(State(state): State<AppState>, Path(room): Path<RoomId>) -> Response {
    control(&state, room, ControlCommand::Pause).await
}

async fn handle_resume(State(state): State<AppState>, Path(room): Path<RoomId>) -> Response {
    control(&state, room, ControlCommand::Resume).await
}

async fn handle_clear(State(state): State<AppState>, Path(room): Path<RoomId>) -> Response {
    control(&state, room, ControlCommand::Clear).await
}

async fn handle_leave(State(state): State<AppState>, Path(room): Path<RoomId>) -> Response {
    control(&state, room, ControlCommand::Leave).await
}

/// Opens a paginated view of the room's queue for the requester.
async fn open_queue_view(
    State(state): State<AppState>,
    Path(room): Path<RoomId>,
    payload: Result<Json<QueueRequest>, JsonRejection>,
) -> CrescendoResult<Response> {
    let Json(request) = payload?;
    Ok(match state.jukebox.queue(room, request.requester) {
        Some(opened) => api_success(opened).into_response(),
        None => {
            api_error(StatusCode::NOT_FOUND, "queue_empty", "The queue is empty").into_response()
        }
    })
}

async fn navigate(
    state: &AppState,
    view_id: Uuid,
    actor: UserId,
    direction: NavigationDirection,
) -> CrescendoResult<Response> {
    let outcome = state.jukebox.navigate(view_id, actor, direction)?;
    Ok(api_success(outcome).into_response())
}

async fn next_page(
    State(state): State<AppState>,
    Path(view_id): Path<Uuid>,
    payload: Result<Json<NavigateRequest>, JsonRejection>,
) -> CrescendoResult<Response> {
    let Json(request) = payload?;
    navigate(&state, view_id, request.actor, NavigationDirection::Next).await
}

async fn previous_page(
    State(state): State<AppState>,
    Path(view_id): Path<Uuid>,
    payload: Result<Json<NavigateRequest>, JsonRejection>,
) -> CrescendoResult<Response> {
    let Json(request) = payload?;
    navigate(&state, view_id, request.actor, NavigationDirection::Previous).await
}
