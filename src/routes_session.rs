// --------------------------------------------------
// Countdown timer endpoints.
//
// The server hosts a single session for its client:
// attach to a pending task, start / pause / resume,
// then complete (forced completion), exit (partial) or dismiss.
// -------------------------------------------------

use axum::{
    Json,
    extract::{Path, State},
};

use crate::app::AppState;
use crate::error::AppResult;
use crate::models::Task;
use crate::routes_tasks::parse_id;
use crate::session::SessionSnapshot;

// GET /api/session
pub async fn get_session(State(state): State<AppState>) -> AppResult<Json<SessionSnapshot>> {
    Ok(Json(state.sessions.snapshot()?))
}

// POST /api/session/attach/:id
pub async fn attach(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SessionSnapshot>> {
    let id = parse_id(&id)?;
    Ok(Json(state.sessions.attach(id)?))
}

// POST /api/session/start
pub async fn start(State(state): State<AppState>) -> AppResult<Json<SessionSnapshot>> {
    Ok(Json(state.sessions.start()?))
}

// POST /api/session/pause
pub async fn pause(State(state): State<AppState>) -> AppResult<Json<SessionSnapshot>> {
    Ok(Json(state.sessions.pause()?))
}

// POST /api/session/toggle
// Start / Pause / Resume button
pub async fn toggle(State(state): State<AppState>) -> AppResult<Json<SessionSnapshot>> {
    Ok(Json(state.sessions.toggle()?))
}

// POST /api/session/complete
// Returns the task as written back
pub async fn complete(State(state): State<AppState>) -> AppResult<Json<Task>> {
    Ok(Json(state.sessions.complete()?))
}

// POST /api/session/exit
pub async fn exit(State(state): State<AppState>) -> AppResult<Json<Task>> {
    Ok(Json(state.sessions.exit()?))
}

// DELETE /api/session
pub async fn dismiss(State(state): State<AppState>) -> AppResult<Json<SessionSnapshot>> {
    Ok(Json(state.sessions.dismiss()?))
}
