use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::routes_session;
use crate::routes_tasks;
use crate::routes_views;
use crate::session::SessionManager;
use crate::store::TaskStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TaskStore>,
    pub sessions: SessionManager,
}

pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let api = Router::new()
        // tasks
        .route("/tasks", get(routes_tasks::get_tasks).post(routes_tasks::create_task))
        .route(
            "/tasks/:id",
            get(routes_tasks::get_task)
                .put(routes_tasks::update_task)
                .delete(routes_tasks::delete_task),
        )
        .route("/tasks/:id/edit", post(routes_tasks::edit_task))
        .route("/tasks/:id/reopen", post(routes_tasks::reopen_task))
        // views
        .route("/board", get(routes_views::get_board))
        .route("/progress", get(routes_views::get_progress))
        // timer
        .route(
            "/session",
            get(routes_session::get_session).delete(routes_session::dismiss),
        )
        .route("/session/attach/:id", post(routes_session::attach))
        .route("/session/start", post(routes_session::start))
        .route("/session/pause", post(routes_session::pause))
        .route("/session/toggle", post(routes_session::toggle))
        .route("/session/complete", post(routes_session::complete))
        .route("/session/exit", post(routes_session::exit))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
