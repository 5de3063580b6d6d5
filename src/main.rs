// Define data modules
mod accounting; // Time-accounting transitions (create / edit / exit / complete / reopen)
mod app; // Router and shared state
mod config; // Command line / environment settings
mod duration; // HH:MM:SS <-> seconds
mod error; // AppError and its HTTP mapping
mod models; // Data structures (Task, Priority, Db, etc.)
mod routes_session; // HTTP handlers for the countdown timer
mod routes_tasks; // HTTP handlers for task CRUD, edit and reopen
mod routes_views; // HTTP handlers for board and progress views
mod session; // Countdown session and its tick source
mod store; // Persistent storage (load/save db.json)
mod views; // Pending / completed classification, daily progress

use std::io;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use app::{AppState, build_router};
use config::Config;
use session::{BellNotifier, SessionManager};
use store::TaskStore;

fn init_tracing(cfg: &Config) {
    let filter = EnvFilter::try_new(&cfg.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if cfg.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let cfg = Config::parse();
    init_tracing(&cfg);

    let store = Arc::new(TaskStore::open(&cfg.db_path)?);
    let sessions = SessionManager::new(store.clone(), Arc::new(BellNotifier), cfg.tick_period());
    let app = build_router(AppState { store, sessions }, &cfg.static_dir);

    let listener = tokio::net::TcpListener::bind(cfg.addr).await?;

    // Print the link to the server
    tracing::info!("Server running at http://{}", cfg.addr);
    tracing::info!("Static files: {}", cfg.static_dir.display());
    tracing::info!("API base:     http://{}/api", cfg.addr);

    axum::serve(listener, app).await
}
