use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::session::DEFAULT_TICK;
use crate::store::DB_PATH;

#[derive(Debug, Clone, Parser)]
#[command(name = "daily_planner")]
#[command(about = "Daily task tracker with a countdown timer", long_about = None)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "PLANNER_ADDR", default_value = "127.0.0.1:5000")]
    pub addr: SocketAddr,

    /// Path of the JSON task store
    #[arg(long, env = "PLANNER_DB_PATH", default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Directory of the static front-end
    #[arg(long, env = "PLANNER_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Countdown tick period in milliseconds
    #[arg(long, env = "PLANNER_TICK_MS", default_value_t = DEFAULT_TICK.as_millis() as u64, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Log filter, e.g. "info" or "daily_planner=debug"
    #[arg(long = "log", env = "RUST_LOG", default_value = "info,tower_http=info")]
    pub log_filter: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "PLANNER_LOG_JSON")]
    pub log_json: bool,
}

impl Config {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
