use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::Deserialize;

use crate::app::AppState;
use crate::error::AppResult;
use crate::routes_tasks::parse_date;
use crate::store;
use crate::views::{self, Board, ProgressReport};

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: Option<String>, // "YYYY-MM-DD", defaults to today
}

fn day_or_today(raw: Option<String>) -> AppResult<String> {
    Ok(parse_date(raw)?.unwrap_or_else(|| store::date_key(Utc::now())))
}

// GET /api/board?date=
// Pending / completed split for one day
pub async fn get_board(
    State(state): State<AppState>,
    Query(q): Query<DayQuery>,
) -> AppResult<Json<Board>> {
    let date = day_or_today(q.date)?;
    let tasks = state.store.list(Some(&date))?;
    let active = state.sessions.bound_task()?;
    Ok(Json(views::board(tasks, active)))
}

// GET /api/progress?date=
// Completed time per task for one day (pie chart data)
pub async fn get_progress(
    State(state): State<AppState>,
    Query(q): Query<DayQuery>,
) -> AppResult<Json<ProgressReport>> {
    let date = day_or_today(q.date)?;
    let tasks = state.store.list(Some(&date))?;
    Ok(Json(views::progress(&date, &tasks)))
}
