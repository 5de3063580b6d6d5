// --------------------------------------------------
// Handles API endpoints related to task records.
//
// Responsibilities:
// - Create / read / update / delete tasks
// - Edit a task's allocation (remaining recomputed from time already spent)
// - Reopen a fully completed task with additional time
// -------------------------------------------------

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::accounting;
use crate::app::AppState;
use crate::duration;
use crate::error::{AppError, AppResult};
use crate::models::{Priority, Task, TaskPatch, TimeTriple};

pub fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::validation("invalid id"))
}

// "YYYY-MM-DD" or nothing. Returned zero-padded so it compares equal to a dateKey.
pub fn parse_date(raw: Option<String>) -> AppResult<Option<String>> {
    match raw {
        None => Ok(None),
        Some(d) => match NaiveDate::parse_from_str(&d, "%Y-%m-%d") {
            Ok(day) => Ok(Some(day.format("%Y-%m-%d").to_string())),
            Err(_) => Err(AppError::validation("invalid date")),
        },
    }
}

// Durations typed by the user must be HH:MM:SS before they are parsed.
fn parse_duration(field: &str, text: &str) -> AppResult<u64> {
    if !duration::is_well_formed(text) {
        return Err(AppError::validation(format!(
            "{field} must be in HH:MM:SS format"
        )));
    }
    Ok(duration::parse(text))
}

fn require_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("task name required"));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct TasksQuery {
    pub date: Option<String>, // "YYYY-MM-DD"
}

// -----------------------------
// GET /api/tasks?date=YYYY-MM-DD
// Returns the tasks created on that day (all days without `date`), newest first
// -----------------------------
pub async fn get_tasks(
    State(state): State<AppState>,
    Query(q): Query<TasksQuery>,
) -> AppResult<Json<Vec<Task>>> {
    let date = parse_date(q.date)?;
    let tasks = state.store.list(date.as_deref())?;
    Ok(Json(tasks))
}

// -----------------------------
// GET /api/tasks/:id
// -----------------------------
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Task>> {
    let id = parse_id(&id)?;
    Ok(Json(state.store.get(id)?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    pub task_name: String,
    #[serde(default)]
    pub priority: Priority,
    pub allocated_time: String, // HH:MM:SS
}

// -----------------------------
// POST /api/tasks
// Creates a new task stamped with today's date
// -----------------------------
pub async fn create_task(
    State(state): State<AppState>,
    Json(input): Json<CreateTaskInput>,
) -> AppResult<impl IntoResponse> {
    require_name(&input.task_name)?;
    let allocated = parse_duration("allocatedTime", &input.allocated_time)?;

    let task = state.store.create(
        &input.task_name,
        input.priority,
        accounting::create(allocated),
        Utc::now(),
    )?;

    Ok((StatusCode::CREATED, Json(task)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskInput {
    pub task_name: String,
    #[serde(default)]
    pub priority: Priority,
    pub allocated_time: String,
    pub remaining_time: String,
    pub completed_time: String,
}

// -----------------------------
// PUT /api/tasks/:id
// Overwrites name, priority and all three durations as given.
// createdAt / dateKey are kept.
// ----------------------------
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTaskInput>,
) -> AppResult<Json<Task>> {
    let id = parse_id(&id)?;
    require_name(&input.task_name)?;
    let times = TimeTriple {
        allocated: parse_duration("allocatedTime", &input.allocated_time)?,
        remaining: parse_duration("remainingTime", &input.remaining_time)?,
        completed: parse_duration("completedTime", &input.completed_time)?,
    };
    let patch = TaskPatch {
        task_name: input.task_name,
        priority: input.priority,
        times,
    };

    let task = state
        .sessions
        .while_untimed(id, || state.store.update(id, patch))?;
    Ok(Json(task))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTaskInput {
    pub task_name: String,
    #[serde(default)]
    pub priority: Priority,
    pub allocated_time: String,
}

// -----------------------------
// POST /api/tasks/:id/edit
// New allocation; completed time is kept and remaining recomputed from it
// -----------------------------
pub async fn edit_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<EditTaskInput>,
) -> AppResult<Json<Task>> {
    let id = parse_id(&id)?;
    require_name(&input.task_name)?;
    let allocated = parse_duration("allocatedTime", &input.allocated_time)?;

    let task = state.sessions.while_untimed(id, || {
        state.store.apply(id, |existing| {
            Ok(TaskPatch {
                task_name: input.task_name,
                priority: input.priority,
                times: accounting::edit_allocation(existing.times(), allocated),
            })
        })
    })?;
    Ok(Json(task))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReopenTaskInput {
    pub task_name: Option<String>,
    pub priority: Option<Priority>,
    pub additional_time: String,
}

// -----------------------------
// POST /api/tasks/:id/reopen
// Moves a fully completed task back to pending with extra time
// -----------------------------
pub async fn reopen_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ReopenTaskInput>,
) -> AppResult<Json<Task>> {
    let id = parse_id(&id)?;
    if let Some(name) = &input.task_name {
        require_name(name)?;
    }
    let additional = parse_duration("additionalTime", &input.additional_time)?;

    let task = state.sessions.while_untimed(id, || {
        state.store.apply(id, |existing| {
            if !existing.remaining_time.is_zero() {
                return Err(AppError::validation("only fully completed tasks can be reopened"));
            }
            Ok(TaskPatch {
                task_name: input.task_name.unwrap_or_else(|| existing.task_name.clone()),
                priority: input.priority.unwrap_or(existing.priority),
                times: accounting::reopen(existing.times(), additional)?,
            })
        })
    })?;
    Ok(Json(task))
}

// -----------------------------
// DELETE /api/tasks/:id
// Removes a task permanently
// -----------------------------
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    state.store.delete(id)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}
