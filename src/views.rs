/*
View classification.
Splits a day's tasks into the pending and completed lists and builds the
per-day completion breakdown shown as a pie chart.
*/

use serde::Serialize;
use uuid::Uuid;

use crate::duration::{self, Hms};
use crate::models::Task;

// Slice colours, reused cyclically once a day has more than ten worked tasks.
pub const PALETTE: [&str; 10] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#C9CBCF", "#8DD17E",
    "#FF6F91", "#845EC2",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub pending: bool,
    pub completed: bool,
    pub can_reopen: bool, // "move back" only for fully completed tasks
}

// Both flags may be true: a partially worked task shows up in both lists.
pub fn classify(task: &Task) -> Classification {
    let pending = !task.remaining_time.is_zero();
    let completed = !task.completed_time.is_zero();
    Classification {
        pending,
        completed,
        can_reopen: completed && !pending,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardEntry {
    #[serde(flatten)]
    pub task: Task,
    pub can_reopen: bool,
    pub active_session: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Board {
    pub pending: Vec<BoardEntry>,
    pub completed: Vec<BoardEntry>,
}

// Keeps the input order (newest first) inside each list.
pub fn board(tasks: Vec<Task>, active: Option<Uuid>) -> Board {
    let mut out = Board::default();
    for task in tasks {
        let c = classify(&task);
        let entry = BoardEntry {
            active_session: active == Some(task.id),
            can_reopen: c.can_reopen,
            task,
        };
        match (c.pending, c.completed) {
            (true, true) => {
                out.pending.push(entry.clone());
                out.completed.push(entry);
            }
            (true, false) => out.pending.push(entry),
            (false, true) => out.completed.push(entry),
            (false, false) => {}
        }
    }
    out
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSlice {
    pub task_id: Uuid,
    pub task_name: String,
    pub completed_seconds: u64,
    pub completed_time: Hms,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub date: String,
    pub has_data: bool,
    pub total_completed_seconds: u64,
    pub total_completed_time: String,
    pub slices: Vec<ProgressSlice>,
}

// One slice per task that has any completed time.
pub fn progress(date: &str, tasks: &[Task]) -> ProgressReport {
    let slices: Vec<ProgressSlice> = tasks
        .iter()
        .filter(|t| classify(t).completed)
        .enumerate()
        .map(|(i, t)| ProgressSlice {
            task_id: t.id,
            task_name: t.task_name.clone(),
            completed_seconds: t.completed_time.secs(),
            completed_time: t.completed_time,
            color: PALETTE[i % PALETTE.len()],
        })
        .collect();

    let total: u64 = slices.iter().map(|s| s.completed_seconds).sum();

    ProgressReport {
        date: date.to_string(),
        has_data: !slices.is_empty(),
        total_completed_seconds: total,
        total_completed_time: duration::format(total),
        slices,
    }
}
