use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::duration::Hms;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub task_name: String,
    #[serde(default)]
    pub priority: Priority,
    pub allocated_time: Hms,
    #[serde(default)]
    pub remaining_time: Hms,
    #[serde(default)]
    pub completed_time: Hms,
    pub created_at: DateTime<Utc>,
    pub date_key: String, // "YYYY-MM-DD", day of created_at
}

impl Task {
    pub fn times(&self) -> TimeTriple {
        TimeTriple {
            allocated: self.allocated_time.secs(),
            remaining: self.remaining_time.secs(),
            completed: self.completed_time.secs(),
        }
    }
}

// (allocated, remaining, completed) in seconds.
//     Produced by the accounting engine, written back by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeTriple {
    pub allocated: u64,
    pub remaining: u64,
    pub completed: u64,
}

// Caller-supplied fields of an update.
//     created_at / date_key are never part of it.
#[derive(Debug, Clone)]
pub struct TaskPatch {
    pub task_name: String,
    pub priority: Priority,
    pub times: TimeTriple,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Db {
    pub tasks: Vec<Task>,
}
