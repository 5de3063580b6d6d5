/*
Task record store.
db.json is loaded once, kept in memory behind a mutex and written through
(tmp file + rename) on every mutation. A failed write rolls the in-memory
copy back, so a failed call never "half happens".
*/

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::duration::Hms;
use crate::error::{AppError, AppResult};
use crate::models::{Db, Priority, Task, TaskPatch, TimeTriple};

pub const DB_PATH: &str = "data/db.json";

pub fn load_db(path: &Path) -> io::Result<Db> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Db::default()),
        Err(e) => return Err(e),
    };
    let db: Db =
        serde_json::from_str(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(db)
}

pub fn save_db(path: &Path, db: &Db) -> io::Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    let text = serde_json::to_string_pretty(db)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(&tmp_path, text)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

// Calendar-day key used for daily filtering.
pub fn date_key(at: DateTime<Utc>) -> String {
    at.date_naive().format("%Y-%m-%d").to_string()
}

fn clean_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::validation("task name required"));
    }
    Ok(name.to_string())
}

#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    db: Mutex<Db>,
}

impl TaskStore {
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let db = load_db(&path)?;
        tracing::info!(path = %path.display(), tasks = db.tasks.len(), "task store opened");
        Ok(Self {
            path,
            db: Mutex::new(db),
        })
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, Db>> {
        self.db
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "task store lock poisoned"))
    }

    // Run `mutate` on the in-memory db and persist; undo on failure.
    fn write<T>(&self, mutate: impl FnOnce(&mut Db) -> AppResult<T>) -> AppResult<T> {
        let mut db = self.lock()?;
        let before = db.clone();
        let result = mutate(&mut db)
            .and_then(|out| save_db(&self.path, &db).map(|_| out).map_err(AppError::from));
        if result.is_err() {
            *db = before;
        }
        result
    }

    pub fn create(
        &self,
        task_name: &str,
        priority: Priority,
        times: TimeTriple,
        created_at: DateTime<Utc>,
    ) -> AppResult<Task> {
        let task = Task {
            id: Uuid::new_v4(),
            task_name: clean_name(task_name)?,
            priority,
            allocated_time: Hms(times.allocated),
            remaining_time: Hms(times.remaining),
            completed_time: Hms(times.completed),
            created_at,
            date_key: date_key(created_at),
        };

        self.write(|db| {
            db.tasks.push(task.clone());
            Ok(())
        })?;

        tracing::info!(id = %task.id, name = %task.task_name, allocated = %task.allocated_time, "task created");
        Ok(task)
    }

    // Newest first. `None` lists every day.
    pub fn list(&self, date: Option<&str>) -> AppResult<Vec<Task>> {
        let db = self.lock()?;
        let tasks: Vec<Task> = db
            .tasks
            .iter()
            .rev()
            .filter(|t| date.is_none_or(|d| t.date_key == d))
            .cloned()
            .collect();
        tracing::debug!(date = date.unwrap_or("all"), count = tasks.len(), "tasks listed");
        Ok(tasks)
    }

    pub fn get(&self, id: Uuid) -> AppResult<Task> {
        let db = self.lock()?;
        db.tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    // Overwrite everything except id / created_at / date_key.
    pub fn update(&self, id: Uuid, patch: TaskPatch) -> AppResult<Task> {
        self.apply(id, |_| Ok(patch))
    }

    // Fetch the authoritative task, derive the patch from it and write it back,
    // all under one lock.
    pub fn apply(
        &self,
        id: Uuid,
        derive: impl FnOnce(&Task) -> AppResult<TaskPatch>,
    ) -> AppResult<Task> {
        let updated = self.write(|db| {
            let Some(t) = db.tasks.iter_mut().find(|t| t.id == id) else {
                return Err(AppError::NotFound);
            };

            let patch = derive(t)?;
            t.task_name = clean_name(&patch.task_name)?;
            t.priority = patch.priority;
            t.allocated_time = Hms(patch.times.allocated);
            t.remaining_time = Hms(patch.times.remaining);
            t.completed_time = Hms(patch.times.completed);

            Ok(t.clone())
        })?;

        tracing::info!(
            id = %updated.id,
            allocated = %updated.allocated_time,
            remaining = %updated.remaining_time,
            completed = %updated.completed_time,
            "task updated"
        );
        Ok(updated)
    }

    pub fn delete(&self, id: Uuid) -> AppResult<()> {
        self.write(|db| {
            let before = db.tasks.len();
            db.tasks.retain(|t| t.id != id);
            if db.tasks.len() == before {
                return Err(AppError::NotFound);
            }
            Ok(())
        })?;
        tracing::info!(%id, "task deleted");
        Ok(())
    }
}
