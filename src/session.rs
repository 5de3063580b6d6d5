/*
Countdown session.

`CountdownSession` is the plain state machine (attach / start / pause / tick / detach).
`SessionManager` hosts exactly one of them for the client, drives it from a 1 Hz
tokio task and turns its terminal transitions into accounting writes.

Idle -> Attached -> Running <-> Paused -> (Exited | Completed) -> Idle
*/

use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use uuid::Uuid;

use crate::accounting;
use crate::duration::Hms;
use crate::error::{AppError, AppResult};
use crate::models::{Priority, Task, TaskPatch, TimeTriple};
use crate::store::TaskStore;

pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Attached,
    Running,
    Paused,
}

#[derive(Debug, Clone)]
struct Binding {
    task_id: Uuid,
    task_name: String,
    priority: Priority,
    allocated_seconds: u64, // session budget = task remaining at attach time
    remaining_seconds: u64,
    elapsed_seconds: u64,
    is_running: bool,
    started: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    // nothing bound, or bound but not running
    Stopped,
    Counting { remaining: u64 },
    Expired { task_id: Uuid, elapsed: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub task_id: Option<Uuid>,
    pub task_name: Option<String>,
    pub priority: Option<Priority>,
    pub allocated_time: Hms,
    pub remaining_time: Hms,
    pub elapsed_time: Hms,
    pub is_running: bool,
}

#[derive(Debug, Default)]
pub struct CountdownSession {
    binding: Option<Binding>,
}

impl CountdownSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bound_task(&self) -> Option<Uuid> {
        self.binding.as_ref().map(|b| b.task_id)
    }

    pub fn is_running(&self) -> bool {
        self.binding.as_ref().is_some_and(|b| b.is_running)
    }

    pub fn elapsed(&self) -> u64 {
        self.binding.as_ref().map_or(0, |b| b.elapsed_seconds)
    }

    pub fn phase(&self) -> Phase {
        match &self.binding {
            None => Phase::Idle,
            Some(b) if b.is_running => Phase::Running,
            Some(b) if b.started => Phase::Paused,
            Some(_) => Phase::Attached,
        }
    }

    // Bind to a pending task. The session budget is what the task has left.
    pub fn attach(&mut self, task: &Task) -> AppResult<()> {
        if let Some(b) = &self.binding {
            return Err(AppError::conflict(format!(
                "timer already attached to task {}",
                b.task_id
            )));
        }
        if task.remaining_time.is_zero() {
            return Err(AppError::validation("task has no remaining time"));
        }

        let budget = task.remaining_time.secs();
        self.binding = Some(Binding {
            task_id: task.id,
            task_name: task.task_name.clone(),
            priority: task.priority,
            allocated_seconds: budget,
            remaining_seconds: budget,
            elapsed_seconds: 0,
            is_running: false,
            started: false,
        });
        Ok(())
    }

    // Start or resume. Starting a running session is a no-op.
    pub fn start(&mut self) -> AppResult<()> {
        let b = self.binding_mut()?;
        b.is_running = true;
        b.started = true;
        Ok(())
    }

    pub fn pause(&mut self) -> AppResult<()> {
        let b = self.binding_mut()?;
        b.is_running = false;
        Ok(())
    }

    pub fn tick(&mut self) -> Tick {
        let Some(b) = self.binding.as_mut().filter(|b| b.is_running) else {
            return Tick::Stopped;
        };

        if b.remaining_seconds > 0 {
            b.remaining_seconds -= 1;
            b.elapsed_seconds += 1;
        }
        if b.remaining_seconds == 0 {
            b.is_running = false;
            return Tick::Expired {
                task_id: b.task_id,
                elapsed: b.elapsed_seconds,
            };
        }
        Tick::Counting {
            remaining: b.remaining_seconds,
        }
    }

    // Back to Idle.
    pub fn reset(&mut self) {
        self.binding = None;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        match &self.binding {
            None => SessionSnapshot {
                phase: Phase::Idle,
                task_id: None,
                task_name: None,
                priority: None,
                allocated_time: Hms::ZERO,
                remaining_time: Hms::ZERO,
                elapsed_time: Hms::ZERO,
                is_running: false,
            },
            Some(b) => SessionSnapshot {
                phase: self.phase(),
                task_id: Some(b.task_id),
                task_name: Some(b.task_name.clone()),
                priority: Some(b.priority),
                allocated_time: Hms(b.allocated_seconds),
                remaining_time: Hms(b.remaining_seconds),
                elapsed_time: Hms(b.elapsed_seconds),
                is_running: b.is_running,
            },
        }
    }

    fn binding_mut(&mut self) -> AppResult<&mut Binding> {
        self.binding
            .as_mut()
            .ok_or_else(|| AppError::conflict("no task attached to the timer"))
    }
}

// Fired once when a running countdown reaches zero.
pub trait ExpiryNotifier: Send + Sync {
    fn timer_expired(&self, task_id: Uuid, task_name: &str);
}

// Terminal bell on stderr.
#[derive(Debug, Default)]
pub struct BellNotifier;

impl ExpiryNotifier for BellNotifier {
    fn timer_expired(&self, task_id: Uuid, task_name: &str) {
        eprint!("\x07");
        tracing::info!(%task_id, task_name, "time's up, task completed");
    }
}

#[derive(Debug, Clone, Copy)]
enum Finish {
    Exit,
    Complete,
}

impl Finish {
    fn apply(self, existing: TimeTriple, elapsed: u64) -> TimeTriple {
        match self {
            Finish::Exit => accounting::partial_exit(existing, elapsed),
            Finish::Complete => accounting::forced_completion(existing, elapsed),
        }
    }
}

struct Slot {
    session: CountdownSession,
    ticker: Option<JoinHandle<()>>,
    // bumped on every stop; a ticker only acts while its generation is current
    generation: u64,
}

struct Inner {
    slot: Mutex<Slot>,
    store: Arc<TaskStore>,
    notifier: Arc<dyn ExpiryNotifier>,
    period: Duration,
}

#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl SessionManager {
    pub fn new(store: Arc<TaskStore>, notifier: Arc<dyn ExpiryNotifier>, period: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                slot: Mutex::new(Slot {
                    session: CountdownSession::new(),
                    ticker: None,
                    generation: 0,
                }),
                store,
                notifier,
                period,
            }),
        }
    }

    pub fn snapshot(&self) -> AppResult<SessionSnapshot> {
        Ok(self.inner.lock()?.session.snapshot())
    }

    pub fn bound_task(&self) -> AppResult<Option<Uuid>> {
        Ok(self.inner.lock()?.session.bound_task())
    }

    // Reads the task fresh from the store; only pending tasks can be attached.
    pub fn attach(&self, id: Uuid) -> AppResult<SessionSnapshot> {
        let mut slot = self.inner.lock()?;
        let task = self.inner.store.get(id)?;
        slot.session.attach(&task)?;
        tracing::info!(task_id = %id, budget = %task.remaining_time, "timer attached");
        Ok(slot.session.snapshot())
    }

    pub fn start(&self) -> AppResult<SessionSnapshot> {
        let mut slot = self.inner.lock()?;
        slot.session.start()?;
        if slot.ticker.is_none() {
            let generation = slot.generation;
            slot.ticker = Some(self.spawn_ticker(generation));
            tracing::info!(task_id = ?slot.session.bound_task(), "timer running");
        }
        Ok(slot.session.snapshot())
    }

    pub fn pause(&self) -> AppResult<SessionSnapshot> {
        let mut slot = self.inner.lock()?;
        slot.session.pause()?;
        slot.stop_ticker();
        tracing::info!(elapsed = slot.session.elapsed(), "timer paused");
        Ok(slot.session.snapshot())
    }

    pub fn toggle(&self) -> AppResult<SessionSnapshot> {
        let running = self.inner.lock()?.session.is_running();
        if running { self.pause() } else { self.start() }
    }

    // Manual "Complete": forced completion with the time run so far. No bell.
    pub fn complete(&self) -> AppResult<Task> {
        self.inner.finish(Finish::Complete)
    }

    // "Exit": bank the time run so far and leave the rest pending.
    pub fn exit(&self) -> AppResult<Task> {
        self.inner.finish(Finish::Exit)
    }

    // Run a task write while holding the timer off `id`.
    //     The session lock is held across the check and `write`, so an attach
    //     cannot land in between.
    pub fn while_untimed<T>(&self, id: Uuid, write: impl FnOnce() -> AppResult<T>) -> AppResult<T> {
        let slot = self.inner.lock()?;
        if slot.session.bound_task() == Some(id) {
            return Err(AppError::conflict(
                "task is attached to the timer; exit or dismiss the timer first",
            ));
        }
        write()
    }

    // Drop the session without touching the task.
    pub fn dismiss(&self) -> AppResult<SessionSnapshot> {
        let mut slot = self.inner.lock()?;
        slot.stop_ticker();
        slot.session.reset();
        tracing::info!("timer dismissed");
        Ok(slot.session.snapshot())
    }

    fn spawn_ticker(&self, generation: u64) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let period = inner.period;
        tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if !inner.on_tick(generation) {
                    return;
                }
            }
        })
    }
}

impl Slot {
    // Synchronous and idempotent: once this returns no tick of the old
    // ticker can touch the session.
    fn stop_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
        self.generation += 1;
    }
}

impl Inner {
    fn lock(&self) -> AppResult<MutexGuard<'_, Slot>> {
        self.slot.lock().map_err(|_| {
            AppError::Storage(io::Error::new(io::ErrorKind::Other, "session lock poisoned"))
        })
    }

    // Returns false once the ticker should stop.
    fn on_tick(&self, generation: u64) -> bool {
        let Ok(mut slot) = self.lock() else {
            return false;
        };
        if slot.generation != generation {
            return false;
        }

        match slot.session.tick() {
            Tick::Stopped => false,
            Tick::Counting { remaining } => {
                tracing::trace!(remaining, "tick");
                true
            }
            Tick::Expired { task_id, elapsed } => {
                let task_name = slot.session.snapshot().task_name.unwrap_or_default();
                slot.stop_ticker();
                tracing::info!(%task_id, elapsed, "timer expired");
                // rings once, for the write that actually completed the task
                match self.settle(&mut slot, Finish::Complete) {
                    Ok(_) => self.notifier.timer_expired(task_id, &task_name),
                    Err(e) => tracing::warn!(%task_id, error = %e, "auto-complete failed"),
                }
                false
            }
        }
    }

    fn finish(&self, how: Finish) -> AppResult<Task> {
        let mut slot = self.lock()?;
        slot.stop_ticker();
        slot.session.pause()?;
        self.settle(&mut slot, how)
    }

    // Accounting for a stopped session, computed against the task as stored now.
    //     Success or a vanished task ends the session; a storage failure keeps it
    //     bound (paused) so the action can be repeated.
    fn settle(&self, slot: &mut Slot, how: Finish) -> AppResult<Task> {
        let Some(task_id) = slot.session.bound_task() else {
            return Err(AppError::conflict("no task attached to the timer"));
        };
        let elapsed = slot.session.elapsed();

        let result = self.store.apply(task_id, |t| {
            Ok(TaskPatch {
                task_name: t.task_name.clone(),
                priority: t.priority,
                times: how.apply(t.times(), elapsed),
            })
        });

        match &result {
            Ok(task) => {
                tracing::info!(
                    %task_id,
                    mode = ?how,
                    elapsed,
                    completed = %task.completed_time,
                    remaining = %task.remaining_time,
                    "session settled"
                );
                slot.session.reset();
            }
            Err(AppError::NotFound) => {
                tracing::warn!(%task_id, "task vanished while timed; session dropped");
                slot.session.reset();
            }
            Err(e) => {
                tracing::error!(%task_id, error = %e, "session accounting failed; session kept");
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::parse;
    use chrono::Utc;
    use tempfile::{TempDir, tempdir};
    use tokio::time::sleep;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Uuid>>);

    impl ExpiryNotifier for Recorder {
        fn timer_expired(&self, task_id: Uuid, _task_name: &str) {
            self.0.lock().unwrap().push(task_id);
        }
    }

    fn pending_task(remaining: u64) -> Task {
        Task {
            id: Uuid::new_v4(),
            task_name: "focus".into(),
            priority: Priority::High,
            allocated_time: Hms(remaining),
            remaining_time: Hms(remaining),
            completed_time: Hms::ZERO,
            created_at: Utc::now(),
            date_key: "2025-09-23".into(),
        }
    }

    fn setup() -> (TempDir, Arc<TaskStore>, Arc<Recorder>, SessionManager) {
        let dir = tempdir().unwrap();
        let store = Arc::new(TaskStore::open(dir.path().join("db.json")).unwrap());
        let recorder = Arc::new(Recorder::default());
        let manager = SessionManager::new(store.clone(), recorder.clone(), DEFAULT_TICK);
        (dir, store, recorder, manager)
    }

    // Store at `<tmp>/data/db.json`, so saves can be made to fail and recover.
    fn setup_breakable() -> (TempDir, Arc<TaskStore>, Arc<Recorder>, SessionManager) {
        let dir = tempdir().unwrap();
        let store = Arc::new(TaskStore::open(dir.path().join("data").join("db.json")).unwrap());
        let recorder = Arc::new(Recorder::default());
        let manager = SessionManager::new(store.clone(), recorder.clone(), DEFAULT_TICK);
        (dir, store, recorder, manager)
    }

    // The data directory becomes a plain file; every save fails.
    fn break_storage(dir: &TempDir) {
        let data = dir.path().join("data");
        if data.is_dir() {
            std::fs::remove_dir_all(&data).unwrap();
        }
        std::fs::write(&data, b"x").unwrap();
    }

    fn restore_storage(dir: &TempDir) {
        std::fs::remove_file(dir.path().join("data")).unwrap();
    }

    fn create(store: &TaskStore, allocated: &str) -> Task {
        store
            .create("focus", Priority::Medium, accounting::create(parse(allocated)), Utc::now())
            .unwrap()
    }

    #[test]
    fn lifecycle_phases() {
        let mut s = CountdownSession::new();
        assert_eq!(s.phase(), Phase::Idle);
        s.attach(&pending_task(3)).unwrap();
        assert_eq!(s.phase(), Phase::Attached);
        s.start().unwrap();
        assert_eq!(s.phase(), Phase::Running);
        s.pause().unwrap();
        assert_eq!(s.phase(), Phase::Paused);
        s.reset();
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn attach_requires_pending_and_free_slot() {
        let mut s = CountdownSession::new();
        let err = s.attach(&pending_task(0)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        s.attach(&pending_task(5)).unwrap();
        let err = s.attach(&pending_task(5)).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn start_without_task_is_rejected() {
        let mut s = CountdownSession::new();
        assert!(matches!(s.start(), Err(AppError::Conflict(_))));
        assert!(matches!(s.pause(), Err(AppError::Conflict(_))));
    }

    #[test]
    fn ticks_only_while_running() {
        let mut s = CountdownSession::new();
        s.attach(&pending_task(3)).unwrap();
        assert_eq!(s.tick(), Tick::Stopped);

        s.start().unwrap();
        assert_eq!(s.tick(), Tick::Counting { remaining: 2 });
        s.pause().unwrap();
        assert_eq!(s.tick(), Tick::Stopped);
        assert_eq!(s.elapsed(), 1);

        s.start().unwrap();
        assert_eq!(s.tick(), Tick::Counting { remaining: 1 });
        let id = s.bound_task().unwrap();
        assert_eq!(s.tick(), Tick::Expired { task_id: id, elapsed: 3 });
        assert!(!s.is_running());
        assert_eq!(s.tick(), Tick::Stopped);
    }

    #[test]
    fn snapshot_reports_budget() {
        let mut s = CountdownSession::new();
        s.attach(&pending_task(600)).unwrap();
        s.start().unwrap();
        s.tick();
        let snap = s.snapshot();
        assert_eq!(snap.allocated_time, Hms(600));
        assert_eq!(snap.remaining_time, Hms(599));
        assert_eq!(snap.elapsed_time, Hms(1));
        assert!(snap.is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_forces_completion() {
        let (_dir, store, recorder, manager) = setup();
        let task = create(&store, "00:00:10");

        manager.attach(task.id).unwrap();
        manager.start().unwrap();
        sleep(Duration::from_millis(10_500)).await;

        let done = store.get(task.id).unwrap();
        assert_eq!(done.completed_time.to_string(), "00:00:10");
        assert_eq!(done.remaining_time.to_string(), "00:00:00");
        assert_eq!(manager.snapshot().unwrap().phase, Phase::Idle);
        assert_eq!(*recorder.0.lock().unwrap(), vec![task.id]);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_freezes_and_exit_banks_time() {
        let (_dir, store, recorder, manager) = setup();
        let task = create(&store, "01:00:00");

        manager.attach(task.id).unwrap();
        manager.start().unwrap();
        sleep(Duration::from_millis(3_500)).await;
        let snap = manager.pause().unwrap();
        assert_eq!(snap.elapsed_time, Hms(3));
        assert_eq!(snap.phase, Phase::Paused);

        sleep(Duration::from_secs(5)).await;
        assert_eq!(manager.snapshot().unwrap().elapsed_time, Hms(3));

        manager.toggle().unwrap();
        sleep(Duration::from_millis(2_500)).await;
        let saved = manager.exit().unwrap();

        assert_eq!(saved.completed_time, Hms(5));
        assert_eq!(saved.remaining_time, Hms(3595));
        assert_eq!(saved.allocated_time, Hms(3600));
        assert_eq!(manager.snapshot().unwrap().phase, Phase::Idle);
        assert!(recorder.0.lock().unwrap().is_empty());

        // no stray tick after exit
        sleep(Duration::from_secs(3)).await;
        assert_eq!(store.get(task.id).unwrap().completed_time, Hms(5));
    }

    #[tokio::test(start_paused = true)]
    async fn manual_complete_uses_fresh_state() {
        let (_dir, store, recorder, manager) = setup();
        let task = create(&store, "01:00:00");

        manager.attach(task.id).unwrap();
        manager.start().unwrap();
        sleep(Duration::from_millis(4_500)).await;

        // time banked elsewhere while the timer was running
        store
            .apply(task.id, |t| {
                Ok(TaskPatch {
                    task_name: t.task_name.clone(),
                    priority: t.priority,
                    times: accounting::partial_exit(t.times(), 600),
                })
            })
            .unwrap();

        let done = manager.complete().unwrap();
        assert_eq!(done.completed_time, Hms(604));
        assert_eq!(done.remaining_time, Hms::ZERO);
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stopping_twice_is_harmless() {
        let (_dir, store, _recorder, manager) = setup();
        let task = create(&store, "00:10:00");

        manager.attach(task.id).unwrap();
        manager.start().unwrap();
        manager.start().unwrap();
        sleep(Duration::from_millis(2_500)).await;
        manager.pause().unwrap();
        manager.pause().unwrap();
        assert_eq!(manager.snapshot().unwrap().elapsed_time, Hms(2));

        manager.dismiss().unwrap();
        manager.dismiss().unwrap();
        assert_eq!(manager.snapshot().unwrap().phase, Phase::Idle);
        assert_eq!(store.get(task.id).unwrap().completed_time, Hms::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn deleted_task_ends_session() {
        let (_dir, store, _recorder, manager) = setup();
        let task = create(&store, "00:10:00");

        manager.attach(task.id).unwrap();
        store.delete(task.id).unwrap();

        assert!(matches!(manager.exit(), Err(AppError::NotFound)));
        assert_eq!(manager.snapshot().unwrap().phase, Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_exit_keeps_session_for_retry() {
        let (dir, store, recorder, manager) = setup_breakable();
        let task = create(&store, "00:10:00");

        manager.attach(task.id).unwrap();
        manager.start().unwrap();
        sleep(Duration::from_millis(2_500)).await;

        break_storage(&dir);
        assert!(matches!(manager.exit(), Err(AppError::Storage(_))));
        let snap = manager.snapshot().unwrap();
        assert_eq!(snap.phase, Phase::Paused);
        assert_eq!(snap.task_id, Some(task.id));
        assert_eq!(snap.elapsed_time, Hms(2));
        assert_eq!(store.get(task.id).unwrap().completed_time, Hms::ZERO);

        // paused: nothing more accrues while the write is failing
        sleep(Duration::from_secs(3)).await;
        assert_eq!(manager.snapshot().unwrap().elapsed_time, Hms(2));

        restore_storage(&dir);
        let saved = manager.exit().unwrap();
        assert_eq!(saved.completed_time, Hms(2));
        assert_eq!(saved.remaining_time, Hms(598));
        assert_eq!(manager.snapshot().unwrap().phase, Phase::Idle);
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_expiry_rings_once_after_retry() {
        let (dir, store, recorder, manager) = setup_breakable();
        let task = create(&store, "00:00:03");

        manager.attach(task.id).unwrap();
        break_storage(&dir);
        manager.start().unwrap();
        sleep(Duration::from_millis(3_500)).await;

        let snap = manager.snapshot().unwrap();
        assert_eq!(snap.phase, Phase::Paused);
        assert_eq!(snap.remaining_time, Hms::ZERO);
        assert_eq!(snap.elapsed_time, Hms(3));
        assert_eq!(store.get(task.id).unwrap().remaining_time, Hms(3));
        assert!(recorder.0.lock().unwrap().is_empty());

        // resuming an expired session retries the completion on the next tick
        restore_storage(&dir);
        manager.start().unwrap();
        sleep(Duration::from_millis(1_500)).await;

        let done = store.get(task.id).unwrap();
        assert_eq!(done.completed_time, Hms(3));
        assert_eq!(done.remaining_time, Hms::ZERO);
        assert_eq!(manager.snapshot().unwrap().phase, Phase::Idle);
        assert_eq!(*recorder.0.lock().unwrap(), vec![task.id]);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_of_deleted_task_is_silent() {
        let (_dir, store, recorder, manager) = setup();
        let task = create(&store, "00:00:05");

        manager.attach(task.id).unwrap();
        manager.start().unwrap();
        sleep(Duration::from_millis(2_500)).await;
        store.delete(task.id).unwrap();
        sleep(Duration::from_secs(4)).await;

        assert_eq!(manager.snapshot().unwrap().phase, Phase::Idle);
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn while_untimed_guards_bound_task_only() {
        let (_dir, store, _recorder, manager) = setup();
        let timed = create(&store, "00:10:00");
        let other = create(&store, "00:10:00");
        manager.attach(timed.id).unwrap();

        let mut ran = false;
        let err = manager
            .while_untimed(timed.id, || {
                ran = true;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(!ran);

        let renamed = manager
            .while_untimed(other.id, || {
                store.apply(other.id, |t| {
                    Ok(TaskPatch {
                        task_name: "renamed".into(),
                        priority: t.priority,
                        times: t.times(),
                    })
                })
            })
            .unwrap();
        assert_eq!(renamed.task_name, "renamed");

        manager.dismiss().unwrap();
        assert!(manager.while_untimed(timed.id, || Ok(())).is_ok());
    }

    #[tokio::test]
    async fn finishing_without_session_conflicts() {
        let (_dir, _store, _recorder, manager) = setup();
        assert!(matches!(manager.exit(), Err(AppError::Conflict(_))));
        assert!(matches!(manager.complete(), Err(AppError::Conflict(_))));
        assert!(matches!(manager.attach(Uuid::new_v4()), Err(AppError::NotFound)));
    }
}
