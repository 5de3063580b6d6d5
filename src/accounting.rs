/*
Time-accounting engine.
Pure transitions over (allocated, remaining, completed); kept free of HTTP / Axum
and of the store so every rule can be tested directly.

Each transition takes the *current authoritative* triple (freshly fetched by the
caller) plus its own input and returns the triple to write back.
All arithmetic saturates at zero.
*/

use crate::error::{AppError, AppResult};
use crate::models::TimeTriple;

// New task: the whole allocation is still ahead.
pub fn create(requested_allocated: u64) -> TimeTriple {
    TimeTriple {
        allocated: requested_allocated,
        remaining: requested_allocated,
        completed: 0,
    }
}

// Edit allocation.
//     A new allocation below the time already spent leaves remaining at 0,
//     which makes the task complete without an explicit completion.
pub fn edit_allocation(existing: TimeTriple, new_allocated: u64) -> TimeTriple {
    TimeTriple {
        allocated: new_allocated,
        remaining: new_allocated.saturating_sub(existing.completed),
        completed: existing.completed,
    }
}

// Timer exit: bank the session time, allocation untouched.
//     completed is not capped here; remaining bottoms out at 0.
pub fn partial_exit(existing: TimeTriple, session_elapsed: u64) -> TimeTriple {
    let completed = existing.completed.saturating_add(session_elapsed);
    TimeTriple {
        allocated: existing.allocated,
        remaining: existing.allocated.saturating_sub(completed),
        completed,
    }
}

// Timer expiry or manual "Complete".
//     remaining is pinned to 0 and completed never exceeds allocated,
//     whatever the session reports.
pub fn forced_completion(existing: TimeTriple, session_elapsed: u64) -> TimeTriple {
    let completed = existing
        .completed
        .saturating_add(session_elapsed)
        .min(existing.allocated);
    TimeTriple {
        allocated: existing.allocated,
        remaining: 0,
        completed,
    }
}

// Reopen ("revert") a completed task with extra time.
//     The new ceiling is what was spent plus the extra; only the extra is left to do.
pub fn reopen(existing: TimeTriple, additional: u64) -> AppResult<TimeTriple> {
    if additional == 0 {
        return Err(AppError::validation(
            "additional time must be greater than 00:00:00 to reopen",
        ));
    }
    Ok(TimeTriple {
        allocated: existing.completed.saturating_add(additional),
        remaining: additional,
        completed: existing.completed,
    })
}
