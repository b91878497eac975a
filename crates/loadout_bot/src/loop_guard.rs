//! Overlap prevention and run bookkeeping for the background loops.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

/// Where a loop is in its run cycle.
///
/// `Idle`, `Succeeded` and `Failed` are all resting states from which the
/// next tick may start a run; the latter two remember how the last run
/// ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LoopState {
    /// Never run
    Idle,
    /// A run is in progress
    Running,
    /// Last run succeeded
    Succeeded,
    /// Last run failed or panicked
    Failed,
}

/// Snapshot of a loop's counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct LoopStatus {
    /// Loop name, e.g. `refresh`
    name: String,
    /// Current state
    state: LoopState,
    /// Runs started
    runs: u64,
    /// Runs that failed
    failures: u64,
    /// Ticks dropped because a run was still in progress
    skipped: u64,
    /// Start of the most recent run
    last_started: Option<DateTime<Utc>>,
    /// End of the most recent finished run
    last_finished: Option<DateTime<Utc>>,
}

/// Admits at most one run of a loop at a time.
///
/// # Examples
///
/// ```
/// use loadout_bot::{LoopGuard, LoopState};
///
/// let guard = LoopGuard::new("diff");
/// let run = guard.try_start().unwrap();
/// assert!(guard.try_start().is_none());
///
/// run.finish(true);
/// assert_eq!(*guard.status().state(), LoopState::Succeeded);
/// assert_eq!(*guard.status().skipped(), 1);
/// ```
#[derive(Debug)]
pub struct LoopGuard {
    status: Mutex<LoopStatus>,
}

impl LoopGuard {
    /// Create a guard in the `Idle` state.
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            status: Mutex::new(LoopStatus {
                name: name.into(),
                state: LoopState::Idle,
                runs: 0,
                failures: 0,
                skipped: 0,
                last_started: None,
                last_finished: None,
            }),
        })
    }

    /// Start a run, or record a skipped tick if one is already running.
    pub fn try_start(self: &Arc<Self>) -> Option<LoopRun> {
        let mut status = self.status.lock();
        if status.state == LoopState::Running {
            status.skipped += 1;
            tracing::warn!(
                loop_name = %status.name,
                skipped = status.skipped,
                "Previous run still in progress, skipping tick"
            );
            return None;
        }

        status.state = LoopState::Running;
        status.runs += 1;
        status.last_started = Some(Utc::now());
        tracing::debug!(loop_name = %status.name, run = status.runs, "Run started");

        Some(LoopRun {
            guard: Arc::clone(self),
            finished: false,
        })
    }

    /// Current counters.
    pub fn status(&self) -> LoopStatus {
        self.status.lock().clone()
    }

    fn finish(&self, succeeded: bool) {
        let mut status = self.status.lock();
        status.state = if succeeded {
            LoopState::Succeeded
        } else {
            status.failures += 1;
            LoopState::Failed
        };
        status.last_finished = Some(Utc::now());
        tracing::debug!(loop_name = %status.name, state = %status.state, "Run finished");
    }
}

/// A run admitted by [`LoopGuard::try_start`].
///
/// Dropping it without calling [`LoopRun::finish`] (for example when the
/// run panics) records a failure.
#[derive(Debug)]
pub struct LoopRun {
    guard: Arc<LoopGuard>,
    finished: bool,
}

impl LoopRun {
    /// End the run with its outcome.
    pub fn finish(mut self, succeeded: bool) {
        self.finished = true;
        self.guard.finish(succeeded);
    }
}

impl Drop for LoopRun {
    fn drop(&mut self) {
        if !self.finished {
            self.guard.finish(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_start_is_skipped() {
        let guard = LoopGuard::new("refresh");

        let run = guard.try_start().unwrap();
        assert_eq!(*guard.status().state(), LoopState::Running);
        assert!(guard.try_start().is_none());
        assert!(guard.try_start().is_none());
        run.finish(false);

        let status = guard.status();
        assert_eq!(*status.state(), LoopState::Failed);
        assert_eq!(*status.runs(), 1);
        assert_eq!(*status.skipped(), 2);
        assert_eq!(*status.failures(), 1);
        assert!(status.last_finished().is_some());

        // A failed run does not block the next one.
        guard.try_start().unwrap().finish(true);
        assert_eq!(*guard.status().state(), LoopState::Succeeded);
        assert_eq!(*guard.status().runs(), 2);
    }

    #[test]
    fn test_dropped_run_counts_as_failure() {
        let guard = LoopGuard::new("diff");
        drop(guard.try_start().unwrap());

        assert_eq!(*guard.status().state(), LoopState::Failed);
        assert_eq!(*guard.status().failures(), 1);
    }
}
