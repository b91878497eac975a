//! Bot server running the refresh and diff loops.

use crate::{AppContext, BotConfig, BotSchedule, DiffEngine, DiffOutcome, LoopGuard, LoopStatus, RefreshLoop, RefreshReport};
use loadout_error::LoadoutResult;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, instrument};

/// Drives the refresh and diff loops.
#[derive(Debug)]
pub struct BotServer {
    schedule: BotSchedule,
    refresh: RefreshLoop,
    diff: DiffEngine,
    refresh_guard: Arc<LoopGuard>,
    diff_guard: Arc<LoopGuard>,
}

impl BotServer {
    /// Creates a new bot server.
    pub fn new(context: Arc<AppContext>, config: &BotConfig) -> Self {
        Self::with_schedule(context, BotSchedule::from(config))
    }

    /// Creates a bot server with explicit loop periods.
    pub fn with_schedule(context: Arc<AppContext>, schedule: BotSchedule) -> Self {
        Self {
            schedule,
            refresh: RefreshLoop::new(Arc::clone(&context)),
            diff: DiffEngine::new(context),
            refresh_guard: LoopGuard::new("refresh"),
            diff_guard: LoopGuard::new("diff"),
        }
    }

    /// Counters of both loops.
    pub fn statuses(&self) -> [LoopStatus; 2] {
        [self.refresh_guard.status(), self.diff_guard.status()]
    }

    /// Run one refresh cycle followed by one diff cycle.
    #[instrument(skip(self))]
    pub async fn run_once(&self) -> (RefreshReport, LoadoutResult<DiffOutcome>) {
        let refresh = self.refresh.run_once().await;
        let diff = self.diff.run_once().await;
        (refresh, diff)
    }

    /// Run both loops until `shutdown` resolves.
    ///
    /// The first refresh starts immediately so the catalogs become ready
    /// as early as possible.
    #[instrument(skip(self, shutdown))]
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) {
        info!(
            refresh_secs = self.schedule.refresh_interval.as_secs(),
            diff_secs = self.schedule.diff_interval.as_secs(),
            "Starting bot server"
        );

        let refresh = self.refresh.clone();
        let refresh_handle = spawn_interval_loop(
            self.schedule.refresh_interval,
            Arc::clone(&self.refresh_guard),
            move || {
                let refresh = refresh.clone();
                async move { refresh.run_once().await.is_success() }
            },
        );

        let diff = self.diff.clone();
        let diff_handle = spawn_interval_loop(
            self.schedule.diff_interval,
            Arc::clone(&self.diff_guard),
            move || {
                let diff = diff.clone();
                async move {
                    match diff.run_once().await {
                        Ok(outcome) => {
                            tracing::debug!(?outcome, "Diff cycle finished");
                            true
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Diff cycle failed, no new items this cycle");
                            false
                        }
                    }
                }
            },
        );

        shutdown.await;
        info!("Shutdown signal received, stopping loops");
        refresh_handle.abort();
        diff_handle.abort();

        for status in self.statuses() {
            info!(
                loop_name = %status.name(),
                runs = status.runs(),
                failures = status.failures(),
                skipped = status.skipped(),
                "Loop stopped"
            );
        }
    }
}

/// Tick every `period`, spawning `job` for each tick the guard admits.
///
/// Runs are spawned so that a slow run does not delay the ticker; a tick
/// that arrives while the previous run is still going is skipped by the
/// guard.
pub(crate) fn spawn_interval_loop<F, Fut>(
    period: Duration,
    guard: Arc<LoopGuard>,
    job: F,
) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let Some(run) = guard.try_start() else {
                continue;
            };
            let work = job();
            tokio::spawn(async move {
                let succeeded = work.await;
                run.finish(succeeded);
            });
        }
    })
}
