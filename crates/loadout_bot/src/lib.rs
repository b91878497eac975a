//! Background loops for the Loadout Fortnite update bot.
//!
//! Two fixed-rate loops share one [`AppContext`]:
//! - **Refresh**: keeps the per-language catalogs filled from the upstream
//!   listings, falling back to snapshots during outages
//! - **Diff**: watches the new-items feed and announces additions to every
//!   subscribed guild
//!
//! Each loop is gated by a [`LoopGuard`] so a slow run never overlaps the
//! next one.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod diff;
mod loop_guard;
mod observability;
mod refresh;
mod server;

pub use config::{
    API_KEY_ENV, ApiConfig, BotConfig, BotSchedule, CacheConfig, DispatchConfig, GuildsConfig,
    LoggingConfig, ScheduleConfig,
};
pub use context::AppContext;
pub use diff::{DiffEngine, DiffOutcome};
pub use loop_guard::{LoopGuard, LoopRun, LoopState, LoopStatus};
pub use observability::init_logging;
pub use refresh::{LanguageRefresh, RefreshLoop, RefreshReport, ResourceOutcome};
pub use server::BotServer;
