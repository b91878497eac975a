//! Error types for the Loadout update bot.
//!
//! # Error Hierarchy
//!
//! Every error follows the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum names the specific failure
//! - `*Error` struct wraps the kind with the source location that raised it
//! - constructors use `#[track_caller]` so the location is captured for free
//!
//! The four pipeline failure classes map onto these types:
//!
//! | Failure | Type |
//! |---------|------|
//! | upstream unavailable / malformed | [`UpstreamError`] |
//! | webhook delivery | [`DeliveryError`] |
//! | snapshot persistence | [`StorageError`] |
//! | guild record store | [`GuildStoreError`] |
//!
//! # Examples
//!
//! ```
//! use loadout_error::{LoadoutResult, StorageError, StorageErrorKind};
//!
//! fn read_baseline() -> LoadoutResult<String> {
//!     Err(StorageError::new(StorageErrorKind::NotFound("new_cosmetics.json".into())))?
//! }
//!
//! assert!(read_baseline().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod delivery;
mod error;
mod guild;
mod storage;
mod upstream;

pub use config::ConfigError;
pub use delivery::{DeliveryError, DeliveryErrorKind};
pub use error::{LoadoutError, LoadoutErrorKind, LoadoutResult};
pub use guild::{GuildStoreError, GuildStoreErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use upstream::{UpstreamError, UpstreamErrorKind};
