//! Top-level error wrapper types.

use crate::{ConfigError, DeliveryError, GuildStoreError, StorageError, UpstreamError};

/// Every failure the update pipeline can produce.
///
/// # Examples
///
/// ```
/// use loadout_error::{LoadoutError, ConfigError};
///
/// let config_err = ConfigError::new("refresh interval must be positive");
/// let err: LoadoutError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum LoadoutErrorKind {
    /// Upstream API unreachable or returned an unusable response
    #[from(UpstreamError)]
    Upstream(UpstreamError),
    /// Webhook delivery to one destination failed
    #[from(DeliveryError)]
    Delivery(DeliveryError),
    /// Snapshot could not be read or written
    #[from(StorageError)]
    Storage(StorageError),
    /// Guild record store failure
    #[from(GuildStoreError)]
    GuildStore(GuildStoreError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Loadout error with kind discrimination.
///
/// # Examples
///
/// ```
/// use loadout_error::{LoadoutErrorKind, LoadoutResult, UpstreamError, UpstreamErrorKind};
///
/// fn fetch() -> LoadoutResult<()> {
///     Err(UpstreamError::new(UpstreamErrorKind::Transport("timed out".into())))?
/// }
///
/// let err = fetch().unwrap_err();
/// assert!(matches!(err.kind(), LoadoutErrorKind::Upstream(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Loadout Error: {}", _0)]
pub struct LoadoutError(Box<LoadoutErrorKind>);

impl LoadoutError {
    /// Create a new error from a kind.
    pub fn new(kind: LoadoutErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &LoadoutErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to LoadoutErrorKind
impl<T> From<T> for LoadoutError
where
    T: Into<LoadoutErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Loadout operations.
pub type LoadoutResult<T> = std::result::Result<T, LoadoutError>;
