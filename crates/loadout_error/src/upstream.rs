//! Errors raised while talking to the Fortnite content API.

/// Failure modes of an upstream fetch.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum UpstreamErrorKind {
    /// The API answered with a non-success status.
    #[display("{} returned HTTP {}", endpoint, status)]
    Unavailable {
        /// Request path, without host or query
        endpoint: String,
        /// Status code returned
        status: u16,
    },

    /// The request never produced a response (connect error, timeout).
    #[display("Transport failure: {}", _0)]
    Transport(String),

    /// The response body did not have the expected shape.
    #[display("Malformed response: {}", _0)]
    Parse(String),
}

/// Upstream error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Upstream Error: {} at line {} in {}", kind, line, file)]
pub struct UpstreamError {
    /// The error kind
    pub kind: UpstreamErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl UpstreamError {
    /// Create a new UpstreamError with automatic location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use loadout_error::{UpstreamError, UpstreamErrorKind};
    ///
    /// let err = UpstreamError::new(UpstreamErrorKind::Unavailable {
    ///     endpoint: "/v2/cosmetics/br".to_string(),
    ///     status: 503,
    /// });
    /// assert!(err.is_unavailable());
    /// ```
    #[track_caller]
    pub fn new(kind: UpstreamErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// True when the API could not be reached or refused the request,
    /// as opposed to answering with garbage.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self.kind,
            UpstreamErrorKind::Unavailable { .. } | UpstreamErrorKind::Transport(_)
        )
    }
}
