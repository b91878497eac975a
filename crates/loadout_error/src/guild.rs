//! Guild record store errors.

/// Guild store failure modes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum GuildStoreErrorKind {
    /// No record exists for the guild.
    #[display("Guild not found: {}", _0)]
    NotFound(u64),

    /// The backing store rejected the operation.
    #[display("Guild store backend failure: {}", _0)]
    Backend(String),
}

/// Guild store error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Guild Store Error: {} at line {} in {}", kind, line, file)]
pub struct GuildStoreError {
    /// The error kind
    pub kind: GuildStoreErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl GuildStoreError {
    /// Create a new GuildStoreError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GuildStoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
