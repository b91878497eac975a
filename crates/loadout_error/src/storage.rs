//! Snapshot persistence error types.

/// Kinds of snapshot persistence errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create the snapshot directory
    #[display("Failed to create snapshot directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write a snapshot file
    #[display("Failed to write snapshot: {}", _0)]
    FileWrite(String),
    /// Failed to read a snapshot file
    #[display("Failed to read snapshot: {}", _0)]
    FileRead(String),
    /// No snapshot has been persisted yet
    #[display("Snapshot not found: {}", _0)]
    NotFound(String),
    /// Snapshot contents could not be encoded or decoded
    #[display("Snapshot is not valid JSON: {}", _0)]
    Serialization(String),
}

/// Snapshot persistence error with location tracking.
///
/// # Examples
///
/// ```
/// use loadout_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("cache/new_cosmetics.json".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the snapshot was read but its contents could not be decoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use loadout_error::{StorageError, StorageErrorKind};
    ///
    /// assert!(StorageError::new(StorageErrorKind::Serialization("eof".into())).is_malformed());
    /// assert!(!StorageError::new(StorageErrorKind::FileRead("EIO".into())).is_malformed());
    /// ```
    pub fn is_malformed(&self) -> bool {
        matches!(self.kind, StorageErrorKind::Serialization(_))
    }
}
