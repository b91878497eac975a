//! Webhook delivery errors.

/// Why a single page could not be delivered to a destination.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum DeliveryErrorKind {
    /// Destination answered with a non-2xx status
    #[display("Webhook returned HTTP {}", _0)]
    Status(u16),

    /// Request could not be sent or timed out
    #[display("Webhook transport failure: {}", _0)]
    Transport(String),
}

/// Delivery error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Delivery Error: {} at line {} in {}", kind, line, file)]
pub struct DeliveryError {
    /// The error kind
    pub kind: DeliveryErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl DeliveryError {
    /// Create a new DeliveryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DeliveryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
