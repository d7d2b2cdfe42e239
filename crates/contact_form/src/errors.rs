use thiserror::Error;

/// Failure of the durable client storage backing the rate limiter.
///
/// The limiter never propagates these: it logs them and fails open.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed storage file: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Any rejection from the notification sender.
///
/// The reason is carried for logging only; every delivery failure is
/// handled the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("delivery failed: {reason}")]
pub struct DeliveryError {
    pub reason: String,
}

impl DeliveryError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
