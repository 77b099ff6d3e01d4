// src/application/error.rs
use thiserror::Error;

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The code is unknown, already consumed, or could never have been issued.
    #[error("invalid verification code")]
    InvalidCode,

    /// A freshly generated code collided with a live one. Points at a broken
    /// generator; the existing row is left untouched.
    #[error("duplicate verification code")]
    DuplicateCode,

    /// The caller's context cannot be encoded losslessly. Nothing was stored.
    #[error("invalid context: {0}")]
    InvalidContext(String),

    #[error("storage integrity failure: {0}")]
    StorageIntegrity(String),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("randomness source unavailable: {0}")]
    EntropyUnavailable(String),
}

impl ApplicationError {
    pub fn invalid_context(msg: impl Into<String>) -> Self {
        Self::InvalidContext(msg.into())
    }

    pub fn storage_integrity(msg: impl Into<String>) -> Self {
        Self::StorageIntegrity(msg.into())
    }

    pub fn backend_unavailable(msg: impl Into<String>) -> Self {
        Self::BackendUnavailable(msg.into())
    }

    pub fn entropy_unavailable(msg: impl Into<String>) -> Self {
        Self::EntropyUnavailable(msg.into())
    }

    /// Stable identifier for log routing and alerting.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidCode => "invalid_code",
            Self::DuplicateCode => "duplicate_code",
            Self::InvalidContext(_) => "invalid_context",
            Self::StorageIntegrity(_) => "storage_integrity",
            Self::BackendUnavailable(_) => "backend_unavailable",
            Self::EntropyUnavailable(_) => "entropy_unavailable",
        }
    }

    /// Message that may be shown to an end user. Internal details never leak.
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidCode => "invalid or expired grant",
            Self::BackendUnavailable(_) => "service temporarily unavailable",
            Self::DuplicateCode
            | Self::InvalidContext(_)
            | Self::StorageIntegrity(_)
            | Self::EntropyUnavailable(_) => "internal error",
        }
    }

    /// Whether infrastructure may retry the failed call.
    ///
    /// Only transport failures qualify. A retried `consume` can still fail with
    /// `InvalidCode` if the first attempt's delete had already committed, so end
    /// users should not be offered a retry.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_))
    }
}
