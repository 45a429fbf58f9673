//! Error types for ztidentity.
//!
//! Minting can only fail fatally: the random source is gone or the scratch
//! buffer cannot be allocated. A rejected candidate is never an error.
//! Private key material is never included in error messages.

/// Identity error types covering all operations.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Secure random source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Failed to allocate {0} byte scratch buffer")]
    AllocationFailure(usize),

    #[error("Invalid identity format: {0}")]
    InvalidFormat(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Identity validation failed: {0}")]
    ValidationFailed(String),

    #[error("Identity already exists at {0}")]
    AlreadyExists(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, IdentityError>;
