use std::time::Duration;

use thiserror::Error;

/// Error type for password operations.
///
/// Every variant is an infrastructure failure. A wrong password is never an
/// error, see [`PasswordHasher::verify`](super::PasswordHasher::verify).
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Random salt source unavailable: {0}")]
    SaltUnavailable(String),

    #[error("Malformed password hash: {0}")]
    MalformedHash(String),

    #[error("Invalid work factor: {0}")]
    InvalidWorkFactor(String),

    #[error("Password hashing timed out after {0:?}")]
    Timeout(Duration),
}
