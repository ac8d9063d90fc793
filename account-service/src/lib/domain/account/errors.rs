use auth::AuthenticationError;
use auth::EmailError;
use auth::PasswordError;
use auth::Rejection;
use auth::StoreError;
use auth::TokenError;
use thiserror::Error;

/// Top-level error for all account operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    // Input validation errors
    #[error("You must provide e-mail and password.")]
    MissingCredentials,

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    // Domain-level outcomes
    #[error("Email is in use.")]
    EmailInUse(String),

    #[error("Authentication rejected: {0}")]
    Rejected(Rejection),

    // Infrastructure errors
    #[error("Password error: {0}")]
    HashingFailure(#[from] PasswordError),

    #[error("Account lookup failed: {0}")]
    LookupFailure(String),

    #[error("Token error: {0}")]
    TokenCodecFailure(String),

    #[error("Authentication error: {0}")]
    Authentication(AuthenticationError),
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(email) => AccountError::EmailInUse(email),
            other => AccountError::LookupFailure(other.to_string()),
        }
    }
}

impl From<AuthenticationError> for AccountError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::HashingFailure(e) => AccountError::HashingFailure(e),
            AuthenticationError::LookupFailure(msg) => AccountError::LookupFailure(msg),
            other => AccountError::Authentication(other),
        }
    }
}

impl From<TokenError> for AccountError {
    fn from(err: TokenError) -> Self {
        AccountError::TokenCodecFailure(err.to_string())
    }
}
