//! Verification strategies and the outcome they produce.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::account::Account;
use crate::account::StoreError;
use crate::authenticator::AuthenticationError;

pub mod credential;
pub mod token;

pub use credential::CredentialVerifier;
pub use token::TokenVerifier;

/// Registry name of the email/password strategy.
pub const CREDENTIAL: &str = "credential";

/// Registry name of the bearer token strategy.
pub const TOKEN: &str = "token";

/// What a request presents to prove identity.
#[derive(Clone)]
pub enum AuthInput {
    Credentials { email: String, password: String },
    Bearer(String),
}

impl AuthInput {
    pub fn credentials(email: impl Into<String>, password: impl Into<String>) -> Self {
        AuthInput::Credentials {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        AuthInput::Bearer(token.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AuthInput::Credentials { .. } => "credentials",
            AuthInput::Bearer(_) => "bearer",
        }
    }
}

impl fmt::Debug for AuthInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthInput::Credentials { email, .. } => f
                .debug_struct("Credentials")
                .field("email", email)
                .field("password", &"<redacted>")
                .finish(),
            AuthInput::Bearer(_) => f.debug_tuple("Bearer").field(&"<redacted>").finish(),
        }
    }
}

/// Why a strategy refused to authenticate.
///
/// These reasons are for logs. Clients see one generic rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoSuchAccount,
    InvalidCredentials,
    TokenMalformed,
    TokenSignatureInvalid,
    TokenExpired,
    UnknownSubject,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::NoSuchAccount => "no such account",
            Rejection::InvalidCredentials => "invalid credentials",
            Rejection::TokenMalformed => "token malformed",
            Rejection::TokenSignatureInvalid => "token signature invalid",
            Rejection::TokenExpired => "token expired",
            Rejection::UnknownSubject => "unknown subject",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a completed verification: exactly one of the two.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    Authenticated(Account),
    Rejected(Rejection),
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated(_))
    }

    pub fn account(&self) -> Option<&Account> {
        match self {
            AuthOutcome::Authenticated(account) => Some(account),
            AuthOutcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            AuthOutcome::Authenticated(_) => None,
            AuthOutcome::Rejected(reason) => Some(*reason),
        }
    }
}

/// A named, swappable verification method.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Name the strategy is registered under.
    fn name(&self) -> &str;

    /// Verify `input`.
    ///
    /// # Returns
    /// `Authenticated` or `Rejected` when verification ran to completion
    ///
    /// # Errors
    /// * `UnsupportedInput` - Input kind this strategy does not handle
    /// * `HashingFailure` / `LookupFailure` - Infrastructure failed, no verdict reached
    async fn authenticate(&self, input: &AuthInput) -> Result<AuthOutcome, AuthenticationError>;
}

/// Run a store lookup, turning store errors and timeouts into `LookupFailure`.
pub(crate) async fn bounded_lookup<F>(
    timeout: Duration,
    lookup: F,
) -> Result<Option<Account>, AuthenticationError>
where
    F: Future<Output = Result<Option<Account>, StoreError>>,
{
    match tokio::time::timeout(timeout, lookup).await {
        Ok(result) => result.map_err(AuthenticationError::from),
        Err(_) => Err(AuthenticationError::LookupFailure(format!(
            "account lookup timed out after {:?}",
            timeout
        ))),
    }
}
