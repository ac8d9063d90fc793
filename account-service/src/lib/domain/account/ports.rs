use async_trait::async_trait;
use auth::Account;

use crate::account::errors::AccountError;
use crate::account::models::Credentials;
use crate::account::models::SignUpCommand;
use crate::account::models::TokenGrant;

/// Port for account domain service operations.
///
/// Persistence is the [`auth::AccountStore`] port from the authentication core.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account and issue its first token.
    ///
    /// # Arguments
    /// * `command` - Validated command containing email and password
    ///
    /// # Returns
    /// Created account with a bearer token
    ///
    /// # Errors
    /// * `EmailInUse` - Email is already registered
    /// * `HashingFailure` - Password hashing failed or timed out
    /// * `LookupFailure` - Store operation failed
    /// * `TokenCodecFailure` - Token encoding failed
    async fn sign_up(&self, command: SignUpCommand) -> Result<TokenGrant, AccountError>;

    /// Verify credentials through the `credential` strategy and issue a token.
    ///
    /// # Errors
    /// * `Rejected` - Unknown email or wrong password
    /// * `HashingFailure` / `LookupFailure` / `TokenCodecFailure` - Infrastructure failed
    async fn sign_in(&self, credentials: Credentials) -> Result<TokenGrant, AccountError>;

    /// Resolve a bearer token to its account through the `token` strategy.
    ///
    /// # Errors
    /// * `Rejected` - Token malformed, forged, expired, or its account is gone
    /// * `LookupFailure` - Store failed or timed out
    async fn authorize(&self, token: &str) -> Result<Account, AccountError>;

    /// Issue a bearer token for an account.
    ///
    /// # Errors
    /// * `TokenCodecFailure` - Token encoding failed
    fn issue_token(&self, account: &Account) -> Result<String, AccountError>;
}
