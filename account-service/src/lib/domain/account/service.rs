use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::strategy::CREDENTIAL;
use auth::strategy::TOKEN;
use auth::Account;
use auth::AccountStore;
use auth::AuthInput;
use auth::AuthOutcome;
use auth::Authenticator;
use auth::Claims;
use auth::NewAccount;
use auth::PasswordHasher;
use auth::TokenCodec;

use crate::account::errors::AccountError;
use crate::account::models::Credentials;
use crate::account::models::SignUpCommand;
use crate::account::models::TokenGrant;
use crate::account::ports::AccountServicePort;

/// Domain service implementation for account operations.
///
/// Registration hashes and stores; sign-in and authorization go through the
/// [`Authenticator`] so the transport never picks a verifier itself.
pub struct AccountService<S>
where
    S: AccountStore,
{
    store: Arc<S>,
    password_hasher: PasswordHasher,
    token_codec: Arc<TokenCodec>,
    authenticator: Authenticator,
    lookup_timeout: Duration,
    token_ttl: Option<chrono::Duration>,
}

impl<S> AccountService<S>
where
    S: AccountStore,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Account persistence implementation
    /// * `password_hasher` - Hasher used for registration and credential checks
    /// * `token_codec` - Codec holding the process-wide signing secret
    /// * `lookup_timeout` - Upper bound for each store call
    /// * `token_ttl` - Lifetime of issued tokens, `None` for no expiry
    pub fn new(
        store: Arc<S>,
        password_hasher: PasswordHasher,
        token_codec: Arc<TokenCodec>,
        lookup_timeout: Duration,
        token_ttl: Option<chrono::Duration>,
    ) -> Self {
        let authenticator = Authenticator::standard(
            Arc::clone(&store),
            password_hasher.clone(),
            Arc::clone(&token_codec),
            lookup_timeout,
        );

        Self {
            store,
            password_hasher,
            token_codec,
            authenticator,
            lookup_timeout,
            token_ttl,
        }
    }

    fn grant(&self, account: Account) -> Result<TokenGrant, AccountError> {
        let token = self.issue_token(&account)?;
        Ok(TokenGrant { account, token })
    }
}

#[async_trait]
impl<S> AccountServicePort for AccountService<S>
where
    S: AccountStore,
{
    async fn sign_up(&self, command: SignUpCommand) -> Result<TokenGrant, AccountError> {
        let password_hash = self.password_hasher.hash_blocking(&command.password).await?;

        let created = tokio::time::timeout(
            self.lookup_timeout,
            self.store
                .create(NewAccount::new(command.email, password_hash)),
        )
        .await
        .map_err(|_| {
            AccountError::LookupFailure(format!(
                "account creation timed out after {:?}",
                self.lookup_timeout
            ))
        })??;

        tracing::info!(account_id = %created.id, "Account created");

        self.grant(created)
    }

    async fn sign_in(&self, credentials: Credentials) -> Result<TokenGrant, AccountError> {
        let input = AuthInput::credentials(credentials.email(), credentials.password());

        match self.authenticator.dispatch(CREDENTIAL, &input).await? {
            AuthOutcome::Authenticated(account) => self.grant(account),
            AuthOutcome::Rejected(reason) => Err(AccountError::Rejected(reason)),
        }
    }

    async fn authorize(&self, token: &str) -> Result<Account, AccountError> {
        match self
            .authenticator
            .dispatch(TOKEN, &AuthInput::bearer(token))
            .await?
        {
            AuthOutcome::Authenticated(account) => Ok(account),
            AuthOutcome::Rejected(reason) => Err(AccountError::Rejected(reason)),
        }
    }

    fn issue_token(&self, account: &Account) -> Result<String, AccountError> {
        let claims = Claims::for_subject(account.id, self.token_ttl);
        Ok(self.token_codec.encode(&claims)?)
    }
}
