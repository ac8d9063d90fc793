use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::account::AccountStore;
use crate::account::StoreError;
use crate::jwt::TokenCodec;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::strategy::AuthInput;
use crate::strategy::AuthOutcome;
use crate::strategy::CredentialVerifier;
use crate::strategy::Strategy;
use crate::strategy::TokenVerifier;

/// Authentication failures that prevented a verdict.
///
/// A rejected credential or token is not an error; it is
/// [`AuthOutcome::Rejected`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Unknown authentication strategy: {0}")]
    UnknownStrategy(String),

    #[error("Strategy '{strategy}' does not accept {input} input")]
    UnsupportedInput {
        strategy: String,
        input: &'static str,
    },

    #[error("Password error: {0}")]
    HashingFailure(#[from] PasswordError),

    #[error("Account lookup failed: {0}")]
    LookupFailure(String),
}

impl From<StoreError> for AuthenticationError {
    fn from(err: StoreError) -> Self {
        AuthenticationError::LookupFailure(err.to_string())
    }
}

/// Authentication dispatcher.
///
/// Maps strategy names to verifiers so request handlers pick a verification
/// method by name and new strategies plug in without touching callers.
/// Nothing is retried: every outcome is terminal for the request.
#[derive(Default)]
pub struct Authenticator {
    strategies: HashMap<String, Arc<dyn Strategy>>,
}

impl Authenticator {
    /// Create an authenticator with no strategies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an authenticator with the `credential` and `token` strategies.
    ///
    /// # Arguments
    /// * `store` - Account persistence both strategies read from
    /// * `hasher` - Password hasher for credential checks
    /// * `codec` - Token codec, the same instance that issues tokens
    /// * `lookup_timeout` - Upper bound for a single store lookup
    pub fn standard<S: AccountStore>(
        store: Arc<S>,
        hasher: PasswordHasher,
        codec: Arc<TokenCodec>,
        lookup_timeout: Duration,
    ) -> Self {
        Self::new()
            .with_strategy(Arc::new(CredentialVerifier::new(
                Arc::clone(&store),
                hasher,
                lookup_timeout,
            )))
            .with_strategy(Arc::new(TokenVerifier::new(store, codec, lookup_timeout)))
    }

    /// Register a strategy under its own name.
    ///
    /// # Returns
    /// The strategy previously registered under that name, if any
    pub fn register(&mut self, strategy: Arc<dyn Strategy>) -> Option<Arc<dyn Strategy>> {
        self.strategies
            .insert(strategy.name().to_string(), strategy)
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_strategy(mut self, strategy: Arc<dyn Strategy>) -> Self {
        self.register(strategy);
        self
    }

    /// Names of all registered strategies, sorted.
    pub fn strategies(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the strategy registered as `name` against `input`.
    ///
    /// # Returns
    /// `Authenticated` or `Rejected`; the rejection reason is logged here
    ///
    /// # Errors
    /// * `UnknownStrategy` - No strategy registered under `name`
    /// * Whatever the strategy fails with
    pub async fn dispatch(
        &self,
        name: &str,
        input: &AuthInput,
    ) -> Result<AuthOutcome, AuthenticationError> {
        let strategy = self
            .strategies
            .get(name)
            .ok_or_else(|| AuthenticationError::UnknownStrategy(name.to_string()))?;

        match strategy.authenticate(input).await {
            Ok(AuthOutcome::Authenticated(account)) => {
                tracing::debug!(strategy = name, account_id = %account.id, "Authenticated");
                Ok(AuthOutcome::Authenticated(account))
            }
            Ok(AuthOutcome::Rejected(reason)) => {
                tracing::info!(strategy = name, reason = %reason, "Authentication rejected");
                Ok(AuthOutcome::Rejected(reason))
            }
            Err(e) => {
                tracing::error!(strategy = name, error = %e, "Authentication failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::account::mock::MockStore;
    use crate::account::Account;
    use crate::account::AccountId;
    use crate::account::EmailAddress;
    use crate::account::NewAccount;
    use crate::jwt::Claims;
    use crate::strategy::Rejection;
    use crate::strategy::CREDENTIAL;
    use crate::strategy::TOKEN;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";
    const TIMEOUT: Duration = Duration::from_secs(5);

    /// Store whose lookups never finish in time.
    struct StalledStore;

    #[async_trait]
    impl AccountStore for StalledStore {
        async fn create(&self, _account: NewAccount) -> Result<Account, StoreError> {
            std::future::pending().await
        }

        async fn find_by_email(
            &self,
            _email: &EmailAddress,
        ) -> Result<Option<Account>, StoreError> {
            std::future::pending().await
        }

        async fn find_by_id(&self, _id: &AccountId) -> Result<Option<Account>, StoreError> {
            std::future::pending().await
        }
    }

    /// Accepts any bearer value equal to its name; stands in for a future strategy.
    struct EchoStrategy(Account);

    #[async_trait]
    impl Strategy for EchoStrategy {
        fn name(&self) -> &str {
            "echo"
        }

        async fn authenticate(
            &self,
            input: &AuthInput,
        ) -> Result<AuthOutcome, AuthenticationError> {
            match input {
                AuthInput::Bearer(value) if value == "echo" => {
                    Ok(AuthOutcome::Authenticated(self.0.clone()))
                }
                _ => Ok(AuthOutcome::Rejected(Rejection::InvalidCredentials)),
            }
        }
    }

    fn account_with_password(hasher: &PasswordHasher, password: &str) -> Account {
        NewAccount::new(
            EmailAddress::new("a@b.com").unwrap(),
            hasher.hash(password).unwrap(),
        )
        .into_account()
    }

    #[test]
    fn test_standard_registers_both_strategies() {
        let authenticator = Authenticator::standard(
            Arc::new(MockStore::new()),
            PasswordHasher::new(),
            Arc::new(TokenCodec::new(SECRET)),
            TIMEOUT,
        );

        assert_eq!(authenticator.strategies(), vec![CREDENTIAL, TOKEN]);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_strategy() {
        let authenticator = Authenticator::new();

        let result = authenticator
            .dispatch("saml", &AuthInput::bearer("token"))
            .await;
        assert!(matches!(
            result,
            Err(AuthenticationError::UnknownStrategy(name)) if name == "saml"
        ));
    }

    #[tokio::test]
    async fn test_dispatch_routes_by_name() {
        let hasher = PasswordHasher::new();
        let account = account_with_password(&hasher, "secret123");
        let id = account.id;
        let codec = Arc::new(TokenCodec::new(SECRET));
        let token = codec.encode(&Claims::new(id)).unwrap();

        let mut store = MockStore::new();
        let by_email = account.clone();
        store
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(by_email.clone())));
        store
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let authenticator = Authenticator::standard(Arc::new(store), hasher, codec, TIMEOUT);

        let signed_in = authenticator
            .dispatch(CREDENTIAL, &AuthInput::credentials("a@b.com", "secret123"))
            .await
            .unwrap();
        assert_eq!(signed_in.account().map(|a| a.id), Some(id));

        let authorized = authenticator
            .dispatch(TOKEN, &AuthInput::bearer(token))
            .await
            .unwrap();
        assert_eq!(authorized.account().map(|a| a.id), Some(id));
    }

    #[tokio::test]
    async fn test_register_additional_strategy() {
        let account = account_with_password(&PasswordHasher::new(), "secret123");
        let mut authenticator = Authenticator::new();

        assert!(authenticator
            .register(Arc::new(EchoStrategy(account.clone())))
            .is_none());
        assert!(authenticator
            .register(Arc::new(EchoStrategy(account)))
            .is_some());

        let outcome = authenticator
            .dispatch("echo", &AuthInput::bearer("echo"))
            .await
            .unwrap();
        assert!(outcome.is_authenticated());

        let outcome = authenticator
            .dispatch("echo", &AuthInput::bearer("nope"))
            .await
            .unwrap();
        assert_eq!(outcome.rejection(), Some(Rejection::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_stalled_lookup_times_out() {
        let codec = Arc::new(TokenCodec::new(SECRET));
        let token = codec.encode(&Claims::new(AccountId::new())).unwrap();
        let authenticator = Authenticator::standard(
            Arc::new(StalledStore),
            PasswordHasher::new(),
            codec,
            Duration::from_millis(20),
        );

        let result = authenticator
            .dispatch(TOKEN, &AuthInput::bearer(token))
            .await;
        assert!(matches!(result, Err(AuthenticationError::LookupFailure(_))));

        let result = authenticator
            .dispatch(CREDENTIAL, &AuthInput::credentials("a@b.com", "secret123"))
            .await;
        assert!(matches!(result, Err(AuthenticationError::LookupFailure(_))));
    }
}
