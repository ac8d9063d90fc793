use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::bounded_lookup;
use super::AuthInput;
use super::AuthOutcome;
use super::Rejection;
use super::Strategy;
use super::CREDENTIAL;
use crate::account::AccountStore;
use crate::account::EmailAddress;
use crate::authenticator::AuthenticationError;
use crate::password::PasswordHasher;

/// Email/password verification against an [`AccountStore`].
pub struct CredentialVerifier<S: AccountStore> {
    store: Arc<S>,
    hasher: PasswordHasher,
    lookup_timeout: Duration,
}

impl<S: AccountStore> CredentialVerifier<S> {
    pub fn new(store: Arc<S>, hasher: PasswordHasher, lookup_timeout: Duration) -> Self {
        Self {
            store,
            hasher,
            lookup_timeout,
        }
    }

    /// Verify an email/password pair.
    ///
    /// Unknown addresses still pay for one hash verification, so response
    /// time does not tell a missing account from a wrong password.
    ///
    /// # Errors
    /// * `LookupFailure` - Store failed or timed out
    /// * `HashingFailure` - Stored hash unusable or hashing timed out
    pub async fn verify(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthOutcome, AuthenticationError> {
        let email = match EmailAddress::new(email) {
            Ok(email) => email,
            Err(_) => return self.reject_unknown(password).await,
        };

        let account = bounded_lookup(self.lookup_timeout, self.store.find_by_email(&email)).await?;

        let Some(account) = account else {
            return self.reject_unknown(password).await;
        };

        if self
            .hasher
            .verify_blocking(password, account.password_hash())
            .await?
        {
            Ok(AuthOutcome::Authenticated(account))
        } else {
            Ok(AuthOutcome::Rejected(Rejection::InvalidCredentials))
        }
    }

    async fn reject_unknown(&self, password: &str) -> Result<AuthOutcome, AuthenticationError> {
        self.hasher
            .verify_blocking(password, &self.hasher.decoy_hash())
            .await?;
        Ok(AuthOutcome::Rejected(Rejection::NoSuchAccount))
    }
}

#[async_trait]
impl<S: AccountStore> Strategy for CredentialVerifier<S> {
    fn name(&self) -> &str {
        CREDENTIAL
    }

    async fn authenticate(&self, input: &AuthInput) -> Result<AuthOutcome, AuthenticationError> {
        match input {
            AuthInput::Credentials { email, password } => self.verify(email, password).await,
            other => Err(AuthenticationError::UnsupportedInput {
                strategy: CREDENTIAL.to_string(),
                input: other.kind(),
            }),
        }
    }
}
