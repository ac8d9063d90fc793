use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::bounded_lookup;
use super::AuthInput;
use super::AuthOutcome;
use super::Rejection;
use super::Strategy;
use super::TOKEN;
use crate::account::AccountId;
use crate::account::AccountStore;
use crate::authenticator::AuthenticationError;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;

/// Bearer token verification: decode, then resolve the subject to a live account.
pub struct TokenVerifier<S: AccountStore> {
    store: Arc<S>,
    codec: Arc<TokenCodec>,
    lookup_timeout: Duration,
}

impl<S: AccountStore> TokenVerifier<S> {
    pub fn new(store: Arc<S>, codec: Arc<TokenCodec>, lookup_timeout: Duration) -> Self {
        Self {
            store,
            codec,
            lookup_timeout,
        }
    }

    /// Verify a presented token.
    ///
    /// The store is only consulted once signature and expiry have passed.
    /// A valid token whose account is gone is rejected as `UnknownSubject`.
    ///
    /// # Errors
    /// * `LookupFailure` - Store failed or timed out
    pub async fn verify(&self, token: &str) -> Result<AuthOutcome, AuthenticationError> {
        let claims = match self.codec.decode(token) {
            Ok(claims) => claims,
            Err(e) => return Ok(AuthOutcome::Rejected(rejection_for(&e))),
        };

        let Ok(account_id) = AccountId::from_string(&claims.sub) else {
            return Ok(AuthOutcome::Rejected(Rejection::TokenMalformed));
        };

        match bounded_lookup(self.lookup_timeout, self.store.find_by_id(&account_id)).await? {
            Some(account) => Ok(AuthOutcome::Authenticated(account)),
            None => Ok(AuthOutcome::Rejected(Rejection::UnknownSubject)),
        }
    }
}

fn rejection_for(err: &TokenError) -> Rejection {
    match err {
        TokenError::Expired => Rejection::TokenExpired,
        TokenError::SignatureInvalid => Rejection::TokenSignatureInvalid,
        TokenError::Malformed(_) | TokenError::EncodingFailed(_) => Rejection::TokenMalformed,
    }
}

#[async_trait]
impl<S: AccountStore> Strategy for TokenVerifier<S> {
    fn name(&self) -> &str {
        TOKEN
    }

    async fn authenticate(&self, input: &AuthInput) -> Result<AuthOutcome, AuthenticationError> {
        match input {
            AuthInput::Bearer(token) => self.verify(token).await,
            other => Err(AuthenticationError::UnsupportedInput {
                strategy: TOKEN.to_string(),
                input: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::account::mock::MockStore;
    use crate::account::Account;
    use crate::account::EmailAddress;
    use crate::account::NewAccount;
    use crate::jwt::Claims;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";
    const TIMEOUT: Duration = Duration::from_secs(5);

    fn account() -> Account {
        NewAccount::new(
            EmailAddress::new("a@b.com").unwrap(),
            "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAA".to_string(),
        )
        .into_account()
    }

    #[tokio::test]
    async fn test_verify_success() {
        let account = account();
        let id = account.id;
        let codec = Arc::new(TokenCodec::new(SECRET));
        let token = codec.encode(&Claims::new(id)).unwrap();

        let mut store = MockStore::new();
        store
            .expect_find_by_id()
            .withf(move |candidate| *candidate == id)
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let verifier = TokenVerifier::new(Arc::new(store), codec, TIMEOUT);
        let outcome = verifier.verify(&token).await.unwrap();

        assert_eq!(outcome.account().map(|a| a.id), Some(id));
    }

    #[tokio::test]
    async fn test_verify_deleted_account() {
        let codec = Arc::new(TokenCodec::new(SECRET));
        let token = codec.encode(&Claims::new(AccountId::new())).unwrap();

        let mut store = MockStore::new();
        store.expect_find_by_id().times(1).returning(|_| Ok(None));

        let verifier = TokenVerifier::new(Arc::new(store), codec, TIMEOUT);
        let outcome = verifier.verify(&token).await.unwrap();

        assert_eq!(outcome.rejection(), Some(Rejection::UnknownSubject));
    }

    #[tokio::test]
    async fn test_verify_rejects_before_lookup() {
        let codec = Arc::new(TokenCodec::new(SECRET));
        let foreign = TokenCodec::new(b"another_secret_at_least_32_bytes!!");
        let now = Utc::now().timestamp();

        let forged = foreign.encode(&Claims::new(AccountId::new())).unwrap();
        let expired = codec
            .encode(
                &Claims::new(AccountId::new())
                    .with_issued_at(now - 7200)
                    .with_expiration(now - 3600),
            )
            .unwrap();
        let not_an_id = codec.encode(&Claims::new("user123")).unwrap();

        let mut store = MockStore::new();
        store.expect_find_by_id().times(0);
        let verifier = TokenVerifier::new(Arc::new(store), codec, TIMEOUT);

        let cases = [
            (forged.as_str(), Rejection::TokenSignatureInvalid),
            (expired.as_str(), Rejection::TokenExpired),
            ("garbage", Rejection::TokenMalformed),
            (not_an_id.as_str(), Rejection::TokenMalformed),
        ];
        for (token, expected) in cases {
            let outcome = verifier.verify(token).await.unwrap();
            assert_eq!(outcome.rejection(), Some(expected), "token: {}", token);
        }
    }

    #[tokio::test]
    async fn test_credentials_input_is_unsupported() {
        let verifier = TokenVerifier::new(
            Arc::new(MockStore::new()),
            Arc::new(TokenCodec::new(SECRET)),
            TIMEOUT,
        );

        let result = verifier
            .authenticate(&AuthInput::credentials("a@b.com", "secret123"))
            .await;
        assert!(matches!(
            result,
            Err(AuthenticationError::UnsupportedInput { .. })
        ));
    }
}
