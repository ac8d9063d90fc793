use std::collections::HashMap;

use async_trait::async_trait;
use auth::Account;
use auth::AccountId;
use auth::AccountStore;
use auth::EmailAddress;
use auth::NewAccount;
use auth::StoreError;
use tokio::sync::RwLock;

/// Process-local account store.
///
/// Used when no database is configured, and by the integration tests.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove an account, as an administrator would.
    ///
    /// # Returns
    /// Whether an account was removed
    pub async fn delete(&self, id: &AccountId) -> bool {
        self.accounts.write().await.remove(id).is_some()
    }

    pub async fn count(&self) -> usize {
        self.accounts.read().await.len()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;

        if accounts
            .values()
            .any(|existing| existing.email == account.email)
        {
            return Err(StoreError::DuplicateEmail(
                account.email.as_str().to_string(),
            ));
        }

        let account = account.into_account();
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|account| &account.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(id).cloned())
    }
}
