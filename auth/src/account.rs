//! Account model and the persistence port the verifiers read through.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

/// Error for AccountId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email address is empty")]
    Empty,

    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error reported by an [`AccountStore`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error("Stored record is invalid: {0}")]
    InvalidRecord(String),

    #[error("Account store unavailable: {0}")]
    Unavailable(String),
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Trimmed and lowercased on construction, so two spellings of one address
/// compare equal and hit the same stored account.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a normalized, validated email address.
    ///
    /// # Errors
    /// * `Empty` - Nothing but whitespace was given
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: impl AsRef<str>) -> Result<Self, EmailError> {
        let normalized = email.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(EmailError::Empty);
        }

        email_address::EmailAddress::from_str(&normalized)
            .map(|_| EmailAddress(normalized))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered account.
///
/// The password hash is only reachable through [`Account::password_hash`]
/// and is redacted from `Debug` output.
#[derive(Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: EmailAddress,
    pub created_at: DateTime<Utc>,
    password_hash: String,
}

impl Account {
    pub fn new(
        id: AccountId,
        email: EmailAddress,
        password_hash: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            created_at,
            password_hash,
        }
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Input for [`AccountStore::create`]; the store assigns id and creation time.
#[derive(Clone)]
pub struct NewAccount {
    pub email: EmailAddress,
    pub password_hash: String,
}

impl NewAccount {
    pub fn new(email: EmailAddress, password_hash: String) -> Self {
        Self {
            email,
            password_hash,
        }
    }

    /// Materialize the account with a fresh id, as stores without their own id source do.
    pub fn into_account(self) -> Account {
        Account::new(AccountId::new(), self.email, self.password_hash, Utc::now())
    }
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Persistence operations for accounts.
///
/// Implementations own their synchronization; every call is treated as atomic.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    /// Persist a new account.
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Unavailable` - Storage operation failed
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Retrieve account by normalized email.
    ///
    /// # Returns
    /// Optional account (None if not found)
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, StoreError>;

    /// Retrieve account by identifier.
    ///
    /// # Returns
    /// Optional account (None if not found)
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, StoreError>;
}
