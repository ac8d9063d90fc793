use std::fmt;

use auth::Account;
use auth::EmailAddress;

use crate::account::errors::AccountError;

/// Command to register a new account with domain types
pub struct SignUpCommand {
    pub email: EmailAddress,
    pub password: String,
}

impl fmt::Debug for SignUpCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpCommand")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl SignUpCommand {
    /// Build a sign-up command from raw request fields.
    ///
    /// Absent and empty fields are both treated as missing.
    ///
    /// # Errors
    /// * `MissingCredentials` - Email or password missing
    /// * `InvalidEmail` - Email is not a valid address
    pub fn parse(email: Option<String>, password: Option<String>) -> Result<Self, AccountError> {
        let (email, password) = Credentials::parse(email, password)?.into_parts();
        Ok(Self {
            email: EmailAddress::new(email)?,
            password,
        })
    }
}

/// Raw email/password pair presented at sign-in.
///
/// The email is not validated here; an unparsable address is simply an
/// account that does not exist.
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// # Errors
    /// * `MissingCredentials` - Email or password missing or empty
    pub fn parse(email: Option<String>, password: Option<String>) -> Result<Self, AccountError> {
        match (email, password) {
            (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Ok(Self { email, password })
            }
            _ => Err(AccountError::MissingCredentials),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn into_parts(self) -> (String, String) {
        (self.email, self.password)
    }
}

/// A freshly issued bearer token and the account it speaks for.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub account: Account,
    pub token: String,
}
