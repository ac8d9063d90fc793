//! Authentication core
//!
//! Provides the authentication subsystem shared by services:
//! - Password hashing (Argon2id, tunable work factor)
//! - Signed bearer tokens (HS256 JWT)
//! - Credential and token verification strategies over an [`AccountStore`]
//! - A named-strategy dispatcher ([`Authenticator`])
//!
//! Services supply the [`AccountStore`] implementation and map
//! [`AuthOutcome`] / [`AuthenticationError`] onto their transport.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Claims, TokenCodec};
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = Claims::new("user123");
//! let token = codec.encode(&claims).unwrap();
//! let decoded = codec.decode(&token).unwrap();
//! assert_eq!(decoded, claims);
//! ```

pub mod account;
pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod strategy;

// Re-export commonly used items
pub use account::Account;
pub use account::AccountId;
pub use account::AccountIdError;
pub use account::AccountStore;
pub use account::EmailAddress;
pub use account::EmailError;
pub use account::NewAccount;
pub use account::StoreError;
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::WorkFactor;
pub use strategy::AuthInput;
pub use strategy::AuthOutcome;
pub use strategy::Rejection;
pub use strategy::Strategy;
