use std::time::Duration;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

const SALT_LEN: usize = 16;

/// Base64 of a fixed 16 byte salt, used only for decoy verification.
const DECOY_SALT: &str = "c29tZXNhbHRzb21lc2FsdA";

/// Base64 of a 32 byte all-zero digest. No password produces it.
const DECOY_DIGEST: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Argon2id cost parameters.
///
/// The default is the OWASP Argon2id profile (m=19456 KiB, t=2, p=1), which
/// costs at least as much as bcrypt with 10 rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkFactor {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes over memory
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for WorkFactor {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Password hashing implementation.
///
/// Provides cryptographic password hashing (internally uses Argon2id).
/// Cloning is cheap; clones share nothing mutable.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
    work_factor: WorkFactor,
    timeout: Duration,
}

impl PasswordHasher {
    /// Upper bound for a single offloaded hash or verification.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create a new password hasher instance.
    ///
    /// # Returns
    /// PasswordHasher instance configured with the default work factor
    pub fn new() -> Self {
        let work_factor = WorkFactor::default();
        Self {
            params: Params::new(
                work_factor.memory_kib,
                work_factor.iterations,
                work_factor.parallelism,
                None,
            )
            .unwrap_or_default(),
            work_factor,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Create a password hasher with a custom work factor.
    ///
    /// # Arguments
    /// * `work_factor` - Argon2id cost parameters
    ///
    /// # Errors
    /// * `InvalidWorkFactor` - Parameters rejected by Argon2 (e.g. memory below 8 KiB per lane)
    pub fn with_work_factor(work_factor: WorkFactor) -> Result<Self, PasswordError> {
        let params = Params::new(
            work_factor.memory_kib,
            work_factor.iterations,
            work_factor.parallelism,
            None,
        )
        .map_err(|e| PasswordError::InvalidWorkFactor(e.to_string()))?;

        Ok(Self {
            params,
            work_factor,
            timeout: Self::DEFAULT_TIMEOUT,
        })
    }

    /// Bound offloaded operations by `timeout` instead of [`Self::DEFAULT_TIMEOUT`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Hash a plaintext password securely.
    ///
    /// Uses Argon2id with a fresh random salt, so hashing the same password
    /// twice yields different strings.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `SaltUnavailable` - The OS random source failed
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let mut salt = [0u8; SALT_LEN];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| PasswordError::SaltUnavailable(e.to_string()))?;
        let salt = SaltString::encode_b64(&salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The cost parameters are read from the stored hash, so hashes made
    /// under an older work factor keep verifying. The digest comparison is
    /// constant time.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedHash` - Hash format is invalid or carries unusable parameters
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        match self
            .argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
        }
    }

    /// [`hash`](Self::hash) on the blocking thread pool, bounded by the configured timeout.
    pub async fn hash_blocking(&self, password: &str) -> Result<String, PasswordError> {
        let hasher = self.clone();
        let password = password.to_owned();
        self.offload(move || hasher.hash(&password)).await
    }

    /// [`verify`](Self::verify) on the blocking thread pool, bounded by the configured timeout.
    pub async fn verify_blocking(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let hasher = self.clone();
        let password = password.to_owned();
        let hash = hash.to_owned();
        self.offload(move || hasher.verify(&password, &hash)).await
    }

    /// A well-formed hash at the current work factor that matches no password.
    ///
    /// Verifying against it costs the same as a real verification.
    pub fn decoy_hash(&self) -> String {
        format!(
            "$argon2id$v=19$m={},t={},p={}${}${}",
            self.work_factor.memory_kib,
            self.work_factor.iterations,
            self.work_factor.parallelism,
            DECOY_SALT,
            DECOY_DIGEST
        )
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    async fn offload<T, F>(&self, job: F) -> Result<T, PasswordError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, PasswordError> + Send + 'static,
    {
        match tokio::time::timeout(self.timeout, tokio::task::spawn_blocking(job)).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(PasswordError::HashingFailed(format!(
                "hashing task failed: {}",
                join_error
            ))),
            Err(_) => Err(PasswordError::Timeout(self.timeout)),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
