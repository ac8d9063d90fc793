use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Token payload.
///
/// `sub` names the account the token speaks for, `iat` and `exp` are Unix
/// timestamps in seconds. A token without `exp` never expires.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Create claims for `sub` issued now, without expiry.
    pub fn new(sub: impl ToString) -> Self {
        Self {
            sub: sub.to_string(),
            iat: Utc::now().timestamp(),
            exp: None,
        }
    }

    /// Create claims for an account with an optional lifetime.
    ///
    /// # Arguments
    /// * `subject` - Unique account identifier
    /// * `ttl` - Time until the token expires, `None` for a non-expiring token
    ///
    /// # Returns
    /// Claims with sub and iat set, and exp when `ttl` is given
    pub fn for_subject(subject: impl ToString, ttl: Option<Duration>) -> Self {
        let claims = Self::new(subject);
        match ttl {
            Some(ttl) => {
                let exp = claims.iat.saturating_add(ttl.num_seconds());
                claims.with_expiration(exp)
            }
            None => claims,
        }
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = iat;
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }
}
