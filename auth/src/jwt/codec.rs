use jsonwebtoken::crypto;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// Signs claims into compact tokens and verifies presented tokens.
///
/// Uses HS256 (HMAC with SHA-256). The secret is captured at construction;
/// issuance and verification must share one codec (or one secret) or every
/// token becomes unverifiable.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
}

impl TokenCodec {
    /// Create a new codec with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Load it from configuration once at startup, never log it
    pub fn new(secret: &[u8]) -> Self {
        let algorithm = Algorithm::HS256;

        let mut validation = Validation::new(algorithm);
        // `exp` is optional, but when present it is enforced to the second
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            validation,
        }
    }

    /// Encode claims into a signed token.
    ///
    /// # Returns
    /// Compact, URL-safe token string (`header.payload.signature`)
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// The HMAC over `header.payload` is checked before either segment is
    /// parsed, so any altered byte of a well-formed token is a signature
    /// failure and nothing unverified is ever returned.
    ///
    /// # Errors
    /// * `Malformed` - Not three segments, or verified content is not a valid token
    /// * `SignatureInvalid` - Signature does not match the content under this secret
    /// * `Expired` - The `exp` claim is in the past
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_signature(token)?;

        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(classify)
    }

    fn verify_signature(&self, token: &str) -> Result<(), TokenError> {
        if token.split('.').count() != 3 {
            return Err(TokenError::Malformed(
                "expected header.payload.signature".to_string(),
            ));
        }

        let (message, signature) = token
            .rsplit_once('.')
            .ok_or_else(|| TokenError::Malformed("missing signature".to_string()))?;

        match crypto::verify(signature, message.as_bytes(), &self.decoding_key, self.algorithm) {
            Ok(true) => Ok(()),
            Ok(false) => Err(TokenError::SignatureInvalid),
            Err(e) => Err(classify(e)),
        }
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
        _ => TokenError::Malformed(err.to_string()),
    }
}
