use thiserror::Error;

/// Error type for token operations.
///
/// Decoding failures (`Malformed`, `SignatureInvalid`, `Expired`) are
/// verdicts on the presented token. `EncodingFailed` is an infrastructure error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    SignatureInvalid,

    #[error("Token is expired")]
    Expired,
}
