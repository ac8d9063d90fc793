use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::CredentialsRequest;
use super::TokenResponseData;
use crate::account::models::Credentials;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

/// Exchange an email/password pair for a bearer token.
///
/// Every rejection (unknown email or wrong password) answers with the same 401.
pub async fn sign_in(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let body = CredentialsRequest::from_body(&body)?;
    let credentials = Credentials::parse(body.email, body.password)?;

    state
        .account_service
        .sign_in(credentials)
        .await
        .map_err(ApiError::from)
        .map(|grant| ApiSuccess::new(StatusCode::OK, TokenResponseData { token: grant.token }))
}
