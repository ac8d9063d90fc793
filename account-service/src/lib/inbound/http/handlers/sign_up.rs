use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::CredentialsRequest;
use super::TokenResponseData;
use crate::account::models::SignUpCommand;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn sign_up(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let body = CredentialsRequest::from_body(&body)?;
    let command = SignUpCommand::parse(body.email, body.password)?;

    state
        .account_service
        .sign_up(command)
        .await
        .map_err(ApiError::from)
        .map(|grant| ApiSuccess::new(StatusCode::OK, TokenResponseData { token: grant.token }))
}
