use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedAccount;

pub async fn me(
    Extension(principal): Extension<AuthenticatedAccount>,
) -> Result<ApiSuccess<MeResponseData>, ApiError> {
    Ok(ApiSuccess::new(StatusCode::OK, (&principal).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub id: String,
    pub email: String,
}

impl From<&AuthenticatedAccount> for MeResponseData {
    fn from(principal: &AuthenticatedAccount) -> Self {
        Self {
            id: principal.account_id.to_string(),
            email: principal.email.as_str().to_string(),
        }
    }
}
