use auth::AccountId;
use auth::EmailAddress;
use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::account::errors::AccountError;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated account in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub account_id: AccountId,
    pub email: EmailAddress,
}

/// Middleware that verifies the bearer token and adds the principal to request extensions
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req).ok_or_else(|| {
        tracing::debug!("Missing or unreadable Authorization header");
        ApiError::Unauthorized.into_response()
    })?;

    let account = state
        .account_service
        .authorize(token)
        .await
        .map_err(|e| match e {
            AccountError::Rejected(reason) => {
                tracing::warn!(reason = %reason, "Token rejected");
                ApiError::Unauthorized.into_response()
            }
            other => ApiError::from(other).into_response(),
        })?;

    req.extensions_mut().insert(AuthenticatedAccount {
        account_id: account.id,
        email: account.email,
    });

    Ok(next.run(req).await)
}

/// Accepts `Bearer <token>` as well as a bare token in the header.
fn extract_token_from_header(req: &Request) -> Option<&str> {
    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .trim();

    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .unwrap_or(header)
        .trim();

    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    fn request_with(header: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(http::header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_extract_token_variants() {
        assert_eq!(
            extract_token_from_header(&request_with(Some("Bearer abc.def.ghi"))),
            Some("abc.def.ghi")
        );
        assert_eq!(
            extract_token_from_header(&request_with(Some("abc.def.ghi"))),
            Some("abc.def.ghi")
        );
        assert_eq!(extract_token_from_header(&request_with(Some("Bearer "))), None);
        assert_eq!(extract_token_from_header(&request_with(None)), None);
    }
}
