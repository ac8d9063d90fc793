use axum::Extension;

use crate::inbound::http::middleware::AuthenticatedAccount;

pub async fn root(Extension(principal): Extension<AuthenticatedAccount>) -> &'static str {
    tracing::debug!(account_id = %principal.account_id, "Greeting authenticated account");
    "Hi there!"
}
