use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::debug;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::token::TokenError;

/// The verified token subject, available to handlers behind `require_auth`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}

/// Extract and validate the bearer token from the Authorization header.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(TokenError::Missing)?;

    let username = state.tokens.verify(bearer.token()).map_err(|e| {
        debug!("Rejected bearer token: {}", e);
        e
    })?;

    req.extensions_mut().insert(AuthUser { username });
    Ok(next.run(req).await)
}
