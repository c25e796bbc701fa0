use std::sync::Arc;

use axum::{Form, Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use tracing::{info, warn};

use passvault_crypto::{hash_password, verify_dummy, verify_password};
use passvault_db::Database;
use passvault_types::api::{MessageResponse, RegisterRequest, TokenRequest, TokenResponse};

use crate::blocking;
use crate::error::ApiError;
use crate::token::TokenIssuer;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenIssuer,
    /// Entries returned by `/history/`.
    pub history_limit: u32,
}

pub const MAX_USERNAME_LEN: usize = 32;

pub(crate) fn validate_username(username: &str) -> Result<(), ApiError> {
    let len = username.chars().count();
    if len == 0 || len > MAX_USERNAME_LEN {
        return Err(ApiError::validation(format!(
            "Username must be 1 to {} characters",
            MAX_USERNAME_LEN
        )));
    }
    if username.trim() != username {
        return Err(ApiError::validation(
            "Username must not start or end with whitespace",
        ));
    }
    Ok(())
}

pub(crate) fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::validation("Password must not be empty"));
    }
    Ok(())
}

pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    validate_username(&req.username)?;
    validate_password(&req.password)?;

    let username = req.username.clone();
    let st = state.clone();
    let user_id = blocking(move || {
        // Skip the Argon2 work for a name that is obviously taken; the UNIQUE
        // constraint still decides races.
        if st.db.find_user(&req.username)?.is_some() {
            return Err(ApiError::DuplicateUsername);
        }
        let password_hash = hash_password(&req.password)?;
        Ok(st.db.create_user(&req.username, &password_hash)?)
    })
    .await?;

    info!("Registered user {} (id {})", username, user_id);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Form(req), _): WithRejection<Form<TokenRequest>, ApiError>,
) -> Result<Json<TokenResponse>, ApiError> {
    let username = req.username.clone();
    let st = state.clone();
    let verified = blocking(move || {
        // Unknown names still pay for one Argon2 verify
        let Some(user) = st.db.find_user(&req.username)? else {
            return Ok(verify_dummy(&req.password));
        };
        Ok(verify_password(&req.password, &user.password_hash))
    })
    .await?;

    if !verified {
        warn!("Failed login for {}", username);
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.tokens.issue(&username)?;
    info!("Issued token for {}", username);

    Ok(Json(TokenResponse::bearer(token)))
}
