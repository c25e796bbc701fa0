use axum::{Extension, Json, extract::State};
use axum_extra::extract::WithRejection;
use tracing::info;

use passvault_crypto::{PasswordPolicy, generate_password, hash_password, verify_password};
use passvault_types::api::{
    CheckoutRequest, GenerateRequest, GenerateResponse, HistoryResponse, MessageResponse,
};

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// The plaintext is returned exactly once; only its hash is stored.
pub async fn generate(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(req), _): WithRejection<Json<GenerateRequest>, ApiError>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let policy = PasswordPolicy {
        length: req.length,
        use_digits: req.use_digits,
        use_special: req.use_special,
    };
    let password = generate_password(&policy)?;

    let st = state.clone();
    let username = user.username.clone();
    let plaintext = password.clone();
    let hashed_password = blocking(move || {
        let owner = st.db.find_user(&username)?.ok_or(ApiError::UnknownUser)?;
        let hash = hash_password(&plaintext)?;
        st.db.append_history(owner.id, &hash)?;
        Ok(hash)
    })
    .await?;

    info!(
        "Generated {}-character password for {}",
        policy.length, user.username
    );

    Ok(Json(GenerateResponse {
        password,
        hashed_password,
    }))
}

/// Compares the candidate against the most recent history entry only.
pub async fn checkout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(req), _): WithRejection<Json<CheckoutRequest>, ApiError>,
) -> Result<Json<MessageResponse>, ApiError> {
    let st = state.clone();
    let username = user.username;
    let matched = blocking(move || {
        let owner = st.db.find_user(&username)?.ok_or(ApiError::NoHistory)?;
        let latest = st.db.latest_history(owner.id)?.ok_or(ApiError::NoHistory)?;
        Ok(verify_password(&req.password, &latest))
    })
    .await?;

    if !matched {
        return Err(ApiError::PasswordMismatch);
    }

    Ok(Json(MessageResponse::new("Password is correct")))
}

pub async fn history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let st = state.clone();
    let history = blocking(move || {
        // A subject whose account was deleted simply has no history left
        let Some(owner) = st.db.find_user(&user.username)? else {
            return Ok(Vec::new());
        };
        Ok(st.db.recent_history(owner.id, st.history_limit)?)
    })
    .await?;

    Ok(Json(HistoryResponse { history }))
}
