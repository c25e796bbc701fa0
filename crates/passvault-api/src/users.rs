use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::WithRejection;
use tracing::info;

use passvault_crypto::hash_password;
use passvault_db::{Database, models::UserRow};
use passvault_types::api::{MessageResponse, UpdatePasswordRequest, UserQuery, UsersResponse};

use crate::auth::{AppState, validate_password};
use crate::blocking;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Load `user_id` and make sure it is the caller's own account.
fn owned_user(db: &Database, user_id: i64, caller: &str) -> Result<UserRow, ApiError> {
    let user = db.get_user_by_id(user_id)?.ok_or(ApiError::UnknownUser)?;
    if user.username != caller {
        return Err(ApiError::Forbidden);
    }
    Ok(user)
}

/// Change the caller's own login password. Tokens already issued stay valid
/// until they expire.
pub async fn update_password(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    WithRejection(Json(req), _): WithRejection<Json<UpdatePasswordRequest>, ApiError>,
) -> Result<Json<MessageResponse>, ApiError> {
    validate_password(&req.new_password)?;

    let st = state.clone();
    let username = caller.username.clone();
    blocking(move || {
        let user = owned_user(&st.db, req.user_id, &username)?;
        let password_hash = hash_password(&req.new_password)?;
        Ok(st.db.update_password(user.id, &password_hash)?)
    })
    .await?;

    info!("Password updated for {}", caller.username);
    Ok(Json(MessageResponse::new("Password updated successfully")))
}

pub async fn list_users(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<UserQuery>, ApiError>,
) -> Result<Json<UsersResponse>, ApiError> {
    let filter = query
        .username
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let st = state.clone();
    let users = blocking(move || Ok(st.db.list_users(filter.as_deref())?)).await?;

    Ok(Json(UsersResponse { users }))
}

/// Delete the caller's own account together with its password history.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    WithRejection(Path(user_id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<MessageResponse>, ApiError> {
    let st = state.clone();
    let username = caller.username.clone();
    blocking(move || {
        let user = owned_user(&st.db, user_id, &username)?;
        Ok(st.db.delete_user(user.id)?)
    })
    .await?;

    info!("Deleted user {} (id {})", caller.username, user_id);
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
