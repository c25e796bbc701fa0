pub mod auth;
pub mod error;
pub mod middleware;
pub mod passwords;
pub mod token;
pub mod users;

use anyhow::anyhow;
use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};
use tracing::error;

pub use auth::{AppState, AppStateInner};
pub use error::ApiError;
pub use token::{TokenError, TokenIssuer};

/// Default number of entries returned by `/history/`.
pub const DEFAULT_HISTORY_LIMIT: u32 = 10;

/// All routes. Everything except registration, login and the health check
/// sits behind `require_auth`.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/register/", post(auth::register))
        .route("/token/", post(auth::login))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/generate/", post(passwords::generate))
        .route("/checkout/", post(passwords::checkout))
        .route("/history/", get(passwords::history))
        .route("/update-password/", post(users::update_password))
        .route("/users/", get(users::list_users))
        .route("/users/{user_id}", delete(users::delete_user))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Run Argon2 and SQLite work off the async runtime.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(anyhow!("blocking task failed: {}", e))
    })?
}
