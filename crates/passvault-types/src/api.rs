use serde::{Deserialize, Serialize};

use crate::models::UserSummary;

// -- JWT Claims --

/// Bearer token claims. The subject is the username, not the numeric id, so a
/// token stays meaningful even if the row id is reused after a delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// OAuth2 password-grant form. Other grant fields (`grant_type`, `scope`,
/// `client_id`) are accepted and ignored.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

// -- Passwords --

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Signed so that zero and negative lengths reach validation instead of
    /// failing deserialization.
    pub length: i64,
    #[serde(default = "default_use_digits")]
    pub use_digits: bool,
    #[serde(default)]
    pub use_special: bool,
}

fn default_use_digits() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub password: String,
    pub hashed_password: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<String>,
}

// -- Users --

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub user_id: i64,
    pub new_password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub username: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<UserSummary>,
}

// -- Generic --

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of every rejected request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}
