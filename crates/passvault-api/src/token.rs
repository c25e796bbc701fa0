use anyhow::anyhow;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use thiserror::Error;

use passvault_types::api::Claims;

/// Default bearer token lifetime, in seconds.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Longest lifetime the server accepts: one year.
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 3600;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TokenError {
    /// No `Authorization: Bearer` header on the request.
    #[error("Not authenticated")]
    Missing,
    #[error("Token expired")]
    Expired,
    /// Bad signature, malformed token or malformed claims.
    #[error("Invalid token")]
    Invalid,
}

/// Issues and checks HS256 bearer tokens. Tokens are stateless: validity is a
/// function of the signature and the embedded expiry only.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn issue(&self, subject: &str) -> anyhow::Result<String> {
        let expires_at = Utc::now()
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| anyhow!("token lifetime of {} is out of range", self.lifetime))?;
        let claims = Claims {
            sub: subject.to_string(),
            exp: expires_at.timestamp().max(0) as usize,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Returns the subject the token was issued for.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        Ok(data.claims.sub)
    }
}
