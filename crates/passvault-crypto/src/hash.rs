use anyhow::{Result, anyhow};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use once_cell::sync::Lazy;
use rand_core::OsRng;
use tracing::warn;

/// Stand-in digest for accounts that do not exist, so a failed lookup costs
/// the same Argon2 work as a wrong password.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("passvault-dummy-password").ok());

/// Hash a secret with Argon2id and a fresh random salt.
/// Returns the PHC string (algorithm, params and salt embedded).
pub fn hash_password(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| anyhow!("Password hashing failed: {}", e))?;

    Ok(hash.to_string())
}

/// Check a secret against a stored PHC string. A digest that does not parse
/// never verifies.
pub fn verify_password(plaintext: &str, digest: &str) -> bool {
    let parsed = match PasswordHash::new(digest) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Stored password hash is malformed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

/// Burn one verification's worth of work and fail. Used when the account
/// being logged into does not exist.
pub fn verify_dummy(plaintext: &str) -> bool {
    if let Some(digest) = DUMMY_HASH.as_deref() {
        let _ = verify_password(plaintext, digest);
    }
    false
}
