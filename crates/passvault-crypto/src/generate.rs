use rand::{CryptoRng, Rng};
use thiserror::Error;

pub const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &[u8] = b"0123456789";
/// The 32 printable ASCII punctuation symbols.
pub const PUNCTUATION: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Upper bound on a single generated password.
pub const MAX_PASSWORD_LENGTH: i64 = 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("password length must be between 1 and {max}, got {0}", max = MAX_PASSWORD_LENGTH)]
    InvalidLength(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub length: i64,
    pub use_digits: bool,
    pub use_special: bool,
}

impl PasswordPolicy {
    /// Letters always, then digits and punctuation as requested.
    pub fn alphabet(&self) -> Vec<u8> {
        let mut chars = LETTERS.to_vec();
        if self.use_digits {
            chars.extend_from_slice(DIGITS);
        }
        if self.use_special {
            chars.extend_from_slice(PUNCTUATION);
        }
        chars
    }
}

/// Generate a password from the thread-local CSPRNG.
pub fn generate_password(policy: &PasswordPolicy) -> Result<String, GenerateError> {
    generate_with(&mut rand::rng(), policy)
}

/// Each character is drawn independently and uniformly from the policy's
/// alphabet.
pub fn generate_with<R: CryptoRng + ?Sized>(
    rng: &mut R,
    policy: &PasswordPolicy,
) -> Result<String, GenerateError> {
    if policy.length <= 0 || policy.length > MAX_PASSWORD_LENGTH {
        return Err(GenerateError::InvalidLength(policy.length));
    }

    let alphabet = policy.alphabet();
    let password = (0..policy.length)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect();

    Ok(password)
}
