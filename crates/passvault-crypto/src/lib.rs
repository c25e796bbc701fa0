/// Passvault Crypto Library
///
/// Password hashing (Argon2id, PHC strings) and random password generation
/// from a CSPRNG. Nothing in here persists or logs plaintext.

pub mod generate;
pub mod hash;

pub use generate::{GenerateError, PasswordPolicy, generate_password};
pub use hash::{hash_password, verify_dummy, verify_password};
