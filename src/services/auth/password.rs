/*
 * Responsibility
 * - パスワードの一方向ハッシュ化 (argon2, PHC 文字列) と照合
 * - 平文パスワードはログに出さない
 */
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand_core::OsRng;
use tracing::error;

use crate::error::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "failed to hash password");
            AppError::Internal
        })
}

/// `false` for a wrong password and for a stored hash that cannot be parsed.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            error!(error = %e, "stored password hash is not a PHC string");
            false
        }
    }
}
