use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::thread_rng;

use crate::error::AppError;

const MIN_PASSWORD_LEN: usize = 8;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request("Password too short"));
    }

    let salt = SaltString::generate(&mut thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AppError::internal(format!("Password hashing failed: {err}")))?
        .to_string();
    Ok(hash)
}

/// Constant-time verification through argon2; never errors on mismatch, only
/// on a malformed stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|err| AppError::internal(format!("Invalid password hash: {err}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password};

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_password("password123").expect("hash should succeed");

        assert!(verify_password("password123", &hash).expect("verify should succeed"));
        assert!(!verify_password("password124", &hash).expect("verify should succeed"));
    }

    #[test]
    fn rejects_short_password() {
        let err = hash_password("short").expect_err("short password should fail");
        assert_eq!(err.message(), "Password too short");
    }

    #[test]
    fn two_hashes_of_same_password_differ() {
        let first = hash_password("password123").expect("hash should succeed");
        let second = hash_password("password123").expect("hash should succeed");
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        let err = verify_password("password123", "not-a-phc-string")
            .expect_err("malformed hash should fail");
        assert!(err.message().starts_with("Invalid password hash:"));
    }
}
