//! Password hashing.
//!
//! bcrypt is CPU-bound, so hashing and verification run on the blocking pool.

use crate::error::AppError;

/// bcrypt only looks at the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Whether every byte of `password` takes part in the hash.
pub fn fits_bcrypt(password: &str) -> bool {
    password.len() <= MAX_PASSWORD_BYTES
}

pub async fn hash_password(password: &str) -> Result<String, AppError> {
    if !fits_bcrypt(password) {
        return Err(AppError::BadRequest(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(|e| AppError::Internal(e.into()))
}

/// Check a password against a stored hash. Malformed hashes and passwords
/// too long to have been hashed never match.
pub async fn verify_password(password: &str, hashed: &str) -> bool {
    if !fits_bcrypt(password) {
        return false;
    }
    let password = password.to_string();
    let hashed = hashed.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hashed).unwrap_or(false))
        .await
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hashed = hash_password("correct horse").await.unwrap();
        assert_ne!(hashed, "correct horse");
        assert!(verify_password("correct horse", &hashed).await);
        assert!(!verify_password("wrong horse", &hashed).await);
    }

    #[tokio::test]
    async fn test_multibyte_tail_is_never_truncated() {
        // 36 two-byte characters fill the limit before the tail.
        let prefix = "é".repeat(36);
        assert!(fits_bcrypt(&prefix));

        let long = format!("{}aaaa", prefix);
        assert!(!fits_bcrypt(&long));
        assert!(matches!(
            hash_password(&long).await,
            Err(AppError::BadRequest(_))
        ));

        let hashed = hash_password(&prefix).await.unwrap();
        assert!(verify_password(&prefix, &hashed).await);
        assert!(!verify_password(&format!("{}bbbb", prefix), &hashed).await);
    }

    #[tokio::test]
    async fn test_malformed_hash_never_matches() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash").await);
    }
}
