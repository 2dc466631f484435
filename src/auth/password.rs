use thiserror::Error;

use crate::error::ApiError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("hashing task was cancelled")]
    TaskFailed,
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::WeakPassword => {
                ApiError::invalid_field("password", err.to_string())
            }
            other => ApiError::internal(other.to_string()),
        }
    }
}

/// Hash a password at the given bcrypt cost. Policy is checked before any
/// hashing work is attempted.
pub fn hash_password(password: &str, cost: u32) -> Result<String, CredentialError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(CredentialError::WeakPassword);
    }
    Ok(bcrypt::hash(password, cost)?)
}

/// Compare a candidate password against a stored hash. Mismatch and
/// unparseable hashes both come back as `false`, never as an error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Hashing is CPU-bound; it runs on the blocking pool so the request
/// executor keeps serving other connections.
pub async fn hash_password_async(password: String, cost: u32) -> Result<String, CredentialError> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|_| CredentialError::TaskFailed)?
}

pub async fn verify_password_async(password: String, hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum cost bcrypt accepts; keeps the test fast
    const TEST_COST: u32 = 4;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("Secret123!", TEST_COST).unwrap();
        assert_ne!(hash, "Secret123!");
        assert!(verify_password("Secret123!", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn short_password_rejected_before_hashing() {
        assert!(matches!(
            hash_password("short", TEST_COST),
            Err(CredentialError::WeakPassword)
        ));
    }

    #[test]
    fn garbage_hash_verifies_false() {
        assert!(!verify_password("Secret123!", "not-a-bcrypt-hash"));
    }

    #[tokio::test]
    async fn async_wrappers_round_trip() {
        let hash = hash_password_async("Secret123!".to_string(), TEST_COST)
            .await
            .unwrap();
        assert!(verify_password_async("Secret123!".to_string(), hash).await);
    }
}
