use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
    #[error("Could not hash password")]
    Hash,

    #[error("Stored password hash is unreadable")]
    Verify,

    #[error("Hashing worker failed")]
    Worker,
}

/// Slow one-way hashing for stored passwords.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, HashError>;
    /// `Ok(false)` on a wrong password; `Err` only when the hash itself is bad.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError>;
}
