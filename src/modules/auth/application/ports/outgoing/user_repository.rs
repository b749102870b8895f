use async_trait::async_trait;

use crate::modules::auth::application::domain::entities::{AdminAccount, NewAccount};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    #[error("Account already exists")]
    AccountAlreadyExists,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Owner accounts. Emails are stored lowercased.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_account(&self, account: NewAccount) -> Result<AdminAccount, UserRepositoryError>;
    async fn find_by_email(&self, email: &str)
        -> Result<Option<AdminAccount>, UserRepositoryError>;
}
