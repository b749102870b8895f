use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::modules::auth::application::domain::entities::{AdminAccount, NewAccount};
use crate::modules::auth::application::ports::outgoing::{UserRepository, UserRepositoryError};

/// Accounts for `STORE_BACKEND=memory`, keyed by email.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    accounts: RwLock<HashMap<String, AdminAccount>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_account(
        &self,
        account: NewAccount,
    ) -> Result<AdminAccount, UserRepositoryError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.email) {
            return Err(UserRepositoryError::AccountAlreadyExists);
        }

        let stored = AdminAccount {
            id: account.id,
            email: account.email.clone(),
            password_hash: account.password_hash,
            created_at: Utc::now(),
        };
        accounts.insert(account.email, stored.clone());
        Ok(stored)
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AdminAccount>, UserRepositoryError> {
        Ok(self.accounts.read().await.get(email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn second_account_with_same_email_is_rejected() {
        let repo = InMemoryUserRepository::new();
        let account = || NewAccount {
            id: Uuid::new_v4(),
            email: "owner@example.com".into(),
            password_hash: "h".into(),
        };

        repo.create_account(account()).await.unwrap();

        assert_eq!(
            repo.create_account(account()).await.unwrap_err(),
            UserRepositoryError::AccountAlreadyExists
        );
        assert!(repo
            .find_by_email("owner@example.com")
            .await
            .unwrap()
            .is_some());
    }
}
