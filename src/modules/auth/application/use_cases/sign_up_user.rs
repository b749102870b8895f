use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

use crate::modules::auth::application::domain::entities::{
    AuthSession, NewAccount, SignUpCommand,
};
use crate::modules::auth::application::ports::outgoing::{
    PasswordHasher, TokenProvider, UserRepository, UserRepositoryError,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignUpError {
    #[error("An account with this email already exists")]
    EmailAlreadyExists,

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Token generation failed: {0}")]
    TokenGenerationFailed(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

#[async_trait]
pub trait ISignUpUserUseCase: Send + Sync {
    /// Creates the account and signs it in.
    async fn execute(&self, command: SignUpCommand) -> Result<AuthSession, SignUpError>;
}

#[derive(Clone)]
pub struct SignUpUserUseCase {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenProvider>,
}

impl SignUpUserUseCase {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

#[async_trait]
impl ISignUpUserUseCase for SignUpUserUseCase {
    async fn execute(&self, command: SignUpCommand) -> Result<AuthSession, SignUpError> {
        let existing = self
            .users
            .find_by_email(command.email())
            .await
            .map_err(|e| SignUpError::RepositoryError(e.to_string()))?;
        if existing.is_some() {
            return Err(SignUpError::EmailAlreadyExists);
        }

        let password_hash = self
            .hasher
            .hash(command.password())
            .await
            .map_err(|e| SignUpError::HashingFailed(e.to_string()))?;

        // The unique index still catches a concurrent sign-up with the same email.
        let account = self
            .users
            .create_account(NewAccount {
                id: Uuid::new_v4(),
                email: command.email().to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                UserRepositoryError::AccountAlreadyExists => SignUpError::EmailAlreadyExists,
                UserRepositoryError::DatabaseError(msg) => {
                    error!("Failed to store account: {}", msg);
                    SignUpError::RepositoryError(msg)
                }
            })?;

        info!(account_id = %account.id, "Account created");

        let access_token = self
            .tokens
            .generate_access_token(account.id)
            .map_err(|e| SignUpError::TokenGenerationFailed(e.to_string()))?;

        Ok(AuthSession {
            access_token,
            token_type: "Bearer",
            expires_in: self.tokens.access_token_ttl(),
            user: account,
        })
    }
}
