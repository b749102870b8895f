use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, warn};

use crate::modules::auth::application::domain::entities::{AuthSession, LoginCommand};
use crate::modules::auth::application::ports::outgoing::{
    PasswordHasher, TokenProvider, UserRepository,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password verification failed: {0}")]
    PasswordVerificationFailed(String),

    #[error("Token generation failed: {0}")]
    TokenGenerationFailed(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

#[async_trait]
pub trait ILoginUserUseCase: Send + Sync {
    async fn execute(&self, command: LoginCommand) -> Result<AuthSession, LoginError>;
}

#[derive(Clone)]
pub struct LoginUserUseCase {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenProvider>,
}

impl LoginUserUseCase {
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
impl ILoginUserUseCase for LoginUserUseCase {
    async fn execute(&self, command: LoginCommand) -> Result<AuthSession, LoginError> {
        // Unknown email and wrong password look the same to the caller.
        let account = self
            .users
            .find_by_email(command.email())
            .await
            .map_err(|e| LoginError::RepositoryError(e.to_string()))?
            .ok_or(LoginError::InvalidCredentials)?;

        let matches = self
            .hasher
            .verify(command.password(), &account.password_hash)
            .await
            .map_err(|e| {
                error!("Password verification failed for {}: {}", account.id, e);
                LoginError::PasswordVerificationFailed(e.to_string())
            })?;

        if !matches {
            warn!(account_id = %account.id, "Rejected login: wrong password");
            return Err(LoginError::InvalidCredentials);
        }

        let access_token = self
            .tokens
            .generate_access_token(account.id)
            .map_err(|e| LoginError::TokenGenerationFailed(e.to_string()))?;

        Ok(AuthSession {
            access_token,
            token_type: "Bearer",
            expires_in: self.tokens.access_token_ttl(),
            user: account,
        })
    }
}
