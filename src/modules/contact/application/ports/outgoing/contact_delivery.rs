use async_trait::async_trait;

use crate::modules::contact::application::domain::ContactMessage;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactDeliveryError {
    /// The form service answered but refused the submission.
    #[error("{0}")]
    Rejected(String),

    #[error("Contact endpoint unreachable: {0}")]
    Network(String),

    #[error("Contact delivery is not configured")]
    NotConfigured,
}

#[async_trait]
pub trait ContactDelivery: Send + Sync {
    async fn deliver(&self, message: &ContactMessage) -> Result<(), ContactDeliveryError>;
}
