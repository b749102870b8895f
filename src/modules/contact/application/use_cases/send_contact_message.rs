use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::modules::contact::application::domain::ContactMessage;
use crate::modules::contact::application::ports::outgoing::{
    ContactDelivery, ContactDeliveryError,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SendContactError {
    /// Safe to show to the visitor.
    #[error("{0}")]
    Rejected(String),

    #[error("Contact service unavailable")]
    Unavailable,
}

#[async_trait]
pub trait ISendContactMessageUseCase: Send + Sync {
    async fn execute(&self, message: ContactMessage) -> Result<(), SendContactError>;
}

pub struct SendContactMessageUseCase {
    delivery: Arc<dyn ContactDelivery>,
}

impl SendContactMessageUseCase {
    pub fn new(delivery: Arc<dyn ContactDelivery>) -> Self {
        Self { delivery }
    }
}

#[async_trait]
impl ISendContactMessageUseCase for SendContactMessageUseCase {
    async fn execute(&self, message: ContactMessage) -> Result<(), SendContactError> {
        self.delivery.deliver(&message).await.map_err(|e| match e {
            ContactDeliveryError::Rejected(msg) => SendContactError::Rejected(msg),
            ContactDeliveryError::Network(msg) => {
                error!("Contact delivery failed: {}", msg);
                SendContactError::Unavailable
            }
            ContactDeliveryError::NotConfigured => {
                error!("CONTACT_ACCESS_KEY is not set; contact form is disabled");
                SendContactError::Unavailable
            }
        })
    }
}
