use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::modules::contact::application::domain::ContactMessage;
use crate::modules::contact::application::ports::outgoing::{
    ContactDelivery, ContactDeliveryError,
};

const FALLBACK_FAILURE: &str = "Failed to send message";

#[derive(Serialize)]
struct Submission<'a> {
    access_key: &'a str,
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct Reply {
    #[serde(default)]
    success: bool,
    message: Option<String>,
}

/// Posts contact messages to a Web3Forms-compatible endpoint.
pub struct Web3FormsDelivery {
    client: reqwest::Client,
    endpoint: String,
    access_key: Option<String>,
}

impl Web3FormsDelivery {
    pub fn new(endpoint: impl Into<String>, access_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            access_key: access_key.filter(|k| !k.trim().is_empty()),
        }
    }
}

fn interpret(http_ok: bool, reply: Option<Reply>) -> Result<(), ContactDeliveryError> {
    match reply {
        Some(reply) if http_ok && reply.success => Ok(()),
        Some(reply) => Err(ContactDeliveryError::Rejected(
            reply
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_FAILURE.to_string()),
        )),
        None => Err(ContactDeliveryError::Rejected(FALLBACK_FAILURE.to_string())),
    }
}

#[async_trait]
impl ContactDelivery for Web3FormsDelivery {
    async fn deliver(&self, message: &ContactMessage) -> Result<(), ContactDeliveryError> {
        let access_key = self
            .access_key
            .as_deref()
            .ok_or(ContactDeliveryError::NotConfigured)?;

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(&Submission {
                access_key,
                name: message.name(),
                email: message.email(),
                message: message.message(),
            })
            .send()
            .await
            .map_err(|e| ContactDeliveryError::Network(e.to_string()))?;

        let status = resp.status();
        let reply = resp.json::<Reply>().await.ok();
        let outcome = interpret(status.is_success(), reply);

        match &outcome {
            Ok(()) => info!(from = %message.email(), "Contact message delivered"),
            Err(e) => warn!(status = %status, "Contact endpoint refused message: {}", e),
        }
        outcome
    }
}
