use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::modules::media::application::domain::{UploadCommand, UploadForm, UploadPolicy};
use crate::modules::media::application::ports::outgoing::{ImageStorage, SignUrlError};
use crate::shared::validation::ValidationErrors;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreateUploadUrlError {
    #[error("Invalid upload: {0}")]
    Invalid(ValidationErrors),

    #[error(transparent)]
    Storage(#[from] SignUrlError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrls {
    pub upload_url: String,
    pub public_url: String,
}

#[async_trait]
pub trait ICreateUploadUrlUseCase: Send + Sync {
    async fn execute(&self, form: UploadForm) -> Result<UploadUrls, CreateUploadUrlError>;
}

pub struct CreateUploadUrlUseCase {
    storage: Arc<dyn ImageStorage>,
    policy: UploadPolicy,
}

impl CreateUploadUrlUseCase {
    pub fn new(storage: Arc<dyn ImageStorage>, policy: UploadPolicy) -> Self {
        Self { storage, policy }
    }
}

#[async_trait]
impl ICreateUploadUrlUseCase for CreateUploadUrlUseCase {
    async fn execute(&self, form: UploadForm) -> Result<UploadUrls, CreateUploadUrlError> {
        let command =
            UploadCommand::new(form, &self.policy).map_err(CreateUploadUrlError::Invalid)?;
        let bucket = &self.policy.bucket_name;

        let upload_url = self
            .storage
            .signed_upload_url(bucket, command.object_name())
            .await?;

        info!(object = %command.object_name(), mime = %command.mime_type(), "Upload URL signed");

        Ok(UploadUrls {
            upload_url,
            public_url: self.storage.public_url(bucket, command.object_name()),
        })
    }
}
