use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::modules::media::application::ports::outgoing::{ImageStorage, SignUrlError};

const SIGNED_URL_TTL: Duration = Duration::from_secs(15 * 60);

const PUBLIC_HOST: &str = "https://storage.googleapis.com";

/// google-cloud-storage addresses buckets as `projects/_/buckets/{bucket}`.
fn bucket_resource(bucket: &str) -> String {
    format!("projects/_/buckets/{}", bucket)
}

fn map_sign_error(msg: &str) -> SignUrlError {
    let m = msg.to_lowercase();

    if m.contains("permission") || m.contains("forbidden") || m.contains("denied") {
        SignUrlError::AccessDenied
    } else if m.contains("bucket") && (m.contains("not found") || m.contains("404")) {
        SignUrlError::BucketNotFound
    } else if m.contains("invalid") || m.contains("config") {
        SignUrlError::Configuration
    } else {
        SignUrlError::Infrastructure
    }
}

/// Seam over the signing call so tests never touch Google credentials.
#[async_trait]
trait GcsClient: Send + Sync {
    async fn sign_put_url(
        &self,
        bucket_resource: &str,
        object_name: &str,
        ttl: Duration,
    ) -> Result<String, String>;
}

#[cfg(test)]
struct ArcGcsClient(Arc<dyn GcsClient>);

#[cfg(test)]
#[async_trait]
impl GcsClient for ArcGcsClient {
    async fn sign_put_url(
        &self,
        bucket_resource: &str,
        object_name: &str,
        ttl: Duration,
    ) -> Result<String, String> {
        self.0.sign_put_url(bucket_resource, object_name, ttl).await
    }
}

#[derive(Clone)]
pub struct GcsImageStorage {
    client: Arc<OnceCell<Box<dyn GcsClient>>>,
    signed_url_ttl: Duration,
}

impl Default for GcsImageStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl GcsImageStorage {
    /// The client is built on first use, so startup never waits on credentials.
    pub fn new() -> Self {
        Self {
            client: Arc::new(OnceCell::new()),
            signed_url_ttl: SIGNED_URL_TTL,
        }
    }

    async fn get_client(&self) -> Result<&dyn GcsClient, Box<dyn std::error::Error + Send + Sync>> {
        self.client
            .get_or_try_init(|| async {
                let real_client = RealGcsClient::new()?;
                Ok(Box::new(real_client) as Box<dyn GcsClient>)
            })
            .await
            .map(|boxed| &**boxed)
    }

    #[cfg(test)]
    fn with_client(client: Arc<dyn GcsClient>, signed_url_ttl: Duration) -> Self {
        let once = OnceCell::new();
        let _ = once.set(Box::new(ArcGcsClient(client)) as Box<dyn GcsClient>);

        Self {
            client: Arc::new(once),
            signed_url_ttl,
        }
    }
}

#[async_trait]
impl ImageStorage for GcsImageStorage {
    async fn signed_upload_url(
        &self,
        bucket: &str,
        object_name: &str,
    ) -> Result<String, SignUrlError> {
        let client = self.get_client().await.map_err(|e| {
            tracing::error!("GCS client unavailable: {}", e);
            SignUrlError::Infrastructure
        })?;

        client
            .sign_put_url(&bucket_resource(bucket), object_name, self.signed_url_ttl)
            .await
            .map_err(|e| map_sign_error(&e))
    }

    fn public_url(&self, bucket: &str, object_name: &str) -> String {
        format!("{}/{}/{}", PUBLIC_HOST, bucket, object_name)
    }
}

// ============================================================================
// Real Google Cloud Storage client
// ============================================================================

struct RealGcsClient {
    signer: google_cloud_auth::signer::Signer,
}

impl RealGcsClient {
    fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        tracing::info!("Initializing GCS signer...");

        let signer = google_cloud_auth::credentials::Builder::default()
            .build_signer()
            .map_err(|e| {
                tracing::error!("Failed to build GCS signer: {:?}", e);
                if e.to_string().contains("authorized_user") {
                    tracing::error!(
                        "Signed URLs require a service account key. \
                         Set GOOGLE_APPLICATION_CREDENTIALS to a service-account JSON."
                    );
                }
                e
            })?;

        Ok(Self { signer })
    }
}

#[async_trait]
impl GcsClient for RealGcsClient {
    async fn sign_put_url(
        &self,
        bucket_resource: &str,
        object_name: &str,
        ttl: Duration,
    ) -> Result<String, String> {
        google_cloud_storage::builder::storage::SignedUrlBuilder::for_object(
            bucket_resource.to_string(),
            object_name.to_string(),
        )
        .with_method(google_cloud_storage::http::Method::PUT)
        .with_expiration(ttl)
        .sign_with(&self.signer)
        .await
        .map_err(|e| e.to_string())
    }
}
