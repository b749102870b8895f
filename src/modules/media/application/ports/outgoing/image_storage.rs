use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignUrlError {
    #[error("Access to the bucket was denied")]
    AccessDenied,

    #[error("Bucket not found")]
    BucketNotFound,

    #[error("Storage is misconfigured")]
    Configuration,

    #[error("Storage is unavailable")]
    Infrastructure,
}

/// Object storage for uploaded images.
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// A time-limited URL the browser can `PUT` the file to.
    async fn signed_upload_url(
        &self,
        bucket: &str,
        object_name: &str,
    ) -> Result<String, SignUrlError>;

    /// Where the object can be read once uploaded.
    fn public_url(&self, bucket: &str, object_name: &str) -> String;
}
