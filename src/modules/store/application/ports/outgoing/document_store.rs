use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::modules::store::application::domain::entities::{
    ChangeEvent, Collection, Document, DocumentId, Fields,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentStoreError {
    #[error("Document not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Named collections of loosely-typed documents.
///
/// Every successful write is published on the change feed returned by
/// [`DocumentStore::changes`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents carrying a creation stamp, newest first.
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, DocumentStoreError>;

    async fn get(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<Option<Document>, DocumentStoreError>;

    /// Creates a document under a fresh id.
    async fn insert(
        &self,
        collection: Collection,
        fields: Fields,
        created_at: DateTime<Utc>,
    ) -> Result<DocumentId, DocumentStoreError>;

    /// Shallow-merges `fields` into an existing document.
    /// Fails with `NotFound` when the id is absent.
    async fn merge(
        &self,
        collection: Collection,
        id: &DocumentId,
        fields: Fields,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DocumentStoreError>;

    /// Creates or fully overwrites the document stored under `id`.
    async fn set(
        &self,
        collection: Collection,
        id: &DocumentId,
        fields: Fields,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DocumentStoreError>;

    /// Removes the document. Deleting a missing id succeeds.
    async fn delete(&self, collection: Collection, id: &DocumentId)
        -> Result<(), DocumentStoreError>;

    fn changes(&self) -> broadcast::Receiver<ChangeEvent>;
}
