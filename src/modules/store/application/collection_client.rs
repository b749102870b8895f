use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use crate::modules::store::application::domain::entities::{
    Collection, Document, DocumentId, Fields,
};
use crate::modules::store::application::ports::outgoing::{
    DocumentStore, DocumentStoreError, NotificationLevel, Notifier,
};
use crate::modules::store::application::request_state::{OperationKind, RequestTracker};
use crate::modules::store::application::subscription::Subscription;

/// Data-access façade over one named collection.
///
/// The `try_*` methods return the backend error. The plain methods swallow it
/// into the failure signal callers of this layer expect (empty list, `None`,
/// `false`). Either way failures are logged, recorded on the request tracker
/// and announced through the notifier. Reads never announce success.
#[derive(Clone)]
pub struct CollectionClient {
    collection: Collection,
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
    requests: Arc<RequestTracker>,
    announcing: bool,
}

impl CollectionClient {
    pub fn new(
        collection: Collection,
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn Notifier>,
        requests: Arc<RequestTracker>,
    ) -> Self {
        Self {
            collection,
            store,
            notifier,
            requests,
            announcing: true,
        }
    }

    /// Same collection, but nothing is announced through the notifier.
    /// Logging and request tracking are unchanged. Used for bulk writes that
    /// post one summary notification of their own.
    pub fn quiet(&self) -> Self {
        Self {
            announcing: false,
            ..self.clone()
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn requests(&self) -> &Arc<RequestTracker> {
        &self.requests
    }

    pub fn is_loading(&self, kind: OperationKind) -> bool {
        self.requests.is_loading(self.collection, kind)
    }

    pub fn last_error(&self, kind: OperationKind) -> Option<String> {
        self.requests.last_error(self.collection, kind)
    }

    // ──────────────────────────────────────────────────────────
    // Result-returning operations
    // ──────────────────────────────────────────────────────────

    pub async fn try_get_all(&self) -> Result<Vec<Document>, DocumentStoreError> {
        let request = self.requests.begin(self.collection, OperationKind::Fetch);

        match self.store.list(self.collection).await {
            Ok(docs) => {
                request.succeed();
                Ok(docs)
            }
            Err(e) => {
                error!("Error fetching {}: {}", self.collection, e);
                request.fail(e.to_string());
                self.notify_error(format!("Error fetching {}: {}", self.collection, e));
                Err(e)
            }
        }
    }

    pub async fn try_add(&self, fields: Fields) -> Result<DocumentId, DocumentStoreError> {
        let request = self.requests.begin(self.collection, OperationKind::Add);

        match self.store.insert(self.collection, fields, Utc::now()).await {
            Ok(id) => {
                info!("Added {} to {}", id, self.collection);
                request.succeed();
                self.announce(
                    NotificationLevel::Success,
                    "Item added successfully".to_string(),
                );
                Ok(id)
            }
            Err(e) => {
                error!("Error adding to {}: {}", self.collection, e);
                request.fail(e.to_string());
                self.notify_error(format!("Error adding to {}: {}", self.collection, e));
                Err(e)
            }
        }
    }

    pub async fn try_update(
        &self,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), DocumentStoreError> {
        let request = self.requests.begin(self.collection, OperationKind::Update);

        match self
            .store
            .merge(self.collection, id, fields, Utc::now())
            .await
        {
            Ok(()) => {
                request.succeed();
                self.announce(
                    NotificationLevel::Success,
                    "Item updated successfully".to_string(),
                );
                Ok(())
            }
            Err(e) => {
                error!("Error updating {}/{}: {}", self.collection, id, e);
                request.fail(e.to_string());
                self.notify_error(format!("Error updating {}: {}", self.collection, e));
                Err(e)
            }
        }
    }

    pub async fn try_remove(&self, id: &DocumentId) -> Result<(), DocumentStoreError> {
        let request = self.requests.begin(self.collection, OperationKind::Remove);

        match self.store.delete(self.collection, id).await {
            Ok(()) => {
                info!("Deleted {} from {}", id, self.collection);
                request.succeed();
                self.announce(
                    NotificationLevel::Success,
                    "Item deleted successfully".to_string(),
                );
                Ok(())
            }
            Err(e) => {
                error!("Error deleting {}/{}: {}", self.collection, id, e);
                request.fail(e.to_string());
                self.notify_error(format!("Error deleting from {}: {}", self.collection, e));
                Err(e)
            }
        }
    }

    // ──────────────────────────────────────────────────────────
    // Failure-signal operations
    // ──────────────────────────────────────────────────────────

    /// Newest first. Empty on failure.
    pub async fn get_all(&self) -> Vec<Document> {
        self.try_get_all().await.unwrap_or_default()
    }

    /// Like [`get_all`](Self::get_all) but tells an empty collection apart
    /// from a failed fetch.
    pub async fn get_all_checked(&self) -> Option<Vec<Document>> {
        self.try_get_all().await.ok()
    }

    pub async fn add(&self, fields: Fields) -> Option<DocumentId> {
        self.try_add(fields).await.ok()
    }

    pub async fn update(&self, id: &DocumentId, fields: Fields) -> bool {
        self.try_update(id, fields).await.is_ok()
    }

    pub async fn remove(&self, id: &DocumentId) -> bool {
        self.try_remove(id).await.is_ok()
    }

    /// Invokes `on_change` with the full collection now and after every change.
    pub async fn subscribe<F>(&self, on_change: F) -> Subscription
    where
        F: FnMut(Vec<Document>) + Send + 'static,
    {
        Subscription::collection(Arc::clone(&self.store), self.collection, on_change).await
    }

    fn announce(&self, level: NotificationLevel, message: String) {
        if self.announcing {
            self.notifier.notify(level, message);
        }
    }

    fn notify_error(&self, message: String) {
        self.announce(NotificationLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::store::adapter::outgoing::{InMemoryDocumentStore, NotificationLog};
    use crate::tests::support::flaky_store::FlakyStore;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    fn client_over(
        store: Arc<dyn DocumentStore>,
        collection: Collection,
    ) -> (CollectionClient, Arc<NotificationLog>) {
        let log = Arc::new(NotificationLog::default());
        let client = CollectionClient::new(
            collection,
            store,
            log.clone(),
            RequestTracker::new(),
        );
        (client, log)
    }

    // ─────────────────────────────────────────────
    // get_all
    // ─────────────────────────────────────────────

    #[tokio::test]
    async fn get_all_returns_newest_first_without_notifying() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let (client, log) = client_over(store, Collection::Projects);

        client.add(fields(json!({"name": "First"}))).await.unwrap();
        client.add(fields(json!({"name": "Second"}))).await.unwrap();
        log.clear();

        let docs = client.get_all().await;

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].field_str("name"), Some("Second"));
        assert_eq!(docs[1].field_str("name"), Some("First"));
        assert!(log.recent(10).is_empty());
        assert!(!client.is_loading(OperationKind::Fetch));
    }

    #[tokio::test]
    async fn get_all_failure_yields_empty_list_and_error_notification() {
        let store = Arc::new(FlakyStore::new());
        store.fail_lists(true);
        let (client, log) = client_over(store, Collection::Skills);

        let docs = client.get_all().await;

        assert!(docs.is_empty());
        let last = log.recent(1).pop().unwrap();
        assert_eq!(last.level, NotificationLevel::Error);
        assert!(last.message.starts_with("Error fetching skills: "));
        assert!(client.last_error(OperationKind::Fetch).is_some());
    }

    #[tokio::test]
    async fn get_all_checked_distinguishes_failure_from_empty() {
        let flaky = Arc::new(FlakyStore::new());
        let (client, _) = client_over(flaky.clone(), Collection::Education);

        assert_eq!(client.get_all_checked().await, Some(vec![]));

        flaky.fail_lists(true);
        assert_eq!(client.get_all_checked().await, None);
    }

    // ─────────────────────────────────────────────
    // add / update / remove
    // ─────────────────────────────────────────────

    #[tokio::test]
    async fn add_stamps_created_at_and_notifies_success() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let (client, log) = client_over(store.clone(), Collection::Projects);

        let id = client.add(fields(json!({"name": "X"}))).await.unwrap();

        let stored = store.get(Collection::Projects, &id).await.unwrap().unwrap();
        assert!(stored.created_at.is_some());
        assert_eq!(log.recent(1)[0].message, "Item added successfully");
    }

    #[tokio::test]
    async fn add_failure_returns_none() {
        let flaky = Arc::new(FlakyStore::new());
        flaky.fail_writes(true);
        let (client, log) = client_over(flaky, Collection::Projects);

        assert!(client.add(fields(json!({"name": "X"}))).await.is_none());
        assert!(log.recent(1)[0]
            .message
            .starts_with("Error adding to projects: "));
    }

    #[tokio::test]
    async fn update_merges_supplied_fields_only() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let (client, log) = client_over(store.clone(), Collection::Skills);
        let id = client
            .add(fields(json!({"name": "Rust", "category": "Languages"})))
            .await
            .unwrap();

        assert!(client.update(&id, fields(json!({"name": "Rust 2024"}))).await);

        let stored = store.get(Collection::Skills, &id).await.unwrap().unwrap();
        assert_eq!(stored.field_str("name"), Some("Rust 2024"));
        assert_eq!(stored.field_str("category"), Some("Languages"));
        assert!(stored.updated_at.is_some());
        assert_eq!(log.recent(1)[0].message, "Item updated successfully");
    }

    #[tokio::test]
    async fn update_of_missing_document_fails() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let (client, log) = client_over(store, Collection::Skills);

        assert!(!client.update(&DocumentId::from("nope"), fields(json!({"name": "x"}))).await);
        assert!(log.recent(1)[0].message.starts_with("Error updating skills: "));
        assert_eq!(
            client.last_error(OperationKind::Update),
            Some(DocumentStoreError::NotFound.to_string())
        );
    }

    #[tokio::test]
    async fn remove_deletes_and_notifies() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let (client, log) = client_over(store.clone(), Collection::Education);
        let id = client.add(fields(json!({"degree": "BSc"}))).await.unwrap();

        assert!(client.remove(&id).await);

        assert!(store.get(Collection::Education, &id).await.unwrap().is_none());
        assert_eq!(log.recent(1)[0].message, "Item deleted successfully");
    }

    #[tokio::test]
    async fn quiet_client_writes_without_announcing() {
        let flaky = Arc::new(FlakyStore::new());
        let (client, log) = client_over(flaky.clone(), Collection::Projects);
        let quiet = client.quiet();

        let id = quiet.add(fields(json!({"name": "Bulk"}))).await.unwrap();
        flaky.fail_writes(true);
        assert!(!quiet.remove(&id).await);

        assert!(log.recent(10).is_empty());
        assert!(quiet.last_error(OperationKind::Remove).is_some());
        assert!(flaky.get(Collection::Projects, &id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn remove_failure_reports_collection() {
        let flaky = Arc::new(FlakyStore::new());
        flaky.fail_writes(true);
        let (client, log) = client_over(flaky, Collection::SkillCategories);

        assert!(!client.remove(&DocumentId::from("a")).await);
        assert!(log.recent(1)[0]
            .message
            .starts_with("Error deleting from skill_categories: "));
    }
}
