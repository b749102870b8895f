use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::modules::store::adapter::outgoing::InMemoryDocumentStore;
use crate::modules::store::application::domain::entities::{
    ChangeEvent, Collection, Document, DocumentId, Fields,
};
use crate::modules::store::application::ports::outgoing::{DocumentStore, DocumentStoreError};

/// In-memory store with switchable failures.
#[derive(Default)]
pub struct FlakyStore {
    inner: InMemoryDocumentStore,
    fail_lists: AtomicBool,
    fail_gets: AtomicBool,
    fail_writes: AtomicBool,
    failing_merges: Mutex<HashSet<DocumentId>>,
    writes: AtomicUsize,
    list_delay: Mutex<Option<Duration>>,
    lists: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_lists(&self, on: bool) {
        self.fail_lists.store(on, Ordering::SeqCst);
    }

    pub fn fail_gets(&self, on: bool) {
        self.fail_gets.store(on, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    /// `list` reads its snapshot, then waits `delay` before returning it.
    pub fn delay_lists(&self, delay: Duration) {
        *self.list_delay.lock().unwrap_or_else(|e| e.into_inner()) = Some(delay);
    }

    /// List calls seen, failed ones included.
    pub fn list_count(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    /// Every merge into `id` fails until the store is dropped.
    pub fn fail_merges_for(&self, id: &DocumentId) {
        self.failing_merges
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.clone());
    }

    /// Write attempts seen, failed ones included.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_write(&self) -> Result<(), DocumentStoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }
}

fn unavailable() -> DocumentStoreError {
    DocumentStoreError::DatabaseError("backend unavailable".to_string())
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, DocumentStoreError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        let snapshot = self.inner.list(collection).await;

        let delay = *self.list_delay.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        snapshot
    }

    async fn get(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<Option<Document>, DocumentStoreError> {
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.inner.get(collection, id).await
    }

    async fn insert(
        &self,
        collection: Collection,
        fields: Fields,
        created_at: DateTime<Utc>,
    ) -> Result<DocumentId, DocumentStoreError> {
        self.check_write()?;
        self.inner.insert(collection, fields, created_at).await
    }

    async fn merge(
        &self,
        collection: Collection,
        id: &DocumentId,
        fields: Fields,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DocumentStoreError> {
        self.check_write()?;
        let blocked = self
            .failing_merges
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(id);
        if blocked {
            return Err(unavailable());
        }
        self.inner.merge(collection, id, fields, updated_at).await
    }

    async fn set(
        &self,
        collection: Collection,
        id: &DocumentId,
        fields: Fields,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DocumentStoreError> {
        self.check_write()?;
        self.inner.set(collection, id, fields, updated_at).await
    }

    async fn delete(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<(), DocumentStoreError> {
        self.check_write()?;
        self.inner.delete(collection, id).await
    }

    fn changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.inner.changes()
    }
}
