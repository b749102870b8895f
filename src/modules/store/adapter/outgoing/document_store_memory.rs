use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, RwLock};

use crate::modules::store::adapter::outgoing::ChangeFeed;
use crate::modules::store::application::domain::entities::{
    merge_fields, strip_reserved, ChangeEvent, ChangeKind, Collection, Document, DocumentId,
    Fields,
};
use crate::modules::store::application::ports::outgoing::{DocumentStore, DocumentStoreError};

#[derive(Debug, Clone)]
struct Entry {
    // Insertion order breaks ties between equal creation stamps.
    seq: u64,
    doc: Document,
}

#[derive(Debug, Default)]
struct Tables {
    next_seq: u64,
    collections: HashMap<Collection, HashMap<DocumentId, Entry>>,
}

/// Process-local store used for `STORE_BACKEND=memory` and in tests.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    tables: RwLock<Tables>,
    feed: ChangeFeed,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, DocumentStoreError> {
        let tables = self.tables.read().await;
        let mut entries: Vec<&Entry> = tables
            .collections
            .get(&collection)
            .map(|c| c.values().filter(|e| e.doc.created_at.is_some()).collect())
            .unwrap_or_default();

        entries.sort_by(|a, b| {
            b.doc
                .created_at
                .cmp(&a.doc.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        Ok(entries.into_iter().map(|e| e.doc.clone()).collect())
    }

    async fn get(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<Option<Document>, DocumentStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .collections
            .get(&collection)
            .and_then(|c| c.get(id))
            .map(|e| e.doc.clone()))
    }

    async fn insert(
        &self,
        collection: Collection,
        fields: Fields,
        created_at: DateTime<Utc>,
    ) -> Result<DocumentId, DocumentStoreError> {
        let id = DocumentId::generate();
        let mut doc = Document::new(id.clone(), fields);
        doc.created_at = Some(created_at);

        {
            let mut tables = self.tables.write().await;
            tables.next_seq += 1;
            let seq = tables.next_seq;
            tables
                .collections
                .entry(collection)
                .or_default()
                .insert(id.clone(), Entry { seq, doc });
        }

        self.feed.publish(collection, &id, ChangeKind::Added);
        Ok(id)
    }

    async fn merge(
        &self,
        collection: Collection,
        id: &DocumentId,
        fields: Fields,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DocumentStoreError> {
        {
            let mut tables = self.tables.write().await;
            let entry = tables
                .collections
                .get_mut(&collection)
                .and_then(|c| c.get_mut(id))
                .ok_or(DocumentStoreError::NotFound)?;

            merge_fields(&mut entry.doc.fields, fields);
            entry.doc.updated_at = Some(updated_at);
        }

        self.feed.publish(collection, id, ChangeKind::Modified);
        Ok(())
    }

    async fn set(
        &self,
        collection: Collection,
        id: &DocumentId,
        fields: Fields,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DocumentStoreError> {
        let kind = {
            let mut tables = self.tables.write().await;
            tables.next_seq += 1;
            let seq = tables.next_seq;
            let table = tables.collections.entry(collection).or_default();

            match table.get_mut(id) {
                Some(entry) => {
                    entry.doc.fields = strip_reserved(fields);
                    entry.doc.updated_at = Some(updated_at);
                    ChangeKind::Modified
                }
                None => {
                    let mut doc = Document::new(id.clone(), fields);
                    doc.updated_at = Some(updated_at);
                    table.insert(id.clone(), Entry { seq, doc });
                    ChangeKind::Added
                }
            }
        };

        self.feed.publish(collection, id, kind);
        Ok(())
    }

    async fn delete(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<(), DocumentStoreError> {
        let removed = {
            let mut tables = self.tables.write().await;
            tables
                .collections
                .get_mut(&collection)
                .and_then(|c| c.remove(id))
                .is_some()
        };

        if removed {
            self.feed.publish(collection, id, ChangeKind::Removed);
        }
        Ok(())
    }

    fn changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.feed.subscribe()
    }
}
