use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::modules::store::application::domain::entities::{
    ChangeEvent, Collection, Document, DocumentId,
};
use crate::modules::store::application::ports::outgoing::DocumentStore;

/// Handle to a live listener on the change feed.
///
/// The listener task runs until [`Subscription::stop`] is called or the
/// handle is dropped.
#[derive(Debug)]
pub struct Subscription {
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Delivers the full collection (newest first) now and after every
    /// change to it.
    pub async fn collection<F>(
        store: Arc<dyn DocumentStore>,
        collection: Collection,
        mut on_change: F,
    ) -> Self
    where
        F: FnMut(Vec<Document>) + Send + 'static,
    {
        // Subscribe before the first read so no change slips in between.
        let mut changes = store.changes();

        match store.list(collection).await {
            Ok(docs) => on_change(docs),
            Err(e) => warn!("Initial snapshot of {} failed: {}", collection, e),
        }

        let handle = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(event) if event.collection == collection => {}
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("Subscription on {} lagged by {} events", collection, skipped);
                    }
                    Err(RecvError::Closed) => break,
                }

                match store.list(collection).await {
                    Ok(docs) => on_change(docs),
                    Err(e) => warn!("Snapshot of {} failed: {}", collection, e),
                }
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    /// Delivers the single document stored under `id` (or `None` when it is
    /// absent) now and after every change to it.
    pub async fn document<F>(
        store: Arc<dyn DocumentStore>,
        collection: Collection,
        id: DocumentId,
        mut on_change: F,
    ) -> Self
    where
        F: FnMut(Option<Document>) + Send + 'static,
    {
        let mut changes = store.changes();

        match store.get(collection, &id).await {
            Ok(doc) => on_change(doc),
            Err(e) => warn!("Initial read of {}/{} failed: {}", collection, id, e),
        }

        let handle = tokio::spawn(async move {
            let concerns = |event: &ChangeEvent| event.collection == collection && event.id == id;

            loop {
                match changes.recv().await {
                    Ok(event) if concerns(&event) => {}
                    Ok(_) => continue,
                    Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break,
                }

                match store.get(collection, &id).await {
                    Ok(doc) => on_change(doc),
                    Err(e) => warn!("Read of {}/{} failed: {}", collection, id, e),
                }
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Releases the listener. Calling it twice is a no-op.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop();
    }
}
