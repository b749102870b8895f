use tokio::sync::broadcast;
use tracing::trace;

use crate::modules::store::application::domain::entities::{
    ChangeEvent, ChangeKind, Collection, DocumentId,
};

const DEFAULT_CAPACITY: usize = 256;

/// In-process broadcast of committed writes. Lagging receivers re-read the
/// collection, so the buffer only bounds how often that happens.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ChangeFeed {
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, collection: Collection, id: &DocumentId, kind: ChangeKind) {
        let event = ChangeEvent {
            collection,
            id: id.clone(),
            kind,
        };
        // No receivers is fine.
        if self.sender.send(event).is_err() {
            trace!("No listeners for {} change on {}", collection, id);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }
}
