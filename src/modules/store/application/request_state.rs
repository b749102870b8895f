use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::modules::store::application::domain::entities::Collection;

const DEFAULT_HISTORY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Fetch,
    Add,
    Update,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "snake_case")]
pub enum RequestState {
    Pending,
    Succeeded,
    Failed(String),
    /// The guard was dropped before the outcome was recorded.
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatus {
    pub id: RequestId,
    pub collection: Collection,
    pub kind: OperationKind,
    #[serde(flatten)]
    pub state: RequestState,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Position in completion order; timestamps can tie.
    #[serde(skip)]
    finish_seq: u64,
}

/// Loading and error state tracked per request rather than per client, so
/// overlapping calls never clear each other's flags.
#[derive(Debug)]
pub struct RequestTracker {
    next_id: AtomicU64,
    finishes: AtomicU64,
    history: usize,
    requests: Mutex<BTreeMap<RequestId, RequestStatus>>,
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self::with_history(DEFAULT_HISTORY)
    }
}

impl RequestTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// `history` bounds how many finished requests are retained.
    pub fn with_history(history: usize) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            finishes: AtomicU64::new(1),
            history: history.max(1),
            requests: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn begin(self: &Arc<Self>, collection: Collection, kind: OperationKind) -> RequestGuard {
        let id = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let status = RequestStatus {
            id,
            collection,
            kind,
            state: RequestState::Pending,
            started_at: Utc::now(),
            finished_at: None,
            finish_seq: 0,
        };
        self.lock().insert(id, status);

        RequestGuard {
            tracker: Arc::clone(self),
            id,
            finished: false,
        }
    }

    pub fn is_loading(&self, collection: Collection, kind: OperationKind) -> bool {
        self.lock().values().any(|s| {
            s.collection == collection && s.kind == kind && s.state == RequestState::Pending
        })
    }

    pub fn is_any_loading(&self, collection: Collection) -> bool {
        self.lock()
            .values()
            .any(|s| s.collection == collection && s.state == RequestState::Pending)
    }

    /// Error of the most recently finished request of this kind, if it failed.
    pub fn last_error(&self, collection: Collection, kind: OperationKind) -> Option<String> {
        let requests = self.lock();
        let latest = requests
            .values()
            .filter(|s| s.collection == collection && s.kind == kind && s.finish_seq > 0)
            .max_by_key(|s| s.finish_seq)?;

        match &latest.state {
            RequestState::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    pub fn status(&self, id: RequestId) -> Option<RequestStatus> {
        self.lock().get(&id).cloned()
    }

    /// Newest first.
    pub fn snapshot(&self) -> Vec<RequestStatus> {
        self.lock().values().rev().cloned().collect()
    }

    fn finish(&self, id: RequestId, state: RequestState) {
        let mut requests = self.lock();
        if let Some(status) = requests.get_mut(&id) {
            status.state = state;
            status.finished_at = Some(Utc::now());
            status.finish_seq = self.finishes.fetch_add(1, Ordering::Relaxed);
        }

        let mut finished: Vec<(u64, RequestId)> = requests
            .values()
            .filter(|s| s.finish_seq > 0)
            .map(|s| (s.finish_seq, s.id))
            .collect();
        if finished.len() > self.history {
            finished.sort_unstable();
            for (_, stale) in &finished[..finished.len() - self.history] {
                requests.remove(stale);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<RequestId, RequestStatus>> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Marks one in-flight request. Dropping it unfinished records `Abandoned`.
#[derive(Debug)]
pub struct RequestGuard {
    tracker: Arc<RequestTracker>,
    id: RequestId,
    finished: bool,
}

impl RequestGuard {
    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn succeed(mut self) {
        self.finished = true;
        self.tracker.finish(self.id, RequestState::Succeeded);
    }

    pub fn fail(mut self, message: impl Into<String>) {
        self.finished = true;
        self.tracker
            .finish(self.id, RequestState::Failed(message.into()));
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.tracker.finish(self.id, RequestState::Abandoned);
        }
    }
}
