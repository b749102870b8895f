use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::modules::portfolio::application::domain::entities::{PortfolioEntity, Record};
use crate::shared::validation::ValidationErrors;
use crate::modules::store::application::domain::entities::{Document, DocumentId, Fields};
use crate::modules::store::application::ports::outgoing::DocumentStoreError;
use crate::modules::store::application::CollectionClient;

const DEFAULT_DELETE_TTL_SECS: i64 = 300;

//
// ──────────────────────────────────────────────────────────
// State
// ──────────────────────────────────────────────────────────
//

/// What the list is doing right now, for display. Deletes win over
/// submissions, submissions over loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListPhase {
    Idle,
    Loading,
    Submitting,
    Deleting,
}

/// Confirmation token for a pending delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTicket {
    pub ticket: String,
    pub id: DocumentId,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStatus {
    pub phase: ListPhase,
    pub loaded: bool,
    pub items: usize,
    pub pending_delete: Option<DeleteTicket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub before: usize,
    pub after: usize,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ManagerError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Item not found: {0}")]
    NotFound(DocumentId),

    /// Only reported by a reconcile that found another fetch running.
    #[error("Another operation is in progress ({0:?})")]
    Busy(ListPhase),

    #[error("No delete is awaiting confirmation")]
    NoPendingDelete,

    #[error("Delete ticket does not match the pending delete")]
    TicketMismatch,

    #[error("Delete ticket has expired")]
    TicketExpired,

    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<ValidationErrors> for ManagerError {
    fn from(errors: ValidationErrors) -> Self {
        ManagerError::Validation(errors)
    }
}

fn backend(e: DocumentStoreError) -> ManagerError {
    ManagerError::Backend(e.to_string())
}

/// A cache change made while a fetch was in flight.
enum Landed<E> {
    Created(Record<E>),
    Patched(DocumentId, Fields),
    Removed(DocumentId),
}

/// Counts one in-flight operation until dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(count: &'a AtomicUsize) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        Self(count)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

//
// ──────────────────────────────────────────────────────────
// OptimisticList
// ──────────────────────────────────────────────────────────
//

/// Local cache of one collection, edited in step with the backend.
///
/// Writes touch the cache only after the backend accepted them, so a failed
/// call leaves the cache as it was. The cache can still drift from the
/// backend (writes from elsewhere); [`OptimisticList::reconcile`] re-reads it.
///
/// Operations do not wait on each other. A fetch swaps its result in under
/// the cache lock and replays any writes that landed while it was running,
/// so a reload never drops a concurrent create, update or delete.
pub struct OptimisticList<E: PortfolioEntity> {
    client: CollectionClient,
    cache: RwLock<Vec<Record<E>>>,
    loaded: AtomicBool,
    /// Held by the one fetch allowed at a time.
    fetch: AsyncMutex<()>,
    /// `Some` while a fetch runs. Pushed to with the cache write lock held.
    landed: Mutex<Option<Vec<Landed<E>>>>,
    loads: AtomicUsize,
    submits: AtomicUsize,
    deletes: AtomicUsize,
    pending_delete: Mutex<Option<DeleteTicket>>,
    delete_ttl: Duration,
}

impl<E: PortfolioEntity> OptimisticList<E> {
    pub fn new(client: CollectionClient) -> Self {
        Self {
            client,
            cache: RwLock::new(Vec::new()),
            loaded: AtomicBool::new(false),
            fetch: AsyncMutex::new(()),
            landed: Mutex::new(None),
            loads: AtomicUsize::new(0),
            submits: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            pending_delete: Mutex::new(None),
            delete_ttl: Duration::seconds(DEFAULT_DELETE_TTL_SECS),
        }
    }

    pub fn with_delete_ttl(mut self, ttl: Duration) -> Self {
        self.delete_ttl = ttl;
        self
    }

    pub fn client(&self) -> &CollectionClient {
        &self.client
    }

    pub fn phase(&self) -> ListPhase {
        if self.deletes.load(Ordering::SeqCst) > 0 {
            ListPhase::Deleting
        } else if self.submits.load(Ordering::SeqCst) > 0 {
            ListPhase::Submitting
        } else if self.loads.load(Ordering::SeqCst) > 0 {
            ListPhase::Loading
        } else {
            ListPhase::Idle
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    pub async fn status(&self) -> ListStatus {
        let pending_delete = self.pending().clone();
        ListStatus {
            phase: self.phase(),
            loaded: self.is_loaded(),
            items: self.cache.read().await.len(),
            pending_delete,
        }
    }

    pub async fn items(&self) -> Vec<Record<E>> {
        self.cache.read().await.clone()
    }

    pub async fn find(&self, id: &DocumentId) -> Option<Record<E>> {
        self.cache.read().await.iter().find(|r| &r.id == id).cloned()
    }

    fn pending(&self) -> MutexGuard<'_, Option<DeleteTicket>> {
        self.pending_delete.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn journal(&self) -> MutexGuard<'_, Option<Vec<Landed<E>>>> {
        self.landed.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Call with the cache write lock held.
    fn note(&self, change: Landed<E>) {
        if let Some(journal) = self.journal().as_mut() {
            journal.push(change);
        }
    }

    fn decode(docs: Vec<Document>) -> Vec<Record<E>> {
        docs.into_iter()
            .filter_map(|doc| {
                let id = doc.id.clone();
                match Record::<E>::from_document(doc) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!("Skipping undecodable {} {}: {}", E::LABEL, id, e);
                        None
                    }
                }
            })
            .collect()
    }

    fn replay(records: &mut Vec<Record<E>>, landed: Vec<Landed<E>>) {
        for change in landed {
            match change {
                Landed::Created(record) => {
                    if !records.iter().any(|r| r.id == record.id) {
                        records.insert(0, record);
                    }
                }
                Landed::Patched(id, fields) => {
                    if let Some(record) = records.iter_mut().find(|r| r.id == id) {
                        if let Err(e) = record.merge(fields) {
                            warn!("Could not replay patch of {} {}: {}", E::LABEL, id, e);
                        }
                    }
                }
                Landed::Removed(id) => records.retain(|r| r.id != id),
            }
        }
    }

    // ──────────────────────────────────────────────────────────
    // Loading
    // ──────────────────────────────────────────────────────────

    /// Fetches the collection and swaps it into the cache. Caller holds
    /// `self.fetch`. On failure the cache is kept.
    async fn refresh(&self) -> Result<ReconcileReport, ManagerError> {
        let _loading = InFlight::enter(&self.loads);
        *self.journal() = Some(Vec::new());

        let fetched = self.client.try_get_all().await;

        let mut cache = self.cache.write().await;
        let landed = self.journal().take().unwrap_or_default();
        let mut records = Self::decode(fetched.map_err(backend)?);
        Self::replay(&mut records, landed);

        let report = ReconcileReport {
            before: cache.len(),
            after: records.len(),
        };
        *cache = records;
        self.loaded.store(true, Ordering::Release);
        Ok(report)
    }

    /// Replaces the cache with the backend's current contents. Waits for a
    /// fetch already in flight, then fetches again.
    pub async fn load(&self) -> Result<usize, ManagerError> {
        let _fetch = self.fetch.lock().await;
        let report = self.refresh().await?;
        debug!("Loaded {} {} records", report.after, E::LABEL);
        Ok(report.after)
    }

    /// Loads once. Callers arriving during the first fetch wait for it.
    pub async fn ensure_loaded(&self) -> Result<(), ManagerError> {
        if self.is_loaded() {
            return Ok(());
        }
        let _fetch = self.fetch.lock().await;
        if self.is_loaded() {
            return Ok(());
        }
        self.refresh().await.map(|_| ())
    }

    /// Explicit reconciliation pass. On fetch failure the cache is kept.
    /// Returns `None` when another fetch was running and the pass was skipped.
    pub async fn reconcile(&self) -> Result<Option<ReconcileReport>, ManagerError> {
        let Ok(_fetch) = self.fetch.try_lock() else {
            return Ok(None);
        };

        let report = self.refresh().await?;
        if report.before != report.after {
            info!(
                "Reconciled {} cache: {} -> {} items",
                E::LABEL,
                report.before,
                report.after
            );
        }
        Ok(Some(report))
    }

    // ──────────────────────────────────────────────────────────
    // Writes
    // ──────────────────────────────────────────────────────────

    pub async fn create(&self, form: E::Form) -> Result<Record<E>, ManagerError> {
        let entity = E::from_form(form)?;
        self.create_entity(entity).await
    }

    /// Adds an already-built entity and prepends it to the cache.
    pub async fn create_entity(&self, entity: E) -> Result<Record<E>, ManagerError> {
        self.insert_via(&self.client, entity).await
    }

    /// Like [`create_entity`](Self::create_entity) but posts no notification.
    /// For bulk inserts that announce one summary instead.
    pub async fn import_entity(&self, entity: E) -> Result<Record<E>, ManagerError> {
        self.insert_via(&self.client.quiet(), entity).await
    }

    async fn insert_via(
        &self,
        client: &CollectionClient,
        entity: E,
    ) -> Result<Record<E>, ManagerError> {
        entity.validate()?;
        let _submitting = InFlight::enter(&self.submits);

        let id = client.try_add(entity.to_fields()).await.map_err(backend)?;

        let record = Record::new(id, entity);
        let mut cache = self.cache.write().await;
        cache.insert(0, record.clone());
        self.note(Landed::Created(record.clone()));
        Ok(record)
    }

    pub async fn update(&self, id: &DocumentId, form: E::Form) -> Result<Record<E>, ManagerError> {
        let entity = E::from_form(form)?;
        let fields = entity.to_fields();

        let _submitting = InFlight::enter(&self.submits);
        self.write_fields(id, fields.clone()).await?;

        Ok(self
            .patch_cached(id, fields)
            .await
            .unwrap_or_else(|| Record::new(id.clone(), entity)))
    }

    /// Merges raw fields into the stored document and the cached copy.
    pub async fn patch(&self, id: &DocumentId, fields: Fields) -> Result<(), ManagerError> {
        let _submitting = InFlight::enter(&self.submits);
        self.write_fields(id, fields.clone()).await?;
        self.patch_cached(id, fields).await;
        Ok(())
    }

    /// Applies `fields` to the cached record only. Returns the updated record
    /// when the id is cached.
    pub async fn apply_local_patch(&self, id: &DocumentId, fields: Fields) -> Option<Record<E>> {
        self.patch_cached(id, fields).await
    }

    async fn write_fields(&self, id: &DocumentId, fields: Fields) -> Result<(), ManagerError> {
        self.client
            .try_update(id, fields)
            .await
            .map_err(|e| match e {
                DocumentStoreError::NotFound => ManagerError::NotFound(id.clone()),
                other => backend(other),
            })
    }

    async fn patch_cached(&self, id: &DocumentId, fields: Fields) -> Option<Record<E>> {
        let mut cache = self.cache.write().await;
        self.note(Landed::Patched(id.clone(), fields.clone()));
        let record = cache.iter_mut().find(|r| &r.id == id)?;

        if let Err(e) = record.merge(fields) {
            warn!("Could not patch cached {} {}: {}", E::LABEL, id, e);
            return None;
        }
        record.updated_at = Some(Utc::now());
        Some(record.clone())
    }

    // ──────────────────────────────────────────────────────────
    // Deletes
    // ──────────────────────────────────────────────────────────

    /// Starts the confirm step for `id`. A newer request replaces an older one.
    pub async fn request_delete(&self, id: &DocumentId) -> Result<DeleteTicket, ManagerError> {
        if self.find(id).await.is_none() {
            return Err(ManagerError::NotFound(id.clone()));
        }

        let ticket = DeleteTicket {
            ticket: Uuid::new_v4().to_string(),
            id: id.clone(),
            expires_at: Utc::now() + self.delete_ttl,
        };
        *self.pending() = Some(ticket.clone());
        Ok(ticket)
    }

    pub fn cancel_delete(&self, ticket: &str) -> Result<(), ManagerError> {
        let mut pending = self.pending();
        let matches = match pending.as_ref() {
            None => return Err(ManagerError::NoPendingDelete),
            Some(p) => p.ticket == ticket,
        };
        if !matches {
            return Err(ManagerError::TicketMismatch);
        }
        *pending = None;
        Ok(())
    }

    /// Checks `ticket` against the pending delete and takes it. A mismatch
    /// leaves the pending delete in place; an expired ticket is dropped.
    fn take_ticket(&self, ticket: &str) -> Result<DocumentId, ManagerError> {
        let mut pending = self.pending();
        let current = pending.as_ref().ok_or(ManagerError::NoPendingDelete)?;
        if current.ticket != ticket {
            return Err(ManagerError::TicketMismatch);
        }
        if current.expires_at < Utc::now() {
            *pending = None;
            return Err(ManagerError::TicketExpired);
        }
        let id = current.id.clone();
        *pending = None;
        Ok(id)
    }

    /// Removes the item named by the pending ticket. Once the ticket checks
    /// out it is consumed, whether or not the backend call succeeds.
    pub async fn confirm_delete(&self, ticket: &str) -> Result<DocumentId, ManagerError> {
        let _deleting = InFlight::enter(&self.deletes);
        let id = self.take_ticket(ticket)?;

        self.client.try_remove(&id).await.map_err(backend)?;

        let mut cache = self.cache.write().await;
        cache.retain(|r| r.id != id);
        self.note(Landed::Removed(id.clone()));
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::portfolio::application::domain::entities::{
        Education, EducationForm, EducationKind, Project, ProjectForm,
    };
    use crate::modules::store::adapter::outgoing::{InMemoryDocumentStore, NotificationLog};
    use crate::modules::store::application::domain::entities::Collection;
    use crate::modules::store::application::ports::outgoing::DocumentStore;
    use crate::modules::store::application::RequestTracker;
    use crate::tests::support::flaky_store::FlakyStore;
    use serde_json::json;
    use std::sync::Arc;

    fn project_form(name: &str) -> ProjectForm {
        ProjectForm {
            name: name.to_string(),
            description: format!("{name} description"),
            tags: "rust, actix".to_string(),
            ..Default::default()
        }
    }

    fn list_over<E: PortfolioEntity>(store: Arc<dyn DocumentStore>) -> OptimisticList<E> {
        OptimisticList::new(CollectionClient::new(
            E::COLLECTION,
            store,
            Arc::new(NotificationLog::default()),
            RequestTracker::new(),
        ))
    }

    // ─────────────────────────────────────────────
    // create / update
    // ─────────────────────────────────────────────

    #[tokio::test]
    async fn create_prepends_after_backend_success() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let list = list_over::<Project>(store.clone());

        list.create(project_form("First")).await.unwrap();
        let second = list.create(project_form("Second")).await.unwrap();

        let items = list.items().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, second.id);
        assert_eq!(items[0].data.tags.len(), 2);
        assert!(store
            .get(Collection::Projects, &second.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn education_entry_lands_with_generated_id() {
        let flaky = Arc::new(FlakyStore::new());
        let list = list_over::<Education>(flaky.clone());

        list.create(EducationForm {
            institution: "MIT".into(),
            degree: "BSc".into(),
            year: "2020-2024".into(),
            kind: Some("education".into()),
            description: String::new(),
        })
        .await
        .unwrap();

        let items = list.items().await;
        assert_eq!(items.len(), 1);
        let entry = &items[0];
        assert!(!entry.id.as_str().is_empty());
        assert_eq!(entry.data.institution, "MIT");
        assert_eq!(entry.data.degree, "BSc");
        assert_eq!(entry.data.year, "2020-2024");
        assert_eq!(entry.data.kind, EducationKind::Education);
        assert_eq!(entry.data.description, "");
        assert_eq!(flaky.write_count(), 1);

        let stored = flaky
            .get(Collection::Education, &entry.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.field_str("type"), Some("education"));
    }

    #[tokio::test]
    async fn invalid_form_makes_no_backend_call() {
        let flaky = Arc::new(FlakyStore::new());
        let list = list_over::<Project>(flaky.clone());

        let err = list.create(ProjectForm::default()).await.unwrap_err();

        assert!(matches!(err, ManagerError::Validation(_)));
        assert_eq!(flaky.write_count(), 0);
    }

    #[tokio::test]
    async fn failed_create_leaves_cache_untouched() {
        let flaky = Arc::new(FlakyStore::new());
        flaky.fail_writes(true);
        let list = list_over::<Project>(flaky);

        let err = list.create(project_form("X")).await.unwrap_err();

        assert!(matches!(err, ManagerError::Backend(_)));
        assert!(list.items().await.is_empty());
        assert_eq!(list.phase(), ListPhase::Idle);
    }

    #[tokio::test]
    async fn update_merges_into_cached_item_only_on_success() {
        let flaky = Arc::new(FlakyStore::new());
        let list = list_over::<Education>(flaky.clone());
        let created = list
            .create(EducationForm {
                institution: "Uni".into(),
                degree: "BSc".into(),
                year: "2020".into(),
                kind: None,
                description: "old".into(),
            })
            .await
            .unwrap();

        let form = || EducationForm {
            institution: "Uni".into(),
            degree: "MSc".into(),
            year: "2023".into(),
            kind: Some("education".into()),
            description: "new".into(),
        };

        flaky.fail_writes(true);
        assert!(list.update(&created.id, form()).await.is_err());
        assert_eq!(list.find(&created.id).await.unwrap().data.degree, "BSc");

        flaky.fail_writes(false);
        let updated = list.update(&created.id, form()).await.unwrap();
        assert_eq!(updated.data.degree, "MSc");
        assert_eq!(list.find(&created.id).await.unwrap().data.description, "new");
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let list = list_over::<Project>(store);

        let err = list
            .update(&DocumentId::from("ghost"), project_form("X"))
            .await
            .unwrap_err();

        assert_eq!(err, ManagerError::NotFound(DocumentId::from("ghost")));
    }

    // ─────────────────────────────────────────────
    // delete confirmation
    // ─────────────────────────────────────────────

    #[tokio::test]
    async fn confirmed_delete_removes_item() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let list = list_over::<Project>(store.clone());
        let record = list.create(project_form("Doomed")).await.unwrap();

        let ticket = list.request_delete(&record.id).await.unwrap();
        assert_eq!(list.status().await.pending_delete, Some(ticket.clone()));

        let removed = list.confirm_delete(&ticket.ticket).await.unwrap();

        assert_eq!(removed, record.id);
        assert!(list.items().await.is_empty());
        assert!(store
            .get(Collection::Projects, &record.id)
            .await
            .unwrap()
            .is_none());
        assert!(list.status().await.pending_delete.is_none());
    }

    #[tokio::test]
    async fn cancelled_delete_cannot_be_confirmed() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let list = list_over::<Project>(store);
        let record = list.create(project_form("Kept")).await.unwrap();

        let ticket = list.request_delete(&record.id).await.unwrap();
        list.cancel_delete(&ticket.ticket).unwrap();

        assert_eq!(
            list.confirm_delete(&ticket.ticket).await,
            Err(ManagerError::NoPendingDelete)
        );
        assert_eq!(list.items().await.len(), 1);
    }

    #[tokio::test]
    async fn newer_request_supersedes_older_ticket() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let list = list_over::<Project>(store);
        let a = list.create(project_form("A")).await.unwrap();
        let b = list.create(project_form("B")).await.unwrap();

        let first = list.request_delete(&a.id).await.unwrap();
        let _second = list.request_delete(&b.id).await.unwrap();

        assert_eq!(
            list.confirm_delete(&first.ticket).await,
            Err(ManagerError::TicketMismatch)
        );
    }

    #[tokio::test]
    async fn expired_ticket_is_rejected() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let list = list_over::<Project>(store).with_delete_ttl(Duration::seconds(-1));
        let record = list.create(project_form("A")).await.unwrap();

        let ticket = list.request_delete(&record.id).await.unwrap();

        assert_eq!(
            list.confirm_delete(&ticket.ticket).await,
            Err(ManagerError::TicketExpired)
        );
        assert_eq!(list.items().await.len(), 1);
    }

    #[tokio::test]
    async fn failed_delete_keeps_item() {
        let flaky = Arc::new(FlakyStore::new());
        let list = list_over::<Project>(flaky.clone());
        let record = list.create(project_form("A")).await.unwrap();
        let ticket = list.request_delete(&record.id).await.unwrap();

        flaky.fail_writes(true);
        let err = list.confirm_delete(&ticket.ticket).await.unwrap_err();

        assert!(matches!(err, ManagerError::Backend(_)));
        assert_eq!(list.items().await.len(), 1);
    }

    // ─────────────────────────────────────────────
    // load / reconcile
    // ─────────────────────────────────────────────

    #[tokio::test]
    async fn reconcile_picks_up_writes_made_elsewhere() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let list = list_over::<Project>(store.clone());
        list.load().await.unwrap();

        store
            .insert(
                Collection::Projects,
                json!({"name": "External", "description": "d"})
                    .as_object()
                    .cloned()
                    .unwrap(),
                Utc::now(),
            )
            .await
            .unwrap();
        assert!(list.items().await.is_empty());

        let report = list.reconcile().await.unwrap().unwrap();

        assert_eq!(report, ReconcileReport { before: 0, after: 1 });
        assert_eq!(list.items().await[0].data.name, "External");
    }

    #[tokio::test]
    async fn reconcile_failure_keeps_cache() {
        let flaky = Arc::new(FlakyStore::new());
        let list = list_over::<Project>(flaky.clone());
        list.create(project_form("Cached")).await.unwrap();

        flaky.fail_lists(true);
        assert!(list.reconcile().await.is_err());

        assert_eq!(list.items().await.len(), 1);
    }

    #[tokio::test]
    async fn writes_proceed_while_reconcile_is_fetching() {
        let flaky = Arc::new(FlakyStore::new());
        let list = Arc::new(list_over::<Project>(flaky.clone()));
        let kept = list.create(project_form("Kept")).await.unwrap();
        flaky.delay_lists(std::time::Duration::from_millis(300));

        let reconcile = {
            let list = Arc::clone(&list);
            tokio::spawn(async move { list.reconcile().await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(list.phase(), ListPhase::Loading);

        // The fetch already read its snapshot; these land after it.
        let created = list.create(project_form("During")).await.unwrap();
        list.patch(
            &kept.id,
            json!({"name": "Kept v2"}).as_object().cloned().unwrap(),
        )
        .await
        .unwrap();

        let report = reconcile.await.unwrap().unwrap().unwrap();
        assert_eq!(report.after, 2);

        let items = list.items().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, created.id);
        assert_eq!(list.find(&kept.id).await.unwrap().data.name, "Kept v2");
        assert_eq!(list.phase(), ListPhase::Idle);
    }

    #[tokio::test]
    async fn delete_during_reconcile_is_not_resurrected() {
        let flaky = Arc::new(FlakyStore::new());
        let list = Arc::new(list_over::<Project>(flaky.clone()));
        let doomed = list.create(project_form("Doomed")).await.unwrap();
        flaky.delay_lists(std::time::Duration::from_millis(300));

        let reconcile = {
            let list = Arc::clone(&list);
            tokio::spawn(async move { list.reconcile().await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let ticket = list.request_delete(&doomed.id).await.unwrap();
        list.confirm_delete(&ticket.ticket).await.unwrap();

        reconcile.await.unwrap().unwrap();
        assert!(list.items().await.is_empty());
    }

    #[tokio::test]
    async fn back_to_back_submissions_both_land() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let list = list_over::<Project>(store);

        let (a, b) = tokio::join!(list.create(project_form("A")), list.create(project_form("B")));

        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(list.items().await.len(), 2);
    }

    #[tokio::test]
    async fn only_a_second_fetch_is_turned_away() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let list = list_over::<Project>(store);
        let record = list.create(project_form("A")).await.unwrap();
        let ticket = list.request_delete(&record.id).await.unwrap();

        let fetching = list.fetch.lock().await;
        assert_eq!(list.reconcile().await, Ok(None));

        // Deletes do not wait on the fetch, and a wrong ticket keeps the real one.
        assert_eq!(
            list.confirm_delete("wrong").await,
            Err(ManagerError::TicketMismatch)
        );
        assert_eq!(list.confirm_delete(&ticket.ticket).await, Ok(record.id));
        drop(fetching);

        assert!(list.items().await.is_empty());
        assert_eq!(list.phase(), ListPhase::Idle);
    }

    #[tokio::test]
    async fn load_waits_for_a_running_fetch() {
        let flaky = Arc::new(FlakyStore::new());
        let list = Arc::new(list_over::<Project>(flaky.clone()));
        flaky.delay_lists(std::time::Duration::from_millis(100));

        let first = {
            let list = Arc::clone(&list);
            tokio::spawn(async move { list.ensure_loaded().await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert_eq!(list.ensure_loaded().await, Ok(()));
        assert!(list.is_loaded());
        first.await.unwrap().unwrap();
        assert_eq!(flaky.list_count(), 1);
    }
}
