use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::modules::section::application::domain::entities::{
    ContentSource, ResolvedSection, SectionContent, SectionId,
};
use crate::modules::store::application::domain::entities::Collection;
use crate::modules::store::application::ports::outgoing::{
    DocumentStore, NotificationLevel, Notifier,
};
use crate::modules::store::application::{OperationKind, RequestTracker, Subscription};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SaveSectionError {
    #[error("Failed to save changes: {0}")]
    Backend(String),
}

/// Section text keyed by section id, with compiled-in defaults merged in
/// at read time.
pub struct SectionContentService {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
    requests: Arc<RequestTracker>,
}

impl SectionContentService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn Notifier>,
        requests: Arc<RequestTracker>,
    ) -> Self {
        Self {
            store,
            notifier,
            requests,
        }
    }

    /// Never fails. A backend error falls back to the default.
    pub async fn get(&self, section: SectionId) -> ResolvedSection {
        let request = self
            .requests
            .begin(Collection::SectionContents, OperationKind::Fetch);

        match self
            .store
            .get(Collection::SectionContents, &section.document_id())
            .await
        {
            Ok(doc) => {
                request.succeed();
                ResolvedSection::resolve(section, doc)
            }
            Err(e) => {
                warn!("Error fetching section {}: {}", section, e);
                request.fail(e.to_string());
                ResolvedSection::fallback(section)
            }
        }
    }

    pub async fn get_all(&self) -> Vec<ResolvedSection> {
        let mut sections = Vec::with_capacity(SectionId::ALL.len());
        for section in SectionId::ALL {
            sections.push(self.get(section).await);
        }
        sections
    }

    /// Overwrites the whole stored document for `section`.
    pub async fn save(
        &self,
        section: SectionId,
        content: SectionContent,
    ) -> Result<ResolvedSection, SaveSectionError> {
        let request = self
            .requests
            .begin(Collection::SectionContents, OperationKind::Update);
        let content = content.normalized();
        let now = Utc::now();

        match self
            .store
            .set(
                Collection::SectionContents,
                &section.document_id(),
                content.to_fields(),
                now,
            )
            .await
        {
            Ok(()) => {
                info!("Saved section {}", section);
                request.succeed();
                self.notifier.notify(
                    NotificationLevel::Success,
                    format!("{} updated successfully!", section.label()),
                );
                Ok(ResolvedSection {
                    section,
                    content,
                    source: ContentSource::Stored,
                    updated_at: Some(now),
                })
            }
            Err(e) => {
                error!("Error saving section {}: {}", section, e);
                request.fail(e.to_string());
                self.notifier.notify(
                    NotificationLevel::Error,
                    "Failed to save changes".to_string(),
                );
                Err(SaveSectionError::Backend(e.to_string()))
            }
        }
    }

    /// The compiled-in default, not persisted.
    pub fn reset_to_default(&self, section: SectionId) -> ResolvedSection {
        self.notifier.notify(
            NotificationLevel::Info,
            "Reset to defaults (not saved yet). Click Save to persist.".to_string(),
        );
        ResolvedSection::fallback(section)
    }

    /// Delivers the resolved section now and after every change to its
    /// document. Deleting the document reverts readers to the default.
    pub async fn watch<F>(&self, section: SectionId, mut on_change: F) -> Subscription
    where
        F: FnMut(ResolvedSection) + Send + 'static,
    {
        Subscription::document(
            Arc::clone(&self.store),
            Collection::SectionContents,
            section.document_id(),
            move |doc| on_change(ResolvedSection::resolve(section, doc)),
        )
        .await
    }
}
