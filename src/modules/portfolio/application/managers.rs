use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::modules::portfolio::application::domain::entities::{
    Education, Experience, PortfolioEntity, Project, Record, Skill, SkillCategory, SkillForm,
};
use crate::modules::portfolio::application::optimistic_list::{ManagerError, OptimisticList};
use crate::modules::portfolio::application::skills_manager::SkillsManager;
use crate::modules::store::application::domain::entities::{Collection, DocumentId};
use crate::modules::store::application::ports::outgoing::{DocumentStore, Notifier};
use crate::modules::store::application::{CollectionClient, RequestTracker};

/// One optimistic list per managed collection.
pub struct PortfolioManagers {
    pub projects: Arc<OptimisticList<Project>>,
    pub experience: Arc<OptimisticList<Experience>>,
    pub education: Arc<OptimisticList<Education>>,
    pub skills: Arc<SkillsManager>,
}

impl PortfolioManagers {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn Notifier>,
        requests: Arc<RequestTracker>,
    ) -> Self {
        fn list<E: PortfolioEntity>(
            store: &Arc<dyn DocumentStore>,
            notifier: &Arc<dyn Notifier>,
            requests: &Arc<RequestTracker>,
        ) -> Arc<OptimisticList<E>> {
            Arc::new(OptimisticList::new(CollectionClient::new(
                E::COLLECTION,
                Arc::clone(store),
                Arc::clone(notifier),
                Arc::clone(requests),
            )))
        }

        Self {
            projects: list(&store, &notifier, &requests),
            experience: list(&store, &notifier, &requests),
            education: list(&store, &notifier, &requests),
            skills: Arc::new(SkillsManager::new(
                list(&store, &notifier, &requests),
                list(&store, &notifier, &requests),
            )),
        }
    }

    /// The data-access client behind a managed collection.
    pub fn client_for(&self, collection: Collection) -> Option<&CollectionClient> {
        match collection {
            Collection::Projects => Some(self.projects.client()),
            Collection::Experience => Some(self.experience.client()),
            Collection::Education => Some(self.education.client()),
            Collection::Skills => Some(self.skills.skills().client()),
            Collection::SkillCategories => Some(self.skills.categories().client()),
            Collection::SectionContents => None,
        }
    }

    /// Cancels the pending delete holding `ticket`, whichever list owns it.
    pub fn cancel_delete(&self, ticket: &str) -> Result<(), ManagerError> {
        let outcomes = [
            self.projects.cancel_delete(ticket),
            self.experience.cancel_delete(ticket),
            self.education.cancel_delete(ticket),
            self.skills.skills().cancel_delete(ticket),
            self.skills.categories().cancel_delete(ticket),
        ];
        if outcomes.iter().any(Result::is_ok) {
            Ok(())
        } else {
            Err(ManagerError::NoPendingDelete)
        }
    }

    /// Reconciles every cache, logging rather than failing on errors.
    pub async fn reconcile_all(&self) {
        log_reconcile(Project::LABEL, self.projects.reconcile().await);
        log_reconcile(Experience::LABEL, self.experience.reconcile().await);
        log_reconcile(Education::LABEL, self.education.reconcile().await);
        log_reconcile(Skill::LABEL, self.skills.skills().reconcile().await);
        log_reconcile(
            SkillCategory::LABEL,
            self.skills.categories().reconcile().await,
        );
    }

    /// Background reconciliation. The first pass runs after one full interval.
    pub fn spawn_reconciler(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.reconcile_all().await;
            }
        })
    }
}

fn log_reconcile<T>(label: &str, outcome: Result<Option<T>, ManagerError>) {
    match outcome {
        Ok(Some(_)) => {}
        Ok(None) => info!("Skipped {} reconciliation: list busy", label),
        Err(e) => warn!("Reconciliation of {} failed: {}", label, e),
    }
}

//
// ──────────────────────────────────────────────────────────
// Per-entity dispatch for the generic admin routes
// ──────────────────────────────────────────────────────────
//

#[async_trait]
pub trait Manages<E: PortfolioEntity>: Send + Sync {
    fn list(&self) -> &OptimisticList<E>;

    async fn create(&self, form: E::Form) -> Result<Record<E>, ManagerError> {
        self.list().create(form).await
    }

    async fn update(&self, id: &DocumentId, form: E::Form) -> Result<Record<E>, ManagerError> {
        self.list().update(id, form).await
    }
}

impl Manages<Project> for PortfolioManagers {
    fn list(&self) -> &OptimisticList<Project> {
        &self.projects
    }
}

impl Manages<Experience> for PortfolioManagers {
    fn list(&self) -> &OptimisticList<Experience> {
        &self.experience
    }
}

impl Manages<Education> for PortfolioManagers {
    fn list(&self) -> &OptimisticList<Education> {
        &self.education
    }
}

#[async_trait]
impl Manages<Skill> for PortfolioManagers {
    fn list(&self) -> &OptimisticList<Skill> {
        self.skills.skills()
    }

    // Skills go through the catalog check.
    async fn create(&self, form: SkillForm) -> Result<Record<Skill>, ManagerError> {
        self.skills.add_skill(form).await
    }

    async fn update(
        &self,
        id: &DocumentId,
        form: SkillForm,
    ) -> Result<Record<Skill>, ManagerError> {
        self.skills.update_skill(id, form).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::portfolio::application::domain::entities::SkillCategoryForm;
    use crate::modules::store::adapter::outgoing::{InMemoryDocumentStore, NotificationLog};
    use chrono::Utc;
    use serde_json::json;

    fn managers(store: Arc<dyn DocumentStore>) -> PortfolioManagers {
        PortfolioManagers::new(
            store,
            Arc::new(NotificationLog::default()),
            RequestTracker::new(),
        )
    }

    #[tokio::test]
    async fn skill_dispatch_applies_catalog_rules() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let managers = managers(store);
        managers
            .skills
            .add_category(SkillCategoryForm {
                name: "Languages".into(),
            })
            .await
            .unwrap();

        let result = Manages::<Skill>::create(
            &managers,
            SkillForm {
                name: "Rust".into(),
                category: "Cooking".into(),
                ..Default::default()
            },
        )
        .await;

        assert!(matches!(result, Err(ManagerError::Validation(_))));
    }

    #[tokio::test]
    async fn reconcile_all_refreshes_every_cache() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let managers = managers(store.clone());

        for collection in [Collection::Projects, Collection::Skills] {
            store
                .insert(
                    collection,
                    json!({"name": "x", "description": "d", "category": "c"})
                        .as_object()
                        .cloned()
                        .unwrap(),
                    Utc::now(),
                )
                .await
                .unwrap();
        }

        managers.reconcile_all().await;

        assert_eq!(managers.projects.items().await.len(), 1);
        assert_eq!(managers.skills.skills().items().await.len(), 1);
        assert!(managers.experience.is_loaded());
    }

    #[tokio::test]
    async fn cancel_delete_finds_the_owning_list() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let managers = managers(store);
        let category = managers
            .skills
            .add_category(SkillCategoryForm {
                name: "Tools".into(),
            })
            .await
            .unwrap();
        let ticket = managers
            .skills
            .categories()
            .request_delete(&category.category.id)
            .await
            .unwrap();

        assert!(managers.cancel_delete(&ticket.ticket).is_ok());
        assert_eq!(
            managers.cancel_delete(&ticket.ticket),
            Err(ManagerError::NoPendingDelete)
        );
    }

    #[test]
    fn section_contents_have_no_managed_client() {
        let managers = managers(Arc::new(InMemoryDocumentStore::new()));

        assert!(managers.client_for(Collection::SectionContents).is_none());
        assert_eq!(
            managers
                .client_for(Collection::SkillCategories)
                .map(CollectionClient::collection),
            Some(Collection::SkillCategories)
        );
    }
}
