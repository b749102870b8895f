use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use crate::modules::portfolio::application::domain::entities::{SkillCategoryForm, SkillForm};
use crate::modules::portfolio::application::managers::PortfolioManagers;
use crate::modules::portfolio::application::seed;
use crate::modules::store::application::ports::outgoing::{NotificationLevel, Notifier};
use crate::modules::store::application::CollectionClient;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub projects: usize,
    pub experience: usize,
    pub education: usize,
    pub skills: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub projects: usize,
    pub experience: usize,
    pub education: usize,
    pub skills: usize,
    pub categories: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetReport {
    pub removed: usize,
    pub failed: usize,
}

/// Admin overview: counts, sample data, wipe.
pub struct DashboardService {
    managers: Arc<PortfolioManagers>,
    notifier: Arc<dyn Notifier>,
}

impl DashboardService {
    pub fn new(managers: Arc<PortfolioManagers>, notifier: Arc<dyn Notifier>) -> Self {
        Self { managers, notifier }
    }

    fn clients(&self) -> [&CollectionClient; 4] {
        [
            self.managers.projects.client(),
            self.managers.experience.client(),
            self.managers.education.client(),
            self.managers.skills.skills().client(),
        ]
    }

    /// Fresh counts. A collection that fails to load counts as zero.
    pub async fn stats(&self) -> DashboardStats {
        let [projects, experience, education, skills] = self.clients();
        let (p, e, ed, s) = tokio::join!(
            projects.get_all(),
            experience.get_all(),
            education.get_all(),
            skills.get_all()
        );

        DashboardStats {
            projects: p.len(),
            experience: e.len(),
            education: ed.len(),
            skills: s.len(),
        }
    }

    /// Inserts the sample content one record at a time, continuing past
    /// individual failures. Only the summary is announced.
    pub async fn seed(&self) -> SeedReport {
        let mut report = SeedReport::default();

        for project in seed::projects() {
            tally(
                self.managers.projects.import_entity(project).await.is_ok(),
                &mut report.projects,
                &mut report.failed,
            );
        }
        for experience in seed::experiences() {
            tally(
                self.managers.experience.import_entity(experience).await.is_ok(),
                &mut report.experience,
                &mut report.failed,
            );
        }
        for education in seed::educations() {
            tally(
                self.managers.education.import_entity(education).await.is_ok(),
                &mut report.education,
                &mut report.failed,
            );
        }

        let skills = &self.managers.skills;
        for category in seed::SKILL_CATEGORIES {
            let added = skills
                .import_category(SkillCategoryForm {
                    name: category.title.to_string(),
                })
                .await;
            match added {
                Ok(outcome) if outcome.created => report.categories += 1,
                Ok(_) => {}
                Err(_) => report.failed += 1,
            }

            for (name, icon) in category.technologies {
                let form = SkillForm {
                    name: name.to_string(),
                    category: category.title.to_string(),
                    icon: icon.to_string(),
                    description: seed::skill_description(name),
                };
                tally(
                    skills.import_skill(form).await.is_ok(),
                    &mut report.skills,
                    &mut report.failed,
                );
            }
        }

        if report.failed == 0 {
            info!("Seeded sample data: {:?}", report);
            self.notifier.notify(
                NotificationLevel::Success,
                "Database seeded successfully!".to_string(),
            );
        } else {
            error!("Seeding finished with {} failures", report.failed);
            self.notifier
                .notify(NotificationLevel::Error, "Error seeding data".to_string());
        }
        report
    }

    /// Removes every project, experience, education and skill, one call per
    /// document. Skill categories are kept.
    pub async fn reset(&self) -> ResetReport {
        let mut report = ResetReport::default();

        for client in self.clients() {
            let client = client.quiet();
            let Some(docs) = client.get_all_checked().await else {
                report.failed += 1;
                continue;
            };
            for doc in docs {
                tally(
                    client.remove(&doc.id).await,
                    &mut report.removed,
                    &mut report.failed,
                );
            }
        }

        self.managers.reconcile_all().await;

        if report.failed == 0 {
            info!("Reset removed {} documents", report.removed);
            self.notifier.notify(
                NotificationLevel::Success,
                "All data has been reset successfully!".to_string(),
            );
        } else {
            error!("Reset finished with {} failures", report.failed);
            self.notifier
                .notify(NotificationLevel::Error, "Error resetting data".to_string());
        }
        report
    }
}

fn tally(ok: bool, succeeded: &mut usize, failed: &mut usize) {
    if ok {
        *succeeded += 1;
    } else {
        *failed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::store::adapter::outgoing::{InMemoryDocumentStore, NotificationLog};
    use crate::modules::store::application::domain::entities::Collection;
    use crate::modules::store::application::ports::outgoing::DocumentStore;
    use crate::modules::store::application::RequestTracker;
    use crate::tests::support::flaky_store::FlakyStore;

    fn dashboard(store: Arc<dyn DocumentStore>) -> (DashboardService, Arc<NotificationLog>) {
        let log = Arc::new(NotificationLog::default());
        let managers = Arc::new(PortfolioManagers::new(
            store,
            log.clone(),
            RequestTracker::new(),
        ));
        (DashboardService::new(managers, log.clone()), log)
    }

    #[tokio::test]
    async fn seed_then_stats_counts_sample_content() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let (dashboard, log) = dashboard(store.clone());

        let report = dashboard.seed().await;

        assert_eq!(report.failed, 0);
        assert_eq!(report.categories, 5);
        assert_eq!(
            dashboard.stats().await,
            DashboardStats {
                projects: 2,
                experience: 4,
                education: 2,
                skills: 17,
            }
        );
        // One summary, not one notification per inserted record.
        let notes = log.recent(100);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message, "Database seeded successfully!");

        let python = store
            .list(Collection::Skills)
            .await
            .unwrap()
            .into_iter()
            .find(|d| d.field_str("name") == Some("Python"))
            .unwrap();
        assert_eq!(python.field_str("description"), Some("Proficient in Python"));
        assert_eq!(python.field_str("category"), Some("Programming Languages"));
    }

    #[tokio::test]
    async fn reset_removes_content_but_keeps_categories() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let (dashboard, log) = dashboard(store.clone());
        dashboard.seed().await;

        let report = dashboard.reset().await;

        assert_eq!(report.removed, 25);
        assert_eq!(report.failed, 0);
        assert_eq!(dashboard.stats().await, DashboardStats::default());
        assert_eq!(store.list(Collection::SkillCategories).await.unwrap().len(), 5);
        let notes = log.recent(100);
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[1].message, "All data has been reset successfully!");
    }

    #[tokio::test]
    async fn stats_count_failed_collections_as_zero() {
        let flaky = Arc::new(FlakyStore::new());
        flaky.fail_lists(true);
        let (dashboard, _) = dashboard(flaky);

        assert_eq!(dashboard.stats().await, DashboardStats::default());
    }

    #[tokio::test]
    async fn seed_failures_are_counted_and_announced() {
        let flaky = Arc::new(FlakyStore::new());
        flaky.fail_writes(true);
        let (dashboard, log) = dashboard(flaky);

        let report = dashboard.seed().await;

        assert!(report.failed > 0);
        assert_eq!(report.projects, 0);
        assert_eq!(log.recent(1)[0].message, "Error seeding data");
    }
}
