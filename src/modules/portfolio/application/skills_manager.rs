use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::modules::portfolio::application::domain::entities::{
    PortfolioEntity, Record, Skill, SkillCategory, SkillCategoryForm, SkillForm,
};
use crate::shared::validation::ValidationErrors;
use crate::modules::portfolio::application::optimistic_list::{
    DeleteTicket, ManagerError, OptimisticList,
};
use crate::modules::store::application::domain::entities::{DocumentId, Fields};

/// What a category rename does when some skill updates fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CascadePolicy {
    /// Keep whatever succeeded and list what did not.
    #[default]
    Report,
    /// Undo the completed skill updates and the category rename.
    Rollback,
}

impl FromStr for CascadePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "report" => Ok(CascadePolicy::Report),
            "rollback" => Ok(CascadePolicy::Rollback),
            other => Err(format!("unknown cascade policy: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeFailure {
    /// The skill, or the category itself for a failed category rollback.
    pub id: DocumentId,
    pub error: String,
}

/// Outcome of one category rename, sub-update by sub-update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    pub category_id: DocumentId,
    pub old_name: String,
    pub new_name: String,
    pub policy: CascadePolicy,
    /// Skills now carrying `new_name`.
    pub updated: Vec<DocumentId>,
    pub failed: Vec<CascadeFailure>,
    pub rolled_back: bool,
    /// Compensating writes that themselves failed.
    pub rollback_failures: Vec<CascadeFailure>,
}

impl CascadeReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && !self.rolled_back
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOutcome {
    pub category: Record<SkillCategory>,
    /// `false` when an existing category with the same name was returned.
    pub created: bool,
}

/// Skills plus the category catalog they reference by name.
pub struct SkillsManager {
    skills: Arc<OptimisticList<Skill>>,
    categories: Arc<OptimisticList<SkillCategory>>,
}

impl SkillsManager {
    pub fn new(
        skills: Arc<OptimisticList<Skill>>,
        categories: Arc<OptimisticList<SkillCategory>>,
    ) -> Self {
        Self { skills, categories }
    }

    pub fn skills(&self) -> &Arc<OptimisticList<Skill>> {
        &self.skills
    }

    pub fn categories(&self) -> &Arc<OptimisticList<SkillCategory>> {
        &self.categories
    }

    async fn find_category_by_name(&self, name: &str) -> Option<Record<SkillCategory>> {
        self.categories
            .items()
            .await
            .into_iter()
            .find(|c| c.data.name.eq_ignore_ascii_case(name.trim()))
    }

    /// An empty catalog accepts any category name. Otherwise the name must
    /// match an entry and is rewritten to the catalog's spelling.
    async fn canonical_category(&self, skill: &mut Skill) -> Result<(), ManagerError> {
        self.categories.ensure_loaded().await?;
        if self.categories.items().await.is_empty() {
            return Ok(());
        }

        match self.find_category_by_name(&skill.category).await {
            Some(category) => {
                skill.category = category.data.name;
                Ok(())
            }
            None => Err(ManagerError::Validation(ValidationErrors::single(
                "category",
                "category must be one of the configured skill categories",
            ))),
        }
    }

    // ──────────────────────────────────────────────────────────
    // Skills
    // ──────────────────────────────────────────────────────────

    pub async fn add_skill(&self, form: SkillForm) -> Result<Record<Skill>, ManagerError> {
        self.insert_skill(form, false).await
    }

    /// [`add_skill`](Self::add_skill) without the per-item notification.
    pub async fn import_skill(&self, form: SkillForm) -> Result<Record<Skill>, ManagerError> {
        self.insert_skill(form, true).await
    }

    async fn insert_skill(&self, form: SkillForm, quiet: bool) -> Result<Record<Skill>, ManagerError> {
        let mut skill = Skill::from_form(form)?;
        self.canonical_category(&mut skill).await?;
        if quiet {
            self.skills.import_entity(skill).await
        } else {
            self.skills.create_entity(skill).await
        }
    }

    pub async fn update_skill(
        &self,
        id: &DocumentId,
        form: SkillForm,
    ) -> Result<Record<Skill>, ManagerError> {
        let mut skill = Skill::from_form(form)?;
        self.canonical_category(&mut skill).await?;

        let fields = skill.to_fields();
        self.skills.patch(id, fields).await?;

        Ok(self
            .skills
            .find(id)
            .await
            .unwrap_or_else(|| Record::new(id.clone(), skill)))
    }

    // ──────────────────────────────────────────────────────────
    // Categories
    // ──────────────────────────────────────────────────────────

    /// Names are unique ignoring ASCII case. Adding a known name returns the
    /// existing entry without writing.
    pub async fn add_category(
        &self,
        form: SkillCategoryForm,
    ) -> Result<CategoryOutcome, ManagerError> {
        self.insert_category(form, false).await
    }

    pub async fn import_category(
        &self,
        form: SkillCategoryForm,
    ) -> Result<CategoryOutcome, ManagerError> {
        self.insert_category(form, true).await
    }

    async fn insert_category(
        &self,
        form: SkillCategoryForm,
        quiet: bool,
    ) -> Result<CategoryOutcome, ManagerError> {
        let category = SkillCategory::from_form(form)?;
        self.categories.ensure_loaded().await?;

        if let Some(existing) = self.find_category_by_name(&category.name).await {
            return Ok(CategoryOutcome {
                category: existing,
                created: false,
            });
        }

        let record = if quiet {
            self.categories.import_entity(category).await?
        } else {
            self.categories.create_entity(category).await?
        };
        Ok(CategoryOutcome {
            category: record,
            created: true,
        })
    }

    /// First half of a category delete. The ticket must be passed back to
    /// [`confirm_category_delete`](Self::confirm_category_delete).
    pub async fn request_category_delete(
        &self,
        id: &DocumentId,
    ) -> Result<DeleteTicket, ManagerError> {
        self.categories.ensure_loaded().await?;
        self.categories.request_delete(id).await
    }

    /// Removes the category only. Skills keep the now-stale name.
    pub async fn confirm_category_delete(
        &self,
        id: &DocumentId,
        ticket: &str,
    ) -> Result<DocumentId, ManagerError> {
        if let Some(pending) = self.categories.status().await.pending_delete {
            if pending.ticket == ticket && &pending.id != id {
                return Err(ManagerError::TicketMismatch);
            }
        }
        self.categories.confirm_delete(ticket).await
    }

    /// Renames a category and every skill that references its old name.
    ///
    /// Runs as a saga: the category write first, then one write per skill.
    /// There is no transaction; `policy` decides what happens to completed
    /// writes when some skill updates fail.
    pub async fn rename_category(
        &self,
        id: &DocumentId,
        form: SkillCategoryForm,
        policy: CascadePolicy,
    ) -> Result<CascadeReport, ManagerError> {
        let renamed = SkillCategory::from_form(form)?;
        let new_name = renamed.name;

        self.categories.ensure_loaded().await?;
        let current = self
            .categories
            .find(id)
            .await
            .ok_or_else(|| ManagerError::NotFound(id.clone()))?;
        let old_name = current.data.name;

        if let Some(clash) = self.find_category_by_name(&new_name).await {
            if &clash.id != id {
                return Err(ManagerError::Validation(ValidationErrors::single(
                    "name",
                    "a category with this name already exists",
                )));
            }
        }

        let mut report = CascadeReport {
            category_id: id.clone(),
            old_name: old_name.clone(),
            new_name: new_name.clone(),
            policy,
            updated: Vec::new(),
            failed: Vec::new(),
            rolled_back: false,
            rollback_failures: Vec::new(),
        };

        if old_name == new_name {
            return Ok(report);
        }

        // Fresh read: the local skills cache may be stale.
        let affected: Vec<DocumentId> = self
            .skills
            .client()
            .try_get_all()
            .await
            .map_err(|e| ManagerError::Backend(e.to_string()))?
            .into_iter()
            .filter(|doc| doc.field_str("category") == Some(old_name.as_str()))
            .map(|doc| doc.id)
            .collect();

        self.categories
            .patch(id, name_fields("name", &new_name))
            .await?;

        for skill_id in affected {
            match self
                .skills
                .client()
                .try_update(&skill_id, name_fields("category", &new_name))
                .await
            {
                Ok(()) => report.updated.push(skill_id),
                Err(e) => report.failed.push(CascadeFailure {
                    id: skill_id,
                    error: e.to_string(),
                }),
            }
        }

        if !report.failed.is_empty() {
            error!(
                "Category rename {} -> {}: {} of {} skill updates failed",
                old_name,
                new_name,
                report.failed.len(),
                report.failed.len() + report.updated.len()
            );
            if policy == CascadePolicy::Rollback {
                self.roll_back(id, &mut report).await;
            }
        } else {
            info!(
                "Category rename {} -> {} updated {} skills",
                old_name,
                new_name,
                report.updated.len()
            );
        }

        // Mirror the surviving writes into the local skills cache.
        for skill_id in &report.updated {
            self.skills
                .apply_local_patch(skill_id, name_fields("category", &new_name))
                .await;
        }

        Ok(report)
    }

    async fn roll_back(&self, id: &DocumentId, report: &mut CascadeReport) {
        let old = report.old_name.clone();
        let mut still_renamed = Vec::new();

        for skill_id in std::mem::take(&mut report.updated) {
            if let Err(e) = self
                .skills
                .client()
                .try_update(&skill_id, name_fields("category", &old))
                .await
            {
                warn!("Rollback of skill {} failed: {}", skill_id, e);
                report.rollback_failures.push(CascadeFailure {
                    id: skill_id.clone(),
                    error: e.to_string(),
                });
                still_renamed.push(skill_id);
            }
        }

        if let Err(e) = self.categories.patch(id, name_fields("name", &old)).await {
            warn!("Rollback of category {} failed: {}", id, e);
            report.rollback_failures.push(CascadeFailure {
                id: id.clone(),
                error: e.to_string(),
            });
        }

        report.updated = still_renamed;
        report.rolled_back = true;
    }
}

fn name_fields(key: &str, value: &str) -> Fields {
    let mut fields = Fields::new();
    fields.insert(key.to_string(), json!(value));
    fields
}
