use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::validation::{is_http_url, ValidationErrors};
use crate::modules::store::application::domain::entities::{
    merge_fields, Collection, Document, DocumentId, Fields,
};

pub const DEFAULT_TAG_COLOR: &str = "blue-text-gradient";
pub const DEFAULT_EXPERIENCE_ICON: &str = "work";
pub const DEFAULT_ICON_BG: &str = "#383E56";

//
// ──────────────────────────────────────────────────────────
// Entity contract
// ──────────────────────────────────────────────────────────
//

/// A typed portfolio record stored in one collection.
///
/// `Form` is what the admin submits; [`PortfolioEntity::from_form`] normalises
/// it (splitting tags, points, applying defaults) and validates the result.
pub trait PortfolioEntity:
    Serialize + DeserializeOwned + Clone + Send + Sync + std::fmt::Debug + 'static
{
    const COLLECTION: Collection;
    /// Singular, lowercase. Used in messages.
    const LABEL: &'static str;

    type Form: DeserializeOwned + Send + Sync + 'static;

    fn validate(&self) -> Result<(), ValidationErrors>;

    fn from_form(form: Self::Form) -> Result<Self, ValidationErrors>;

    fn to_fields(&self) -> Fields {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Fields::new(),
        }
    }
}

/// An entity together with its store identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<E> {
    pub id: DocumentId,

    #[serde(flatten)]
    pub data: E,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl<E: PortfolioEntity> Record<E> {
    pub fn new(id: DocumentId, data: E) -> Self {
        Self {
            id,
            data,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn from_document(doc: Document) -> Result<Self, serde_json::Error> {
        let data = serde_json::from_value::<E>(Value::Object(doc.fields))?;
        Ok(Self {
            id: doc.id,
            data,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }

    /// Shallow-merges `patch` into the entity, keeping untouched fields.
    pub fn merge(&mut self, patch: Fields) -> Result<(), serde_json::Error> {
        let mut fields = self.data.to_fields();
        merge_fields(&mut fields, patch);
        self.data = serde_json::from_value(Value::Object(fields))?;
        Ok(())
    }
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

//
// ──────────────────────────────────────────────────────────
// Project
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub description: String,
    pub tags: Vec<Tag>,
    pub image: String,
    pub source_code_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    /// Comma separated.
    pub tags: String,
    pub image: String,
    pub source_code_link: String,
    pub demo_link: Option<String>,
}

/// `"react, rust,,"` becomes two tags with the default color.
pub fn parse_tags(raw: &str) -> Vec<Tag> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| Tag {
            name: t.to_string(),
            color: DEFAULT_TAG_COLOR.to_string(),
        })
        .collect()
}

impl PortfolioEntity for Project {
    const COLLECTION: Collection = Collection::Projects;
    const LABEL: &'static str = "project";

    type Form = ProjectForm;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name);
        errors.require("description", &self.description);
        errors.url("image", &self.image);
        errors.url("sourceCodeLink", &self.source_code_link);
        if let Some(link) = &self.demo_link {
            errors.url("demoLink", link);
        }
        errors.into_result()
    }

    fn from_form(form: ProjectForm) -> Result<Self, ValidationErrors> {
        let project = Project {
            name: trimmed(&form.name),
            description: trimmed(&form.description),
            tags: parse_tags(&form.tags),
            image: trimmed(&form.image),
            source_code_link: trimmed(&form.source_code_link),
            demo_link: form
                .demo_link
                .map(|l| trimmed(&l))
                .filter(|l| !l.is_empty()),
        };
        project.validate()?;
        Ok(project)
    }
}

//
// ──────────────────────────────────────────────────────────
// Experience
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Experience {
    pub title: String,
    pub company_name: String,
    pub date: String,
    pub icon: String,
    pub icon_bg: String,
    pub points: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperienceForm {
    pub title: String,
    pub company_name: String,
    pub date: String,
    pub icon_bg: String,
    /// One point per line.
    pub points: String,
}

pub fn parse_points(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

impl PortfolioEntity for Experience {
    const COLLECTION: Collection = Collection::Experience;
    const LABEL: &'static str = "experience";

    type Form = ExperienceForm;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title);
        errors.require("companyName", &self.company_name);
        errors.require("date", &self.date);
        if self.points.is_empty() {
            errors.add("points", "points is required");
        }
        errors.into_result()
    }

    fn from_form(form: ExperienceForm) -> Result<Self, ValidationErrors> {
        let icon_bg = trimmed(&form.icon_bg);
        let experience = Experience {
            title: trimmed(&form.title),
            company_name: trimmed(&form.company_name),
            date: trimmed(&form.date),
            icon: DEFAULT_EXPERIENCE_ICON.to_string(),
            icon_bg: if icon_bg.is_empty() {
                DEFAULT_ICON_BG.to_string()
            } else {
                icon_bg
            },
            points: parse_points(&form.points),
        };
        experience.validate()?;
        Ok(experience)
    }
}

//
// ──────────────────────────────────────────────────────────
// Education
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EducationKind {
    #[default]
    Education,
    Certification,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub year: String,
    #[serde(rename = "type")]
    pub kind: EducationKind,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationForm {
    pub institution: String,
    pub degree: String,
    pub year: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: String,
}

impl PortfolioEntity for Education {
    const COLLECTION: Collection = Collection::Education;
    const LABEL: &'static str = "education";

    type Form = EducationForm;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("institution", &self.institution);
        errors.require("degree", &self.degree);
        errors.require("year", &self.year);
        errors.into_result()
    }

    fn from_form(form: EducationForm) -> Result<Self, ValidationErrors> {
        let kind = match form.kind.as_deref().map(str::trim) {
            None | Some("") | Some("education") => EducationKind::Education,
            Some("certification") => EducationKind::Certification,
            Some(_) => {
                return Err(ValidationErrors::single(
                    "type",
                    "type must be education or certification",
                ))
            }
        };

        let education = Education {
            institution: trimmed(&form.institution),
            degree: trimmed(&form.degree),
            year: trimmed(&form.year),
            kind,
            description: trimmed(&form.description),
        };
        education.validate()?;
        Ok(education)
    }
}

//
// ──────────────────────────────────────────────────────────
// Skill
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Skill {
    pub name: String,
    /// Category name, not id.
    pub category: String,
    pub icon: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkillForm {
    pub name: String,
    pub category: String,
    pub icon: String,
    pub description: String,
}

impl PortfolioEntity for Skill {
    const COLLECTION: Collection = Collection::Skills;
    const LABEL: &'static str = "skill";

    type Form = SkillForm;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name);
        errors.require("category", &self.category);
        // Icons are either symbolic tokens or links.
        if self.icon.contains("://") && !is_http_url(&self.icon) {
            errors.add("icon", "icon must start with http:// or https://");
        }
        errors.into_result()
    }

    fn from_form(form: SkillForm) -> Result<Self, ValidationErrors> {
        let skill = Skill {
            name: trimmed(&form.name),
            category: trimmed(&form.category),
            icon: trimmed(&form.icon),
            description: trimmed(&form.description),
        };
        skill.validate()?;
        Ok(skill)
    }
}

//
// ──────────────────────────────────────────────────────────
// SkillCategory
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillCategory {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SkillCategoryForm {
    pub name: String,
}

impl PortfolioEntity for SkillCategory {
    const COLLECTION: Collection = Collection::SkillCategories;
    const LABEL: &'static str = "skill category";

    type Form = SkillCategoryForm;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name);
        errors.into_result()
    }

    fn from_form(form: SkillCategoryForm) -> Result<Self, ValidationErrors> {
        let category = SkillCategory {
            name: trimmed(&form.name),
        };
        category.validate()?;
        Ok(category)
    }
}
