use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::modules::store::application::domain::entities::{Document, DocumentId, Fields};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    About,
    Skills,
    Experience,
    Works,
    Education,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown section: {0}")]
pub struct UnknownSection(pub String);

impl SectionId {
    pub const ALL: [SectionId; 5] = [
        SectionId::About,
        SectionId::Skills,
        SectionId::Experience,
        SectionId::Works,
        SectionId::Education,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::About => "about",
            SectionId::Skills => "skills",
            SectionId::Experience => "experience",
            SectionId::Works => "works",
            SectionId::Education => "education",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SectionId::About => "About Section",
            SectionId::Skills => "Skills Section",
            SectionId::Experience => "Experience Section",
            SectionId::Works => "Projects/Works Section",
            SectionId::Education => "Education Section",
        }
    }

    /// Section documents are stored under the section id itself.
    pub fn document_id(&self) -> DocumentId {
        DocumentId::from(self.as_str())
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionId {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

/// Subtitle (`p`), title (`h2`) and optional body of one page section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SectionContent {
    pub p: String,
    pub h2: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl SectionContent {
    pub(crate) fn to_fields(&self) -> Fields {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => Fields::new(),
        }
    }

    /// Blank body text is stored as absent.
    pub fn normalized(mut self) -> Self {
        if self.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
            self.content = None;
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Stored,
    Default,
}

/// What readers of a section see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSection {
    pub section: SectionId,
    #[serde(flatten)]
    pub content: SectionContent,
    pub source: ContentSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ResolvedSection {
    pub fn fallback(section: SectionId) -> Self {
        Self {
            section,
            content: super::defaults::default_content(section),
            source: ContentSource::Default,
            updated_at: None,
        }
    }

    /// Stored document when it parses, compiled-in default otherwise.
    pub fn resolve(section: SectionId, doc: Option<Document>) -> Self {
        let Some(doc) = doc else {
            return Self::fallback(section);
        };

        match serde_json::from_value::<SectionContent>(serde_json::Value::Object(doc.fields)) {
            Ok(content) => Self {
                section,
                content,
                source: ContentSource::Stored,
                updated_at: doc.updated_at,
            },
            Err(e) => {
                tracing::warn!("Stored section {} is malformed: {}", section, e);
                Self::fallback(section)
            }
        }
    }
}
