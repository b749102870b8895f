use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Loosely-typed document body. Keys are the camelCase wire names.
pub type Fields = Map<String, Value>;

/// Keys owned by the store. They are never persisted inside `Fields`.
pub const RESERVED_KEYS: [&str; 3] = ["id", "createdAt", "updatedAt"];

//
// ──────────────────────────────────────────────────────────
// Collection
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Projects,
    Experience,
    Education,
    Skills,
    SkillCategories,
    SectionContents,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Projects,
        Collection::Experience,
        Collection::Education,
        Collection::Skills,
        Collection::SkillCategories,
        Collection::SectionContents,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::Experience => "experience",
            Collection::Education => "education",
            Collection::Skills => "skills",
            Collection::SkillCategories => "skill_categories",
            Collection::SectionContents => "section_contents",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown collection: {0}")]
pub struct UnknownCollection(pub String);

impl FromStr for Collection {
    type Err = UnknownCollection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Route segments use dashes, storage uses underscores.
        let normalized = s.trim().replace('-', "_");
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| UnknownCollection(s.to_string()))
    }
}

//
// ──────────────────────────────────────────────────────────
// DocumentId
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Opaque store-assigned id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

//
// ──────────────────────────────────────────────────────────
// Document
// ──────────────────────────────────────────────────────────
//

/// A stored record as the store returns it.
///
/// Serializes flat (`{"id": .., ...fields, "createdAt": ..}`), the layout
/// public consumers read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,

    #[serde(flatten)]
    pub fields: Fields,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document {
    pub fn new(id: DocumentId, fields: Fields) -> Self {
        Self {
            id,
            fields: strip_reserved(fields),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// Removes store-owned keys so callers cannot overwrite ids or stamps.
pub fn strip_reserved(mut fields: Fields) -> Fields {
    for key in RESERVED_KEYS {
        fields.remove(key);
    }
    fields
}

/// Shallow merge: keys present in `patch` replace those in `base`.
pub fn merge_fields(base: &mut Fields, patch: Fields) {
    for (key, value) in strip_reserved(patch) {
        base.insert(key, value);
    }
}

//
// ──────────────────────────────────────────────────────────
// Change events
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub id: DocumentId,
    pub kind: ChangeKind,
}
