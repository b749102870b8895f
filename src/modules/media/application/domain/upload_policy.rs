use std::path::Path;

use serde::Deserialize;
use uuid::Uuid;

use crate::shared::validation::ValidationErrors;

/// Limits applied before any URL is signed.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_file_size_bytes: u64,
    pub max_file_name_len: usize,
    pub bucket_name: String,
}

impl UploadPolicy {
    pub const DEFAULT_BUCKET_NAME: &'static str = "folio-cms-media";
    pub const MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            max_file_size_bytes: Self::MAX_FILE_SIZE_BYTES,
            max_file_name_len: 255,
            bucket_name: bucket_name.into(),
        }
    }

    /// Uses the configured bucket, falling back to the default name.
    pub fn from_bucket(bucket: Option<&str>) -> Self {
        let bucket = bucket
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(Self::DEFAULT_BUCKET_NAME);
        Self::new(bucket)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UploadForm {
    pub file_name: String,
    pub mime_type: String,
    pub file_size_bytes: u64,
}

/// An upload that passed the policy, with the object key it will be stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCommand {
    object_name: String,
    mime_type: String,
}

impl UploadCommand {
    pub fn new(form: UploadForm, policy: &UploadPolicy) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let base = match sanitize_basename(&form.file_name, policy.max_file_name_len) {
            Some(base) => base,
            None => {
                errors.add("fileName", "Invalid file name");
                String::new()
            }
        };

        let mime_type = form.mime_type.trim().to_ascii_lowercase();
        if !is_image_mime(&mime_type) {
            errors.add("mimeType", "Only image uploads are allowed");
        }

        if form.file_size_bytes == 0 {
            errors.add("fileSizeBytes", "File is empty");
        } else if form.file_size_bytes > policy.max_file_size_bytes {
            errors.add(
                "fileSizeBytes",
                &format!(
                    "File too large (max {} bytes)",
                    policy.max_file_size_bytes
                ),
            );
        }

        errors.into_result()?;
        Ok(Self {
            object_name: format!("images/{}-{}", Uuid::new_v4(), base),
            mime_type,
        })
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

fn is_image_mime(mime: &str) -> bool {
    mime.strip_prefix("image/")
        .is_some_and(|sub| !sub.is_empty() && !sub.contains('/'))
}

/// Bare file name with anything outside `[A-Za-z0-9._-]` replaced by `-`.
/// Path-like input is rejected rather than stripped.
fn sanitize_basename(file_name: &str, max_len: usize) -> Option<String> {
    let base = Path::new(file_name).file_name()?.to_str()?;

    if base.is_empty() || base.len() > max_len || base != file_name {
        return None;
    }
    if base.chars().any(|c| c.is_control()) {
        return None;
    }

    Some(
        base.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '-'
                }
            })
            .collect(),
    )
}
