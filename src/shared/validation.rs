use std::collections::BTreeMap;
use std::fmt;

use email_address::EmailAddress;
use serde::Serialize;

/// Field name (wire spelling) to message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Keeps the first message recorded for a field.
    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, &format!("{field} is required"));
        }
    }

    /// Empty values pass; anything else must be an absolute http(s) URL.
    pub fn url(&mut self, field: &str, value: &str) {
        let value = value.trim();
        if !value.is_empty() && !is_http_url(value) {
            self.add(field, &format!("{field} must start with http:// or https://"));
        }
    }

    /// Required, and a syntactically valid address.
    pub fn email(&mut self, field: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.add(field, &format!("{field} is required"));
        } else if !EmailAddress::is_valid(value) {
            self.add(field, "Invalid email format");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&joined)
    }
}

pub fn is_http_url(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    (lower.starts_with("http://") && lower.len() > "http://".len())
        || (lower.starts_with("https://") && lower.len() > "https://".len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_flags_blank_values() {
        let mut errors = ValidationErrors::new();
        errors.require("name", "   ");
        errors.require("description", "ok");

        assert_eq!(errors.get("name"), Some("name is required"));
        assert!(errors.get("description").is_none());
    }

    #[test]
    fn url_accepts_empty_and_http_schemes_only() {
        let mut errors = ValidationErrors::new();
        errors.url("image", "");
        errors.url("sourceCodeLink", "https://github.com/");
        errors.url("demoLink", "ftp://example.com");

        assert_eq!(errors.fields().len(), 1);
        assert!(errors.get("demoLink").is_some());
    }

    #[test]
    fn email_requires_a_valid_address() {
        let mut errors = ValidationErrors::new();
        errors.email("email", "");
        errors.email("replyTo", "not-an-address");
        errors.email("owner", "me@example.com");

        assert_eq!(errors.get("email"), Some("email is required"));
        assert_eq!(errors.get("replyTo"), Some("Invalid email format"));
        assert!(errors.get("owner").is_none());
    }

    #[test]
    fn first_message_per_field_wins() {
        let mut errors = ValidationErrors::new();
        errors.add("category", "first");
        errors.add("category", "second");

        assert_eq!(errors.get("category"), Some("first"));
        assert!(errors.into_result().is_err());
    }
}
