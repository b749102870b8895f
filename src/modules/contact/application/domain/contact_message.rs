use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::shared::validation::ValidationErrors;

pub const MIN_MESSAGE_LEN: usize = 10;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// A visitor message that passed validation, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    name: String,
    email: String,
    message: String,
}

impl ContactMessage {
    pub fn new(form: ContactForm) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = form.name.trim();
        if name.is_empty() {
            errors.add("name", "Name is required");
        }

        let email = form.email.trim();
        if email.is_empty() {
            errors.add("email", "Email is required");
        } else if !EmailAddress::is_valid(email) {
            errors.add("email", "Please enter a valid email address");
        }

        let message = form.message.trim();
        if message.is_empty() {
            errors.add("message", "Message is required");
        } else if message.chars().count() < MIN_MESSAGE_LEN {
            errors.add(
                "message",
                &format!("Message must be at least {MIN_MESSAGE_LEN} characters"),
            );
        }

        errors.into_result()?;
        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
