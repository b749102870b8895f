use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::validation::ValidationErrors;

pub const MIN_PASSWORD_LEN: usize = 6;

/// The site owner. Any signed-in account may use the admin surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccount {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Account about to be stored; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

//
// ──────────────────────────────────────────────────────────
// Commands
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Validated sign-up input: normalized email, password meeting the policy.
#[derive(Debug, Clone)]
pub struct SignUpCommand {
    email: String,
    password: String,
}

impl SignUpCommand {
    pub fn new(form: SignUpForm) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.email("email", &form.email);

        if form.password.is_empty() {
            errors.add("password", "password is required");
        } else if form.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                &format!("Password should be at least {MIN_PASSWORD_LEN} characters"),
            );
        }
        if form.password != form.confirm_password {
            errors.add("confirmPassword", "Passwords don't match");
        }

        errors.into_result()?;
        Ok(Self {
            email: normalize_email(&form.email),
            password: form.password,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginCommand {
    email: String,
    password: String,
}

impl LoginCommand {
    pub fn new(form: LoginForm) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.email("email", &form.email);
        if form.password.is_empty() {
            errors.add("password", "password is required");
        }

        errors.into_result()?;
        Ok(Self {
            email: normalize_email(&form.email),
            password: form.password,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// What login and sign-up hand back to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: AdminAccount,
}
