use actix_web::{post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::modules::auth::application::domain::entities::{
    AuthSession, LoginCommand, LoginForm,
};
use crate::modules::auth::application::use_cases::login_user::LoginError;
use crate::shared::api::ApiResponse;
use crate::AppState;

//
// ──────────────────────────────────────────────────────────
// Request / Response DTO
// ──────────────────────────────────────────────────────────
//

#[derive(Deserialize, ToSchema)]
pub struct LoginRequestDto {
    #[schema(example = "owner@example.com")]
    pub email: String,
    #[schema(example = "secret1")]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Seconds until the token expires
    #[schema(example = 3600)]
    pub expires_in: i64,
    pub user: SessionUser,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000")]
    pub id: String,
    #[schema(example = "owner@example.com")]
    pub email: String,
}

impl From<AuthSession> for SessionResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            access_token: session.access_token,
            token_type: session.token_type.to_string(),
            expires_in: session.expires_in,
            user: SessionUser {
                id: session.user.id.to_string(),
                email: session.user.email,
            },
        }
    }
}

//
// ──────────────────────────────────────────────────────────
// Route
// ──────────────────────────────────────────────────────────
//

/// Owner login
///
/// Checks email and password and returns a JWT access token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = inline(SuccessResponse<SessionResponse>)),
        (status = 400, description = "Missing or malformed fields", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[post("/api/auth/login")]
pub async fn login_user_handler(
    data: web::Data<AppState>,
    payload: web::Json<LoginRequestDto>,
) -> impl Responder {
    let dto = payload.into_inner();
    info!(email = %dto.email, "Login attempt");

    let command = match LoginCommand::new(LoginForm {
        email: dto.email,
        password: dto.password,
    }) {
        Ok(cmd) => cmd,
        Err(errors) => return ApiResponse::validation_failed(errors.fields()),
    };

    match data.login_user_use_case.execute(command).await {
        Ok(session) => {
            info!(account_id = %session.user.id, "Logged in");
            ApiResponse::success(SessionResponse::from(session))
        }
        Err(err) => map_login_error(err),
    }
}

//
// ──────────────────────────────────────────────────────────
// Error Mapping
// ──────────────────────────────────────────────────────────
//

fn map_login_error(err: LoginError) -> HttpResponse {
    match err {
        LoginError::InvalidCredentials => {
            warn!("Login rejected: invalid credentials");
            ApiResponse::unauthorized("INVALID_CREDENTIALS", "Invalid email or password")
        }
        other => {
            error!("Login failed: {}", other);
            ApiResponse::internal_error()
        }
    }
}
