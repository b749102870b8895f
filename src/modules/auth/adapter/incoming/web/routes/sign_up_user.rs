use actix_web::{post, web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::modules::auth::adapter::incoming::web::routes::login_user::SessionResponse;
use crate::modules::auth::application::domain::entities::{SignUpCommand, SignUpForm};
use crate::modules::auth::application::use_cases::sign_up_user::SignUpError;
use crate::shared::api::ApiResponse;
use crate::AppState;

//
// ──────────────────────────────────────────────────────────
// Request DTO
// ──────────────────────────────────────────────────────────
//

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequestDto {
    #[schema(example = "owner@example.com")]
    pub email: String,
    /// At least 6 characters
    #[schema(example = "secret1")]
    pub password: String,
    #[schema(example = "secret1")]
    pub confirm_password: String,
}

//
// ──────────────────────────────────────────────────────────
// Route
// ──────────────────────────────────────────────────────────
//

/// Owner sign-up
///
/// Creates the account and signs it in.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body = SignUpRequestDto,
    responses(
        (status = 201, description = "Account created", body = inline(SuccessResponse<SessionResponse>)),
        (status = 400, description = "Invalid fields or passwords don't match", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[post("/api/auth/signup")]
pub async fn sign_up_user_handler(
    data: web::Data<AppState>,
    payload: web::Json<SignUpRequestDto>,
) -> impl Responder {
    let dto = payload.into_inner();

    let command = match SignUpCommand::new(SignUpForm {
        email: dto.email,
        password: dto.password,
        confirm_password: dto.confirm_password,
    }) {
        Ok(cmd) => cmd,
        Err(errors) => return ApiResponse::validation_failed(errors.fields()),
    };

    match data.sign_up_user_use_case.execute(command).await {
        Ok(session) => {
            info!(account_id = %session.user.id, "Account created successfully");
            ApiResponse::created(SessionResponse::from(session))
        }
        Err(err) => map_sign_up_error(err),
    }
}

//
// ──────────────────────────────────────────────────────────
// Error Mapping
// ──────────────────────────────────────────────────────────
//

fn map_sign_up_error(err: SignUpError) -> HttpResponse {
    match err {
        SignUpError::EmailAlreadyExists => ApiResponse::conflict(
            "EMAIL_ALREADY_EXISTS",
            "An account with this email already exists",
        ),
        other => {
            error!("Sign-up failed: {}", other);
            ApiResponse::internal_error()
        }
    }
}
