use actix_web::{http::StatusCode, post, web, HttpResponse, Responder};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::schemas::ErrorResponse;
use crate::modules::contact::application::domain::{ContactForm, ContactMessage};
use crate::modules::contact::application::use_cases::send_contact_message::SendContactError;
use crate::shared::api::ApiResponse;
use crate::AppState;

//
// ──────────────────────────────────────────────────────────
// Request DTO
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ContactRequestDto {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// At least 10 characters
    #[schema(example = "I'd like to talk about a project.")]
    pub message: String,
}

//
// ──────────────────────────────────────────────────────────
// Route
// ──────────────────────────────────────────────────────────
//

/// Contact form
///
/// Forwards a visitor message to the configured form service.
#[utoipa::path(
    post,
    path = "/api/contact",
    tag = "contact",
    request_body = ContactRequestDto,
    responses(
        (status = 200, description = "Message sent"),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 502, description = "Form service refused the message", body = ErrorResponse),
        (status = 503, description = "Form service unavailable", body = ErrorResponse),
    )
)]
#[post("/api/contact")]
pub async fn send_contact_message_handler(
    data: web::Data<AppState>,
    payload: web::Json<ContactRequestDto>,
) -> impl Responder {
    let dto = payload.into_inner();
    let message = match ContactMessage::new(ContactForm {
        name: dto.name,
        email: dto.email,
        message: dto.message,
    }) {
        Ok(message) => message,
        Err(errors) => return ApiResponse::validation_failed(errors.fields()),
    };

    match data.send_contact_message_use_case.execute(message).await {
        Ok(()) => ApiResponse::success("Thank you! Your message has been sent successfully."),
        Err(err) => map_contact_error(err),
    }
}

//
// ──────────────────────────────────────────────────────────
// Error Mapping
// ──────────────────────────────────────────────────────────
//

fn map_contact_error(err: SendContactError) -> HttpResponse {
    match err {
        SendContactError::Rejected(msg) => ApiResponse::bad_gateway("CONTACT_REJECTED", &msg),
        SendContactError::Unavailable => ApiResponse::error(
            StatusCode::SERVICE_UNAVAILABLE,
            "CONTACT_UNAVAILABLE",
            "Failed to send message. Please try again.",
        ),
    }
}
