use actix_web::{post, web, Responder};

use crate::modules::auth::adapter::incoming::web::extractors::AdminUser;
use crate::shared::api::ApiResponse;
use crate::AppState;

use super::parse_section;

/// Returns the built-in default for the editor to show. Nothing is saved
/// until the owner submits it through the save route.
#[utoipa::path(
    post,
    path = "/api/admin/sections/{section}/reset",
    tag = "sections",
    params(("section" = String, Path, description = "Section id")),
    responses(
        (status = 200, description = "Default content, not persisted"),
        (status = 404, description = "Unknown section"),
    ),
    security(("BearerAuth" = []))
)]
#[post("/api/admin/sections/{section}/reset")]
pub async fn reset_section_handler(
    _admin: AdminUser,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    match parse_section(&path) {
        Ok(section) => ApiResponse::success(data.sections.reset_to_default(section)),
        Err(resp) => resp,
    }
}
