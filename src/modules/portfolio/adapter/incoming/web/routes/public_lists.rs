use actix_web::{get, web, HttpResponse, Responder};

use crate::api::schemas::ErrorResponse;
use crate::modules::store::application::domain::entities::Collection;
use crate::shared::api::ApiResponse;
use crate::AppState;

/// One-shot read of a managed collection, newest first.
///
/// A failing store yields an empty list; the failure is logged and recorded
/// by the collection client.
async fn list_collection(data: &AppState, collection: Collection) -> HttpResponse {
    match data.managers.client_for(collection) {
        Some(client) => ApiResponse::success(client.get_all().await),
        None => ApiResponse::internal_error(),
    }
}

#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "portfolio",
    responses(
        (status = 200, description = "Projects, newest first"),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[get("/api/projects")]
pub async fn get_projects_handler(data: web::Data<AppState>) -> impl Responder {
    list_collection(&data, Collection::Projects).await
}

#[utoipa::path(
    get,
    path = "/api/experience",
    tag = "portfolio",
    responses((status = 200, description = "Work experience, newest first"))
)]
#[get("/api/experience")]
pub async fn get_experience_handler(data: web::Data<AppState>) -> impl Responder {
    list_collection(&data, Collection::Experience).await
}

#[utoipa::path(
    get,
    path = "/api/education",
    tag = "portfolio",
    responses((status = 200, description = "Education and certifications, newest first"))
)]
#[get("/api/education")]
pub async fn get_education_handler(data: web::Data<AppState>) -> impl Responder {
    list_collection(&data, Collection::Education).await
}

#[utoipa::path(
    get,
    path = "/api/skills",
    tag = "portfolio",
    responses((status = 200, description = "Skills, newest first"))
)]
#[get("/api/skills")]
pub async fn get_skills_handler(data: web::Data<AppState>) -> impl Responder {
    list_collection(&data, Collection::Skills).await
}

#[utoipa::path(
    get,
    path = "/api/skill-categories",
    tag = "portfolio",
    responses((status = 200, description = "Skill categories"))
)]
#[get("/api/skill-categories")]
pub async fn get_skill_categories_handler(data: web::Data<AppState>) -> impl Responder {
    list_collection(&data, Collection::SkillCategories).await
}
