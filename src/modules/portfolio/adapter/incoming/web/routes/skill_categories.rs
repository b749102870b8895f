use actix_web::{delete, get, patch, post, web, Responder};
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};

use crate::api::schemas::ErrorResponse;
use crate::modules::auth::adapter::incoming::web::extractors::AdminUser;
use crate::modules::portfolio::application::domain::entities::SkillCategoryForm;
use crate::modules::portfolio::application::{CascadePolicy, ListPhase, ManagerError};
use crate::modules::store::application::domain::entities::DocumentId;
use crate::shared::api::ApiResponse;
use crate::AppState;

use super::admin_entities::ConfirmDeleteQuery;
use super::error_mapping::map_manager_error;

//
// ──────────────────────────────────────────────────────────
// Request DTO
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryRequestDto {
    #[schema(example = "Frontend")]
    pub name: String,
}

impl From<CategoryRequestDto> for SkillCategoryForm {
    fn from(dto: CategoryRequestDto) -> Self {
        SkillCategoryForm { name: dto.name }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RenameQuery {
    /// `report` (default) or `rollback`
    pub policy: Option<String>,
}

//
// ──────────────────────────────────────────────────────────
// Routes
// ──────────────────────────────────────────────────────────
//

#[utoipa::path(
    get,
    path = "/api/admin/skill-categories",
    tag = "admin",
    responses(
        (status = 200, description = "Cached category catalog"),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 502, description = "Store unavailable", body = ErrorResponse),
    ),
    security(("BearerAuth" = []))
)]
#[get("/api/admin/skill-categories")]
pub async fn list_skill_categories_handler(
    _admin: AdminUser,
    data: web::Data<AppState>,
) -> impl Responder {
    let categories = data.managers.skills.categories();
    match categories.ensure_loaded().await {
        Ok(()) => ApiResponse::success(categories.items().await),
        Err(e) => map_manager_error(e),
    }
}

/// Adds a category. A name already in the catalog (ignoring case) returns
/// the existing entry with `200` instead of `201`.
#[utoipa::path(
    post,
    path = "/api/admin/skill-categories",
    tag = "admin",
    request_body = CategoryRequestDto,
    responses(
        (status = 201, description = "Category created"),
        (status = 200, description = "Category already existed"),
        (status = 400, description = "Name missing", body = ErrorResponse),
    ),
    security(("BearerAuth" = []))
)]
#[post("/api/admin/skill-categories")]
pub async fn create_skill_category_handler(
    _admin: AdminUser,
    data: web::Data<AppState>,
    payload: web::Json<CategoryRequestDto>,
) -> impl Responder {
    match data
        .managers
        .skills
        .add_category(payload.into_inner().into())
        .await
    {
        Ok(outcome) if outcome.created => ApiResponse::created(outcome),
        Ok(outcome) => ApiResponse::success(outcome),
        Err(e) => map_manager_error(e),
    }
}

/// Renames a category and every skill filed under its old name.
///
/// Partial failures are not an HTTP error: the body is the cascade report,
/// listing which skills were updated, which failed and whether the rename
/// was rolled back.
#[utoipa::path(
    patch,
    path = "/api/admin/skill-categories/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Category id"), RenameQuery),
    request_body = CategoryRequestDto,
    responses(
        (status = 200, description = "Cascade report"),
        (status = 400, description = "Invalid name or policy", body = ErrorResponse),
        (status = 404, description = "Unknown category", body = ErrorResponse),
    ),
    security(("BearerAuth" = []))
)]
#[patch("/api/admin/skill-categories/{id}")]
pub async fn rename_skill_category_handler(
    admin: AdminUser,
    data: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<RenameQuery>,
    payload: web::Json<CategoryRequestDto>,
) -> impl Responder {
    let policy = match query.into_inner().policy {
        None => CascadePolicy::default(),
        Some(raw) => match raw.parse::<CascadePolicy>() {
            Ok(policy) => policy,
            Err(msg) => return ApiResponse::bad_request("INVALID_POLICY", &msg),
        },
    };
    let id = DocumentId::from(path.into_inner());

    match data
        .managers
        .skills
        .rename_category(&id, payload.into_inner().into(), policy)
        .await
    {
        Ok(report) => {
            if report.is_complete() {
                info!(account_id = %admin.account_id, category = %id, "Category renamed");
            } else {
                warn!(
                    category = %id,
                    failed = report.failed.len(),
                    rolled_back = report.rolled_back,
                    "Category rename did not complete"
                );
            }
            ApiResponse::success(report)
        }
        Err(e) => map_manager_error(e),
    }
}

/// Issues a delete ticket for the category. Nothing is removed yet.
#[utoipa::path(
    post,
    path = "/api/admin/skill-categories/{id}/delete-request",
    tag = "admin",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Delete ticket"),
        (status = 404, description = "Unknown category", body = ErrorResponse),
    ),
    security(("BearerAuth" = []))
)]
#[post("/api/admin/skill-categories/{id}/delete-request")]
pub async fn request_skill_category_delete_handler(
    _admin: AdminUser,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let id = DocumentId::from(path.into_inner());
    match data.managers.skills.request_category_delete(&id).await {
        Ok(ticket) => ApiResponse::success(ticket),
        Err(e) => map_manager_error(e),
    }
}

/// Removes the category only. Skills filed under it keep the old name.
#[utoipa::path(
    delete,
    path = "/api/admin/skill-categories/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Category id"), ConfirmDeleteQuery),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, description = "Ticket missing", body = ErrorResponse),
        (status = 409, description = "No matching pending delete, or the ticket expired", body = ErrorResponse),
    ),
    security(("BearerAuth" = []))
)]
#[delete("/api/admin/skill-categories/{id}")]
pub async fn delete_skill_category_handler(
    admin: AdminUser,
    data: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ConfirmDeleteQuery>,
) -> impl Responder {
    let id = DocumentId::from(path.into_inner());
    let Some(ticket) = query.into_inner().ticket else {
        return ApiResponse::bad_request(
            "TICKET_REQUIRED",
            "Request a delete first and pass its ticket",
        );
    };

    match data.managers.skills.confirm_category_delete(&id, &ticket).await {
        Ok(removed) => {
            info!(account_id = %admin.account_id, category = %removed, "Category deleted");
            ApiResponse::no_content()
        }
        Err(e) => map_manager_error(e),
    }
}

#[post("/api/admin/skill-categories/reconcile")]
pub async fn reconcile_skill_categories_handler(
    _admin: AdminUser,
    data: web::Data<AppState>,
) -> impl Responder {
    let categories = data.managers.skills.categories();
    match categories.reconcile().await {
        Ok(Some(report)) => ApiResponse::success(report),
        Ok(None) => map_manager_error(ManagerError::Busy(ListPhase::Loading)),
        Err(e) => map_manager_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::portfolio::adapter::incoming::web::routes::admin_entity_routes;
    use crate::tests::support::app_state_builder::TestAppStateBuilder;
    use crate::tests::support::auth_helper::{bearer, token_data};
    use crate::tests::support::flaky_store::FlakyStore;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    macro_rules! app {
        ($store:expr) => {{
            let state = TestAppStateBuilder::default().with_store($store).build();
            test::init_service(
                App::new()
                    .app_data(state)
                    .app_data(token_data())
                    // Literal paths first so `reconcile` is not read as an id.
                    .service(reconcile_skill_categories_handler)
                    .service(list_skill_categories_handler)
                    .service(create_skill_category_handler)
                    .service(rename_skill_category_handler)
                    .service(request_skill_category_delete_handler)
                    .service(delete_skill_category_handler)
                    .configure(admin_entity_routes),
            )
            .await
        }};
    }

    macro_rules! send {
        ($app:expr, $req:expr $(,)?) => {{
            let resp = test::call_service($app, $req.insert_header(bearer()).to_request()).await;
            let status = resp.status();
            let body = test::read_body(resp).await;
            let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
            (status, json)
        }};
    }

    #[actix_web::test]
    async fn duplicate_name_returns_existing_category() {
        let app = app!(Arc::new(FlakyStore::new()));

        let (status, first) = send!(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/skill-categories")
                .set_json(json!({"name": "Frontend"})),
        );
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first["data"]["created"], true);

        let (status, second) = send!(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/skill-categories")
                .set_json(json!({"name": "frontend"})),
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["data"]["created"], false);
        assert_eq!(second["data"]["category"]["id"], first["data"]["category"]["id"]);
    }

    #[actix_web::test]
    async fn rename_cascades_to_skills() {
        let app = app!(Arc::new(FlakyStore::new()));
        let (_, category) = send!(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/skill-categories")
                .set_json(json!({"name": "Frontend"})),
        );
        let id = category["data"]["category"]["id"].as_str().unwrap().to_string();
        for name in ["React", "Vue"] {
            let (status, _) = send!(
                &app,
                test::TestRequest::post()
                    .uri("/api/admin/skills")
                    .set_json(json!({"name": name, "category": "Frontend"})),
            );
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, report) = send!(
            &app,
            test::TestRequest::patch()
                .uri(&format!("/api/admin/skill-categories/{id}"))
                .set_json(json!({"name": "Web"})),
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["data"]["updated"].as_array().unwrap().len(), 2);
        assert_eq!(report["data"]["failed"], json!([]));

        let (_, skills) = send!(&app, test::TestRequest::get().uri("/api/admin/skills"));
        for skill in skills["data"].as_array().unwrap() {
            assert_eq!(skill["category"], "Web");
        }
    }

    #[actix_web::test]
    async fn unknown_policy_is_bad_request() {
        let app = app!(Arc::new(FlakyStore::new()));

        let (status, body) = send!(
            &app,
            test::TestRequest::patch()
                .uri("/api/admin/skill-categories/abc?policy=maybe")
                .set_json(json!({"name": "Web"})),
        );

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_POLICY");
    }

    #[actix_web::test]
    async fn deleting_a_category_keeps_its_skills() {
        let app = app!(Arc::new(FlakyStore::new()));
        let (_, category) = send!(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/skill-categories")
                .set_json(json!({"name": "Tools"})),
        );
        let id = category["data"]["category"]["id"].as_str().unwrap().to_string();
        send!(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/skills")
                .set_json(json!({"name": "Git", "category": "Tools"})),
        );

        let (status, body) = send!(
            &app,
            test::TestRequest::delete().uri(&format!("/api/admin/skill-categories/{id}")),
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "TICKET_REQUIRED");

        let (status, ticket) = send!(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/admin/skill-categories/{id}/delete-request")),
        );
        assert_eq!(status, StatusCode::OK);
        let ticket = ticket["data"]["ticket"].as_str().unwrap().to_string();

        let (_, catalog) = send!(&app, test::TestRequest::get().uri("/api/admin/skill-categories"));
        assert_eq!(catalog["data"].as_array().unwrap().len(), 1);

        let (status, _) = send!(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/admin/skill-categories/{id}?ticket={ticket}")),
        );
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, catalog) = send!(&app, test::TestRequest::get().uri("/api/admin/skill-categories"));
        assert_eq!(catalog["data"], json!([]));

        let (_, skills) = send!(&app, test::TestRequest::get().uri("/api/admin/skills"));
        assert_eq!(skills["data"][0]["category"], "Tools");
    }

    #[actix_web::test]
    async fn reconcile_route_is_not_taken_for_an_id() {
        let app = app!(Arc::new(FlakyStore::new()));

        let (status, body) = send!(
            &app,
            test::TestRequest::post().uri("/api/admin/skill-categories/reconcile"),
        );

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["after"], 0);
    }
}
