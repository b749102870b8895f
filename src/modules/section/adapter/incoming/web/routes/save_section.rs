use actix_web::{put, web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::api::schemas::ErrorResponse;
use crate::modules::auth::adapter::incoming::web::extractors::AdminUser;
use crate::modules::section::application::domain::entities::SectionContent;
use crate::modules::section::application::section_service::SaveSectionError;
use crate::shared::api::ApiResponse;
use crate::AppState;

use super::parse_section;

//
// ──────────────────────────────────────────────────────────
// Request DTO
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct SectionRequestDto {
    /// Subtitle shown above the heading
    #[schema(example = "Introduction")]
    pub p: String,
    #[schema(example = "Overview.")]
    pub h2: String,
    /// Body text; blank clears it
    pub content: Option<String>,
}

impl From<SectionRequestDto> for SectionContent {
    fn from(dto: SectionRequestDto) -> Self {
        SectionContent {
            p: dto.p,
            h2: dto.h2,
            content: dto.content,
        }
    }
}

//
// ──────────────────────────────────────────────────────────
// Route
// ──────────────────────────────────────────────────────────
//

/// Replaces the stored text of a section.
#[utoipa::path(
    put,
    path = "/api/admin/sections/{section}",
    tag = "sections",
    params(("section" = String, Path, description = "Section id")),
    request_body = SectionRequestDto,
    responses(
        (status = 200, description = "Saved section"),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Unknown section", body = ErrorResponse),
        (status = 502, description = "Store unavailable", body = ErrorResponse),
    ),
    security(("BearerAuth" = []))
)]
#[put("/api/admin/sections/{section}")]
pub async fn save_section_handler(
    admin: AdminUser,
    data: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<SectionRequestDto>,
) -> impl Responder {
    let section = match parse_section(&path) {
        Ok(section) => section,
        Err(resp) => return resp,
    };

    match data.sections.save(section, payload.into_inner().into()).await {
        Ok(saved) => {
            info!(account_id = %admin.account_id, section = %section, "Section saved");
            ApiResponse::success(saved)
        }
        Err(e) => map_save_error(e),
    }
}

//
// ──────────────────────────────────────────────────────────
// Error Mapping
// ──────────────────────────────────────────────────────────
//

fn map_save_error(err: SaveSectionError) -> HttpResponse {
    match err {
        SaveSectionError::Backend(msg) => {
            error!("Saving section failed: {}", msg);
            ApiResponse::bad_gateway("BACKEND_UNAVAILABLE", "Failed to save changes")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::section::adapter::incoming::web::routes::get_section_handler;
    use crate::tests::support::app_state_builder::TestAppStateBuilder;
    use crate::tests::support::auth_helper::{bearer, token_data};
    use crate::tests::support::flaky_store::FlakyStore;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[actix_web::test]
    async fn saved_text_replaces_the_default() {
        let state = TestAppStateBuilder::default().build();
        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(token_data())
                .service(save_section_handler)
                .service(get_section_handler),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/admin/sections/about")
                .insert_header(bearer())
                .set_json(json!({"p": "Hello", "h2": "About me.", "content": "  "}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let saved: Value = test::read_body_json(resp).await;
        assert!(saved["data"].get("content").is_none());

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/sections/about").to_request(),
        )
        .await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["h2"], "About me.");
        assert_eq!(body["data"]["source"], "stored");
    }

    #[actix_web::test]
    async fn save_requires_a_token() {
        let state = TestAppStateBuilder::default().build();
        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(token_data())
                .service(save_section_handler),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/admin/sections/about")
                .set_json(json!({"p": "x", "h2": "y"}))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn store_failure_is_bad_gateway() {
        let store = Arc::new(FlakyStore::new());
        store.fail_writes(true);
        let state = TestAppStateBuilder::default().with_store(store).build();
        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(token_data())
                .service(save_section_handler),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/admin/sections/education")
                .insert_header(bearer())
                .set_json(json!({"p": "x", "h2": "y"}))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
