use actix_web::{get, post, web, Responder};
use tracing::{info, warn};

use crate::api::schemas::ErrorResponse;
use crate::modules::auth::adapter::incoming::web::extractors::AdminUser;
use crate::shared::api::ApiResponse;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/stats",
    tag = "admin",
    responses(
        (status = 200, description = "Item counts per collection"),
        (status = 401, description = "Not signed in", body = ErrorResponse),
    ),
    security(("BearerAuth" = []))
)]
#[get("/api/admin/dashboard/stats")]
pub async fn dashboard_stats_handler(
    _admin: AdminUser,
    data: web::Data<AppState>,
) -> impl Responder {
    ApiResponse::success(data.dashboard.stats().await)
}

/// Inserts the sample portfolio. Individual failures are counted in the
/// report rather than aborting the run.
#[utoipa::path(
    post,
    path = "/api/admin/dashboard/seed",
    tag = "admin",
    responses((status = 200, description = "Seed report")),
    security(("BearerAuth" = []))
)]
#[post("/api/admin/dashboard/seed")]
pub async fn seed_dashboard_handler(
    admin: AdminUser,
    data: web::Data<AppState>,
) -> impl Responder {
    let report = data.dashboard.seed().await;
    if report.failed > 0 {
        warn!(failed = report.failed, "Seeding finished with failures");
    } else {
        info!(account_id = %admin.account_id, "Database seeded");
    }
    ApiResponse::success(report)
}

#[utoipa::path(
    post,
    path = "/api/admin/dashboard/reset",
    tag = "admin",
    responses((status = 200, description = "Reset report")),
    security(("BearerAuth" = []))
)]
#[post("/api/admin/dashboard/reset")]
pub async fn reset_dashboard_handler(
    admin: AdminUser,
    data: web::Data<AppState>,
) -> impl Responder {
    let report = data.dashboard.reset().await;
    info!(
        account_id = %admin.account_id,
        removed = report.removed,
        failed = report.failed,
        "Portfolio data reset"
    );
    ApiResponse::success(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::app_state_builder::TestAppStateBuilder;
    use crate::tests::support::auth_helper::{bearer, token_data};
    use crate::tests::support::flaky_store::FlakyStore;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;
    use std::sync::Arc;

    #[actix_web::test]
    async fn seed_then_stats_then_reset() {
        let state = TestAppStateBuilder::default()
            .with_store(Arc::new(FlakyStore::new()))
            .build();
        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(token_data())
                .service(dashboard_stats_handler)
                .service(seed_dashboard_handler)
                .service(reset_dashboard_handler),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/dashboard/seed")
                .insert_header(bearer())
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let seeded: Value = test::read_body_json(resp).await;
        assert_eq!(seeded["data"]["failed"], 0);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/dashboard/stats")
                .insert_header(bearer())
                .to_request(),
        )
        .await;
        let stats: Value = test::read_body_json(resp).await;
        assert_eq!(stats["data"]["projects"], seeded["data"]["projects"]);
        assert_eq!(stats["data"]["skills"], seeded["data"]["skills"]);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/dashboard/reset")
                .insert_header(bearer())
                .to_request(),
        )
        .await;
        let reset: Value = test::read_body_json(resp).await;
        assert_eq!(reset["data"]["failed"], 0);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/dashboard/stats")
                .insert_header(bearer())
                .to_request(),
        )
        .await;
        let stats: Value = test::read_body_json(resp).await;
        assert_eq!(stats["data"]["projects"], 0);
        assert_eq!(stats["data"]["skills"], 0);
    }

    #[actix_web::test]
    async fn stats_require_a_token() {
        let state = TestAppStateBuilder::default().build();
        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(token_data())
                .service(dashboard_stats_handler),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/dashboard/stats")
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
