use actix_web::{get, web, Responder};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::modules::auth::adapter::incoming::web::extractors::AdminUser;
use crate::shared::api::ApiResponse;
use crate::AppState;

const DEFAULT_NOTIFICATION_LIMIT: usize = 20;

#[derive(Debug, Deserialize, IntoParams)]
pub struct NotificationsQuery {
    pub limit: Option<usize>,
}

/// Recent toast messages, oldest first.
#[utoipa::path(
    get,
    path = "/api/admin/notifications",
    tag = "admin",
    params(NotificationsQuery),
    responses((status = 200, description = "Recent notifications")),
    security(("BearerAuth" = []))
)]
#[get("/api/admin/notifications")]
pub async fn list_notifications_handler(
    _admin: AdminUser,
    data: web::Data<AppState>,
    query: web::Query<NotificationsQuery>,
) -> impl Responder {
    let limit = query.limit.unwrap_or(DEFAULT_NOTIFICATION_LIMIT);
    ApiResponse::success(data.notifications.recent(limit))
}

/// Per-request loading and error state of recent store calls, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/requests",
    tag = "admin",
    responses((status = 200, description = "Recent request states")),
    security(("BearerAuth" = []))
)]
#[get("/api/admin/requests")]
pub async fn list_requests_handler(
    _admin: AdminUser,
    data: web::Data<AppState>,
) -> impl Responder {
    ApiResponse::success(data.requests.snapshot())
}
