use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use actix_web::{get, web, HttpResponse, Responder};
use futures::stream;
use tokio::sync::mpsc;

use crate::api::schemas::ErrorResponse;
use crate::modules::section::application::domain::entities::ResolvedSection;
use crate::shared::api::ApiResponse;
use crate::AppState;

use super::parse_section;

#[utoipa::path(
    get,
    path = "/api/sections",
    tag = "sections",
    responses((status = 200, description = "Every section, stored or default"))
)]
#[get("/api/sections")]
pub async fn get_sections_handler(data: web::Data<AppState>) -> impl Responder {
    ApiResponse::success(data.sections.get_all().await)
}

/// Stored text for the section, or its built-in default when nothing is
/// stored or the store cannot be reached.
#[utoipa::path(
    get,
    path = "/api/sections/{section}",
    tag = "sections",
    params(("section" = String, Path, description = "about, skills, experience, works or education")),
    responses(
        (status = 200, description = "Section content"),
        (status = 404, description = "Unknown section", body = ErrorResponse),
    )
)]
#[get("/api/sections/{section}")]
pub async fn get_section_handler(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    match parse_section(&path) {
        Ok(section) => ApiResponse::success(data.sections.get(section).await),
        Err(resp) => resp,
    }
}

/// Server-sent `section` events: the current content on connect, then again
/// after every save or delete.
#[get("/api/sections/{section}/stream")]
pub async fn stream_section_handler(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let section = match parse_section(&path) {
        Ok(section) => section,
        Err(resp) => return resp,
    };

    let (tx, rx) = mpsc::unbounded_channel::<ResolvedSection>();
    let subscription = data
        .sections
        .watch(section, move |resolved| {
            let _ = tx.send(resolved);
        })
        .await;

    let events = stream::unfold((rx, subscription), |(mut rx, subscription)| async move {
        let resolved = rx.recv().await?;
        let payload = serde_json::to_string(&resolved).unwrap_or_else(|_| "{}".to_string());
        Some((
            Ok::<_, actix_web::Error>(web::Bytes::from(format!(
                "event: section\ndata: {payload}\n\n"
            ))),
            (rx, subscription),
        ))
    });

    HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, "text/event-stream"))
        .insert_header((CACHE_CONTROL, "no-cache"))
        .streaming(events)
}
