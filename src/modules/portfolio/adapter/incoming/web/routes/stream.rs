use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use actix_web::{get, web, HttpResponse, Responder};
use futures::stream;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::modules::store::application::domain::entities::{Collection, Document};
use crate::shared::api::ApiResponse;
use crate::AppState;

fn snapshot_event(docs: &[Document]) -> web::Bytes {
    let payload = serde_json::to_string(docs).unwrap_or_else(|e| {
        warn!("Could not encode snapshot: {}", e);
        "[]".to_string()
    });
    web::Bytes::from(format!("event: snapshot\ndata: {payload}\n\n"))
}

/// Server-sent events carrying the whole collection on connect and after
/// every change. The subscription lives as long as the response stream.
#[utoipa::path(
    get,
    path = "/api/stream/{collection}",
    tag = "portfolio",
    params(("collection" = String, Path, description = "projects, experience, education, skills or skill-categories")),
    responses(
        (status = 200, description = "text/event-stream of `snapshot` events"),
        (status = 404, description = "Unknown collection"),
    )
)]
#[get("/api/stream/{collection}")]
pub async fn stream_collection_handler(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let client = match path.parse::<Collection>() {
        Ok(collection) => data.managers.client_for(collection),
        Err(_) => None,
    };
    let Some(client) = client else {
        return ApiResponse::not_found(
            "UNKNOWN_COLLECTION",
            &format!("Unknown collection: {}", path.as_str()),
        );
    };

    let (tx, rx) = mpsc::unbounded_channel::<Vec<Document>>();
    let subscription = client
        .subscribe(move |docs| {
            let _ = tx.send(docs);
        })
        .await;
    debug!(collection = %client.collection(), "Stream opened");

    let events = stream::unfold((rx, subscription), |(mut rx, subscription)| async move {
        let docs = rx.recv().await?;
        Some((
            Ok::<_, actix_web::Error>(snapshot_event(&docs)),
            (rx, subscription),
        ))
    });

    HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, "text/event-stream"))
        .insert_header((CACHE_CONTROL, "no-cache"))
        .streaming(events)
}
