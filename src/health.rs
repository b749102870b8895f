use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;

use crate::modules::store::application::domain::entities::{Collection, DocumentId};
use crate::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadinessResponse {
    status: &'static str,
    store: &'static str,
}

/// LIVENESS PROBE
/// - No I/O
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse { status: "ok" })
}

/// READINESS PROBE
/// - One point read against the document store
#[get("/ready")]
pub async fn readiness(data: web::Data<AppState>) -> impl Responder {
    let probe = data
        .store
        .get(Collection::SectionContents, &DocumentId::from("about"))
        .await;

    match probe {
        Ok(_) => HttpResponse::Ok().json(ReadinessResponse {
            status: "ok",
            store: "ok",
        }),
        Err(e) => {
            tracing::warn!("Readiness probe failed: {}", e);
            HttpResponse::ServiceUnavailable().json(ReadinessResponse {
                status: "unhealthy",
                store: "unhealthy",
            })
        }
    }
}
