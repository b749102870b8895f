use actix_web::{delete, web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use crate::modules::auth::adapter::incoming::web::extractors::AdminUser;
use crate::modules::portfolio::application::domain::entities::{
    Education, Experience, PortfolioEntity, Project, Skill,
};
use crate::modules::portfolio::application::{
    ListPhase, Manages, ManagerError, OptimisticList, PortfolioManagers,
};
use crate::modules::store::application::domain::entities::DocumentId;
use crate::shared::api::ApiResponse;
use crate::AppState;

use super::error_mapping::map_manager_error;

//
// ──────────────────────────────────────────────────────────
// Registration
// ──────────────────────────────────────────────────────────
//

/// CRUD and delete-confirmation routes for every entity managed through
/// [`Manages`]. Mounted under `/api/admin/{collection}`.
pub fn admin_entity_routes(cfg: &mut web::ServiceConfig) {
    entity_routes::<Project>(cfg);
    entity_routes::<Experience>(cfg);
    entity_routes::<Education>(cfg);
    entity_routes::<Skill>(cfg);
}

fn entity_routes<E>(cfg: &mut web::ServiceConfig)
where
    E: PortfolioEntity,
    PortfolioManagers: Manages<E>,
{
    let base = format!("/api/admin/{}", E::COLLECTION.as_str());

    cfg.service(
        web::resource(base.as_str())
            .route(web::get().to(list_entities::<E>))
            .route(web::post().to(create_entity::<E>)),
    )
    // Before `{id}` so it is not taken for an id.
    .service(
        web::resource(format!("{base}/reconcile")).route(web::post().to(reconcile_entities::<E>)),
    )
    .service(
        web::resource(format!("{base}/{{id}}"))
            .route(web::patch().to(update_entity::<E>))
            .route(web::delete().to(confirm_delete::<E>)),
    )
    .service(
        web::resource(format!("{base}/{{id}}/delete-request"))
            .route(web::post().to(request_delete::<E>)),
    );
}

fn list_of<E>(managers: &PortfolioManagers) -> &OptimisticList<E>
where
    E: PortfolioEntity,
    PortfolioManagers: Manages<E>,
{
    Manages::<E>::list(managers)
}

//
// ──────────────────────────────────────────────────────────
// Query DTO
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize, IntoParams)]
pub struct ConfirmDeleteQuery {
    /// Ticket from the matching delete request
    pub ticket: Option<String>,
}

//
// ──────────────────────────────────────────────────────────
// Handlers
// ──────────────────────────────────────────────────────────
//

async fn list_entities<E>(_admin: AdminUser, data: web::Data<AppState>) -> HttpResponse
where
    E: PortfolioEntity,
    PortfolioManagers: Manages<E>,
{
    let list = list_of::<E>(&data.managers);
    match list.ensure_loaded().await {
        Ok(()) => ApiResponse::success(list.items().await),
        Err(e) => map_manager_error(e),
    }
}

async fn create_entity<E>(
    admin: AdminUser,
    data: web::Data<AppState>,
    payload: web::Json<E::Form>,
) -> HttpResponse
where
    E: PortfolioEntity,
    PortfolioManagers: Manages<E>,
{
    match Manages::<E>::create(&*data.managers, payload.into_inner()).await {
        Ok(record) => {
            info!(account_id = %admin.account_id, id = %record.id, "Created {}", E::LABEL);
            ApiResponse::created(record)
        }
        Err(e) => map_manager_error(e),
    }
}

async fn update_entity<E>(
    _admin: AdminUser,
    data: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<E::Form>,
) -> HttpResponse
where
    E: PortfolioEntity,
    PortfolioManagers: Manages<E>,
{
    let id = DocumentId::from(path.into_inner());
    if let Err(e) = list_of::<E>(&data.managers).ensure_loaded().await {
        return map_manager_error(e);
    }

    match Manages::<E>::update(&*data.managers, &id, payload.into_inner()).await {
        Ok(record) => ApiResponse::success(record),
        Err(e) => map_manager_error(e),
    }
}

async fn request_delete<E>(
    _admin: AdminUser,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse
where
    E: PortfolioEntity,
    PortfolioManagers: Manages<E>,
{
    let id = DocumentId::from(path.into_inner());
    let list = list_of::<E>(&data.managers);
    if let Err(e) = list.ensure_loaded().await {
        return map_manager_error(e);
    }

    match list.request_delete(&id).await {
        Ok(ticket) => ApiResponse::success(ticket),
        Err(e) => map_manager_error(e),
    }
}

async fn confirm_delete<E>(
    admin: AdminUser,
    data: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ConfirmDeleteQuery>,
) -> HttpResponse
where
    E: PortfolioEntity,
    PortfolioManagers: Manages<E>,
{
    let id = DocumentId::from(path.into_inner());
    let Some(ticket) = query.into_inner().ticket else {
        return ApiResponse::bad_request(
            "TICKET_REQUIRED",
            "Request a delete first and pass its ticket",
        );
    };

    let list = list_of::<E>(&data.managers);
    // A ticket is only good for the id it was issued for.
    if let Some(pending) = list.status().await.pending_delete {
        if pending.ticket == ticket && pending.id != id {
            return map_manager_error(ManagerError::TicketMismatch);
        }
    }

    match list.confirm_delete(&ticket).await {
        Ok(removed) => {
            info!(account_id = %admin.account_id, id = %removed, "Deleted {}", E::LABEL);
            ApiResponse::no_content()
        }
        Err(e) => map_manager_error(e),
    }
}

async fn reconcile_entities<E>(_admin: AdminUser, data: web::Data<AppState>) -> HttpResponse
where
    E: PortfolioEntity,
    PortfolioManagers: Manages<E>,
{
    match list_of::<E>(&data.managers).reconcile().await {
        Ok(Some(report)) => ApiResponse::success(report),
        Ok(None) => map_manager_error(ManagerError::Busy(ListPhase::Loading)),
        Err(e) => map_manager_error(e),
    }
}

/// Cancels a pending delete in whichever list issued the ticket.
#[utoipa::path(
    delete,
    path = "/api/admin/delete-requests/{ticket}",
    tag = "admin",
    params(("ticket" = String, Path, description = "Ticket from a delete request")),
    responses(
        (status = 204, description = "Delete cancelled"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "No pending delete with this ticket"),
    ),
    security(("BearerAuth" = []))
)]
#[delete("/api/admin/delete-requests/{ticket}")]
pub async fn cancel_delete_handler(
    _admin: AdminUser,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    match data.managers.cancel_delete(&path) {
        Ok(()) => ApiResponse::no_content(),
        Err(_) => ApiResponse::not_found(
            "NO_PENDING_DELETE",
            "No pending delete with this ticket",
        ),
    }
}
