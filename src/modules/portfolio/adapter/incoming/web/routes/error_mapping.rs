use actix_web::HttpResponse;
use tracing::error;

use crate::modules::portfolio::application::ManagerError;
use crate::shared::api::ApiResponse;

pub fn map_manager_error(err: ManagerError) -> HttpResponse {
    match err {
        ManagerError::Validation(errors) => ApiResponse::validation_failed(errors.fields()),
        ManagerError::NotFound(id) => {
            ApiResponse::not_found("NOT_FOUND", &format!("No item with id {id}"))
        }
        ManagerError::Busy(_) => {
            ApiResponse::conflict("LIST_BUSY", "Another operation is in progress")
        }
        ManagerError::NoPendingDelete => {
            ApiResponse::conflict("NO_PENDING_DELETE", "No delete is awaiting confirmation")
        }
        ManagerError::TicketMismatch => ApiResponse::conflict(
            "TICKET_MISMATCH",
            "Delete ticket does not match the pending delete",
        ),
        ManagerError::TicketExpired => {
            ApiResponse::conflict("TICKET_EXPIRED", "Delete ticket has expired")
        }
        ManagerError::Backend(msg) => {
            error!("Document store call failed: {}", msg);
            ApiResponse::bad_gateway(
                "BACKEND_UNAVAILABLE",
                "The data store could not complete the request",
            )
        }
    }
}
