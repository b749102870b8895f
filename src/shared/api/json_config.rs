use crate::shared::api::ApiResponse;
use actix_web::web::JsonConfig;

/// Malformed bodies answer with the regular envelope instead of plain text.
pub fn custom_json_config() -> JsonConfig {
    JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(|err, _req| {
            let message = err.to_string();
            actix_web::error::InternalError::from_response(
                err,
                ApiResponse::bad_request("INVALID_BODY", &message),
            )
            .into()
        })
}
