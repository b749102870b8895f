use actix_web::{post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;

use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::modules::auth::adapter::incoming::web::extractors::AdminUser;
use crate::modules::media::application::domain::UploadForm;
use crate::modules::media::application::ports::outgoing::SignUrlError;
use crate::modules::media::application::use_cases::create_upload_url::{
    CreateUploadUrlError, UploadUrls,
};
use crate::shared::api::ApiResponse;
use crate::AppState;

//
// ──────────────────────────────────────────────────────────
// Request / Response DTO
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequestDto {
    #[schema(example = "avatar.png")]
    pub file_name: String,
    #[schema(example = "image/png")]
    pub mime_type: String,
    /// At most 5 MiB
    #[schema(example = 204800)]
    pub file_size_bytes: u64,
}

impl From<UploadUrlRequestDto> for UploadForm {
    fn from(dto: UploadUrlRequestDto) -> Self {
        UploadForm {
            file_name: dto.file_name,
            mime_type: dto.mime_type,
            file_size_bytes: dto.file_size_bytes,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    /// Signed `PUT` target, valid for 15 minutes
    pub upload_url: String,
    pub public_url: String,
}

impl From<UploadUrls> for UploadUrlResponse {
    fn from(urls: UploadUrls) -> Self {
        Self {
            upload_url: urls.upload_url,
            public_url: urls.public_url,
        }
    }
}

//
// ──────────────────────────────────────────────────────────
// Route
// ──────────────────────────────────────────────────────────
//

/// Signed upload URL for an image
///
/// The browser uploads the file straight to object storage, then saves the
/// returned `publicUrl` on the project or profile.
#[utoipa::path(
    post,
    path = "/api/admin/media/upload-url",
    tag = "media",
    request_body = UploadUrlRequestDto,
    responses(
        (status = 200, description = "Signed URL", body = inline(SuccessResponse<UploadUrlResponse>)),
        (status = 400, description = "Not an image or too large", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 502, description = "Storage unavailable", body = ErrorResponse),
    ),
    security(("BearerAuth" = []))
)]
#[post("/api/admin/media/upload-url")]
pub async fn create_upload_url_handler(
    admin: AdminUser,
    data: web::Data<AppState>,
    payload: web::Json<UploadUrlRequestDto>,
) -> impl Responder {
    match data
        .create_upload_url_use_case
        .execute(payload.into_inner().into())
        .await
    {
        Ok(urls) => {
            info!(account_id = %admin.account_id, public_url = %urls.public_url, "Upload URL issued");
            ApiResponse::success(UploadUrlResponse::from(urls))
        }
        Err(err) => map_upload_url_error(err),
    }
}

//
// ──────────────────────────────────────────────────────────
// Error Mapping
// ──────────────────────────────────────────────────────────
//

fn map_upload_url_error(err: CreateUploadUrlError) -> HttpResponse {
    match err {
        CreateUploadUrlError::Invalid(errors) => ApiResponse::validation_failed(errors.fields()),
        CreateUploadUrlError::Storage(SignUrlError::Configuration) => {
            error!("Object storage is misconfigured");
            ApiResponse::internal_error()
        }
        CreateUploadUrlError::Storage(e) => {
            error!("Signing upload URL failed: {}", e);
            ApiResponse::bad_gateway("STORAGE_UNAVAILABLE", "Could not prepare the upload")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::media::application::use_cases::create_upload_url::ICreateUploadUrlUseCase;
    use crate::shared::validation::ValidationErrors;
    use crate::tests::support::app_state_builder::TestAppStateBuilder;
    use crate::tests::support::auth_helper::{bearer, token_data};
    use actix_web::{http::StatusCode, test, App};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct MockUploadUrlUseCase {
        result: Result<UploadUrls, CreateUploadUrlError>,
    }

    #[async_trait]
    impl ICreateUploadUrlUseCase for MockUploadUrlUseCase {
        async fn execute(&self, _form: UploadForm) -> Result<UploadUrls, CreateUploadUrlError> {
            self.result.clone()
        }
    }

    async fn call(
        result: Result<UploadUrls, CreateUploadUrlError>,
        authorized: bool,
    ) -> (StatusCode, Value) {
        let state = TestAppStateBuilder::default()
            .with_upload_url(MockUploadUrlUseCase { result })
            .build();
        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(token_data())
                .service(create_upload_url_handler),
        )
        .await;

        let mut req = test::TestRequest::post()
            .uri("/api/admin/media/upload-url")
            .set_json(json!({
                "fileName": "avatar.png",
                "mimeType": "image/png",
                "fileSizeBytes": 1024
            }));
        if authorized {
            req = req.insert_header(bearer());
        }

        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let body = if status == StatusCode::UNAUTHORIZED {
            Value::Null
        } else {
            test::read_body_json(resp).await
        };
        (status, body)
    }

    #[actix_web::test]
    async fn returns_upload_and_public_urls() {
        let (status, body) = call(
            Ok(UploadUrls {
                upload_url: "https://signed".into(),
                public_url: "https://public/x.png".into(),
            }),
            true,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["uploadUrl"], "https://signed");
        assert_eq!(body["data"]["publicUrl"], "https://public/x.png");
    }

    #[actix_web::test]
    async fn policy_violation_is_validation_failure() {
        let (status, body) = call(
            Err(CreateUploadUrlError::Invalid(ValidationErrors::single(
                "mimeType",
                "Only image uploads are allowed",
            ))),
            true,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["fields"]["mimeType"], "Only image uploads are allowed");
    }

    #[actix_web::test]
    async fn storage_outage_is_bad_gateway() {
        let (status, body) = call(Err(SignUrlError::Infrastructure.into()), true).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "STORAGE_UNAVAILABLE");
    }

    #[actix_web::test]
    async fn anonymous_caller_is_rejected() {
        let (status, _) = call(Err(SignUrlError::Infrastructure.into()), false).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
