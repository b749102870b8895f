use crate::api::schemas::{ErrorDetail, ErrorResponse, SuccessResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::modules::auth::adapter::incoming::web::routes::{
    LoginRequestDto, SessionResponse, SessionUser, SignUpRequestDto,
};
use crate::modules::contact::adapter::incoming::web::routes::ContactRequestDto;
use crate::modules::media::adapter::incoming::web::routes::{
    UploadUrlRequestDto, UploadUrlResponse,
};
use crate::modules::portfolio::adapter::incoming::web::routes::skill_categories::CategoryRequestDto;
use crate::modules::section::adapter::incoming::web::routes::SectionRequestDto;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Folio CMS API",
        version = "1.0.0",
        description = "Public portfolio content and the owner's admin console",
    ),
    paths(
        // Auth
        crate::modules::auth::adapter::incoming::web::routes::login_user::login_user_handler,
        crate::modules::auth::adapter::incoming::web::routes::sign_up_user::sign_up_user_handler,

        // Public portfolio
        crate::modules::portfolio::adapter::incoming::web::routes::public_lists::get_projects_handler,
        crate::modules::portfolio::adapter::incoming::web::routes::public_lists::get_experience_handler,
        crate::modules::portfolio::adapter::incoming::web::routes::public_lists::get_education_handler,
        crate::modules::portfolio::adapter::incoming::web::routes::public_lists::get_skills_handler,
        crate::modules::portfolio::adapter::incoming::web::routes::public_lists::get_skill_categories_handler,
        crate::modules::portfolio::adapter::incoming::web::routes::stream::stream_collection_handler,

        // Sections
        crate::modules::section::adapter::incoming::web::routes::get_section::get_sections_handler,
        crate::modules::section::adapter::incoming::web::routes::get_section::get_section_handler,
        crate::modules::section::adapter::incoming::web::routes::save_section::save_section_handler,
        crate::modules::section::adapter::incoming::web::routes::reset_section::reset_section_handler,

        // Contact
        crate::modules::contact::adapter::incoming::web::routes::send_contact_message::send_contact_message_handler,

        // Admin
        crate::modules::portfolio::adapter::incoming::web::routes::admin_entities::cancel_delete_handler,
        crate::modules::portfolio::adapter::incoming::web::routes::skill_categories::list_skill_categories_handler,
        crate::modules::portfolio::adapter::incoming::web::routes::skill_categories::create_skill_category_handler,
        crate::modules::portfolio::adapter::incoming::web::routes::skill_categories::rename_skill_category_handler,
        crate::modules::portfolio::adapter::incoming::web::routes::skill_categories::request_skill_category_delete_handler,
        crate::modules::portfolio::adapter::incoming::web::routes::skill_categories::delete_skill_category_handler,
        crate::modules::portfolio::adapter::incoming::web::routes::dashboard::dashboard_stats_handler,
        crate::modules::portfolio::adapter::incoming::web::routes::dashboard::seed_dashboard_handler,
        crate::modules::portfolio::adapter::incoming::web::routes::dashboard::reset_dashboard_handler,
        crate::modules::portfolio::adapter::incoming::web::routes::activity::list_notifications_handler,
        crate::modules::portfolio::adapter::incoming::web::routes::activity::list_requests_handler,

        // Media
        crate::modules::media::adapter::incoming::web::routes::create_upload_url::create_upload_url_handler,
    ),
    components(
        schemas(
            SuccessResponse<SessionResponse>,
            SuccessResponse<UploadUrlResponse>,
            ErrorResponse,
            ErrorDetail,

            LoginRequestDto,
            SignUpRequestDto,
            SessionResponse,
            SessionUser,
            SectionRequestDto,
            CategoryRequestDto,
            ContactRequestDto,
            UploadUrlRequestDto,
            UploadUrlResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Owner sign-up and login"),
        (name = "portfolio", description = "Public portfolio lists and live streams"),
        (name = "sections", description = "Editable section text"),
        (name = "contact", description = "Visitor contact form"),
        (name = "admin", description = "Owner console: managers, dashboard, activity"),
        (name = "media", description = "Image uploads"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from /api/auth/login"))
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_paths_are_documented_with_bearer_auth() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/admin/media/upload-url"));
        assert!(doc.paths.paths.contains_key("/api/contact"));
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("BearerAuth")));
    }
}
