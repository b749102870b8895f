pub mod get_section;
pub mod reset_section;
pub mod save_section;

pub use get_section::{get_section_handler, get_sections_handler, stream_section_handler};
pub use reset_section::reset_section_handler;
pub use save_section::{save_section_handler, SectionRequestDto};

use crate::modules::section::application::domain::entities::SectionId;
use crate::shared::api::ApiResponse;
use actix_web::HttpResponse;

fn parse_section(raw: &str) -> Result<SectionId, HttpResponse> {
    raw.parse::<SectionId>()
        .map_err(|e| ApiResponse::not_found("UNKNOWN_SECTION", &e.to_string()))
}
