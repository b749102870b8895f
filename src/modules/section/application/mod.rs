pub mod domain;
pub mod section_service;

pub use section_service::SectionContentService;
