pub mod activity;
pub mod admin_entities;
pub mod dashboard;
pub mod error_mapping;
pub mod public_lists;
pub mod skill_categories;
pub mod stream;

pub use activity::{list_notifications_handler, list_requests_handler};
pub use admin_entities::{admin_entity_routes, cancel_delete_handler};
pub use dashboard::{dashboard_stats_handler, reset_dashboard_handler, seed_dashboard_handler};
pub use error_mapping::map_manager_error;
pub use public_lists::{
    get_education_handler, get_experience_handler, get_projects_handler,
    get_skill_categories_handler, get_skills_handler,
};
pub use skill_categories::{
    create_skill_category_handler, delete_skill_category_handler, list_skill_categories_handler,
    reconcile_skill_categories_handler, rename_skill_category_handler,
    request_skill_category_delete_handler,
};
pub use stream::stream_collection_handler;
