pub mod auth;
pub mod contact;
pub mod media;
pub mod portfolio;
pub mod section;
pub mod store;
