pub mod gcs_image_storage;

pub use gcs_image_storage::GcsImageStorage;
