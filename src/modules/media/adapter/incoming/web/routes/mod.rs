pub mod create_upload_url;

pub use create_upload_url::{create_upload_url_handler, UploadUrlRequestDto, UploadUrlResponse};
