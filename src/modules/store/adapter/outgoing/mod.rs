mod change_feed;
mod document_store_memory;
mod document_store_postgres;
mod notification_log;
pub mod sea_orm_entity;

pub use change_feed::ChangeFeed;
pub use document_store_memory::InMemoryDocumentStore;
pub use document_store_postgres::DocumentStorePostgres;
pub use notification_log::NotificationLog;
