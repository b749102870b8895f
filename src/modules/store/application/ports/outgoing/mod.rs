mod document_store;
mod notifier;

pub use document_store::{DocumentStore, DocumentStoreError};
pub use notifier::{Notification, NotificationLevel, Notifier};
