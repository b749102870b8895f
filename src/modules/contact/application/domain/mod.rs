pub mod contact_message;

pub use contact_message::{ContactForm, ContactMessage, MIN_MESSAGE_LEN};
