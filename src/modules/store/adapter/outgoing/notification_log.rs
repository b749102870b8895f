use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::Utc;
use tracing::{info, warn};

use crate::modules::store::application::ports::outgoing::{
    Notification, NotificationLevel, Notifier,
};

const DEFAULT_CAPACITY: usize = 100;

/// Keeps the most recent notifications for the admin surface to poll.
#[derive(Debug)]
pub struct NotificationLog {
    capacity: usize,
    entries: Mutex<VecDeque<Notification>>,
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl NotificationLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// Newest last.
    pub fn recent(&self, limit: usize) -> Vec<Notification> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let skip = entries.len().saturating_sub(limit);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, level: NotificationLevel, message: String) {
        match level {
            NotificationLevel::Error => warn!(notification = %message, "error notification"),
            _ => info!(notification = %message, "notification"),
        }

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(Notification {
            level,
            message,
            at: Utc::now(),
        });
    }
}
