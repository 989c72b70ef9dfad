//! Operator notifications

use chrono::Utc;
use playdeck_api_types::{Notification, NotificationKind, RecordId};
use playdeck_interfaces::NotificationSink;
use tracing::debug;

use crate::error::StorageResult;
use crate::registry::Registry;

/// The notification list the dashboard polls
pub type NotificationCenter = Registry<Notification>;

impl Registry<Notification> {
    /// Append an unread notification
    pub fn push(&self, kind: NotificationKind, message: impl Into<String>) -> Notification {
        let message = message.into();
        self.insert_with(|id| Notification {
            id,
            kind,
            message,
            read: false,
            created_at: Utc::now(),
        })
    }

    pub fn mark_read(&self, id: RecordId) -> StorageResult<Notification> {
        self.update(id, |notification| notification.read = true)
    }

    pub fn unread_count(&self) -> usize {
        self.list_where(|notification| !notification.read).len()
    }
}

impl NotificationSink for Registry<Notification> {
    fn emit(&self, kind: NotificationKind, message: String) {
        let notification = self.push(kind, message);
        debug!(notification_id = notification.id, kind = %kind, "Notification emitted");
    }
}
