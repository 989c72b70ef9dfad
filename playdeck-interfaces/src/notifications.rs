//! Notification side channel

use playdeck_api_types::NotificationKind;

/// Receiver for operator-facing notifications
///
/// The run pipeline calls [`NotificationSink::emit`] exactly once per run,
/// when the run reaches its terminal state. Implementations must not block.
pub trait NotificationSink: Send + Sync {
    fn emit(&self, kind: NotificationKind, message: String);
}

/// Discards everything; useful where notifications are irrelevant
impl NotificationSink for () {
    fn emit(&self, _kind: NotificationKind, _message: String) {}
}
