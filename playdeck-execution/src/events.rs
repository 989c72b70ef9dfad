//! Per-run event fan-out
//!
//! Each live run owns a bounded broadcast channel. Publishing is a
//! non-blocking send; a subscriber that falls more than the channel capacity
//! behind loses the oldest events and is told how many it skipped. Closing a
//! run drops its sender, which ends every subscriber's stream once buffered
//! events have been delivered.

use std::collections::HashMap;
use std::pin::Pin;

use parking_lot::Mutex;
use playdeck_api_types::RecordId;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

/// Default number of events buffered per run
pub const DEFAULT_EVENT_BUFFER: usize = 1024;

const COMPLETED_TEXT: &str = "Command completed successfully";

/// One line of a run's live output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// A line the process wrote to stdout
    Output(String),
    /// A line the process wrote to stderr, or a pipeline error
    Error(String),
    /// The process exited successfully
    Completed,
    /// The process exited unsuccessfully
    Failed(String),
}

impl RunEvent {
    /// The text sent to clients for this event
    pub fn to_line(&self) -> String {
        match self {
            RunEvent::Output(line) => line.clone(),
            RunEvent::Error(line) => format!("ERROR: {line}"),
            RunEvent::Completed => COMPLETED_TEXT.to_string(),
            RunEvent::Failed(reason) => format!("ERROR: Command failed: {reason}"),
        }
    }
}

/// A subscriber's view of one run
pub type EventStream = Pin<Box<dyn Stream<Item = RunEvent> + Send>>;

/// Registry of live run channels
pub struct EventBroadcaster {
    channels: Mutex<HashMap<RecordId, broadcast::Sender<RunEvent>>>,
    capacity: usize,
}

impl EventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Create the channel for `run_id` and return its first subscriber
    ///
    /// The subscriber exists before anything can be published, so it sees
    /// every event of the run.
    pub fn open(&self, run_id: RecordId) -> EventStream {
        let (tx, rx) = broadcast::channel(self.capacity);
        self.channels.lock().insert(run_id, tx);
        debug!(run_id, "Event channel opened");
        into_stream(run_id, rx)
    }

    /// Subscribe to a run that is still live
    ///
    /// Only events published after this call are delivered. Returns `None`
    /// when the run is unknown or has already been closed.
    pub fn attach(&self, run_id: RecordId) -> Option<EventStream> {
        let rx = self.channels.lock().get(&run_id)?.subscribe();
        debug!(run_id, "Subscriber attached");
        Some(into_stream(run_id, rx))
    }

    /// Send `event` to every current subscriber of `run_id`
    ///
    /// Returns the number of subscribers that received it. Events for runs
    /// without a channel, or with no subscribers left, are dropped.
    pub fn publish(&self, run_id: RecordId, event: RunEvent) -> usize {
        let channels = self.channels.lock();
        match channels.get(&run_id).map(|tx| tx.send(event)) {
            Some(Ok(receivers)) => receivers,
            Some(Err(_)) => {
                debug!(run_id, "No subscribers for run events");
                0
            }
            None => 0,
        }
    }

    /// Drop the channel for `run_id`, ending all of its streams
    pub fn close(&self, run_id: RecordId) {
        if self.channels.lock().remove(&run_id).is_some() {
            debug!(run_id, "Event channel closed");
        }
    }

    pub fn is_live(&self, run_id: RecordId) -> bool {
        self.channels.lock().contains_key(&run_id)
    }

    pub fn subscriber_count(&self, run_id: RecordId) -> usize {
        self.channels
            .lock()
            .get(&run_id)
            .map_or(0, |tx| tx.receiver_count())
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER)
    }
}

fn into_stream(run_id: RecordId, rx: broadcast::Receiver<RunEvent>) -> EventStream {
    Box::pin(BroadcastStream::new(rx).filter_map(move |item| match item {
        Ok(event) => Some(event),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            warn!(run_id, skipped, "Run event subscriber lagged");
            None
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_lines() {
        assert_eq!(RunEvent::Output("ok: [web-01]".into()).to_line(), "ok: [web-01]");
        assert_eq!(RunEvent::Error("boom".into()).to_line(), "ERROR: boom");
        assert_eq!(RunEvent::Completed.to_line(), "Command completed successfully");
        assert_eq!(
            RunEvent::Failed("exit status: 2".into()).to_line(),
            "ERROR: Command failed: exit status: 2"
        );
    }

    #[tokio::test]
    async fn test_stream_ends_after_close() {
        let broadcaster = EventBroadcaster::default();
        let stream = broadcaster.open(1);

        assert_eq!(broadcaster.publish(1, RunEvent::Output("a".into())), 1);
        broadcaster.publish(1, RunEvent::Completed);
        broadcaster.close(1);

        let events: Vec<_> = stream.collect().await;
        assert_eq!(events, vec![RunEvent::Output("a".into()), RunEvent::Completed]);
        assert!(!broadcaster.is_live(1));
    }

    #[tokio::test]
    async fn test_every_subscriber_sees_events_in_order() {
        let broadcaster = EventBroadcaster::default();
        let first = broadcaster.open(7);
        let second = broadcaster.attach(7).unwrap();
        assert_eq!(broadcaster.subscriber_count(7), 2);

        for i in 0..10 {
            broadcaster.publish(7, RunEvent::Output(i.to_string()));
        }
        broadcaster.close(7);

        let expected: Vec<_> = (0..10).map(|i| RunEvent::Output(i.to_string())).collect();
        assert_eq!(first.collect::<Vec<_>>().await, expected);
        assert_eq!(second.collect::<Vec<_>>().await, expected);
    }

    #[tokio::test]
    async fn test_attach_to_closed_or_unknown_run() {
        let broadcaster = EventBroadcaster::default();
        assert!(broadcaster.attach(3).is_none());

        let _stream = broadcaster.open(3);
        broadcaster.close(3);
        assert!(broadcaster.attach(3).is_none());
        assert_eq!(broadcaster.publish(3, RunEvent::Completed), 0);
    }

    #[tokio::test]
    async fn test_slow_subscriber_skips_oldest_events() {
        let broadcaster = EventBroadcaster::new(4);
        let stream = broadcaster.open(1);

        for i in 0..10 {
            broadcaster.publish(1, RunEvent::Output(i.to_string()));
        }
        broadcaster.publish(1, RunEvent::Completed);
        broadcaster.close(1);

        let events: Vec<_> = stream.collect().await;
        assert!(events.len() <= 4);
        assert_eq!(events.last(), Some(&RunEvent::Completed));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_does_not_block() {
        let broadcaster = EventBroadcaster::new(2);
        drop(broadcaster.open(1));
        for _ in 0..100 {
            assert_eq!(broadcaster.publish(1, RunEvent::Output("x".into())), 0);
        }
        assert!(broadcaster.is_live(1));
    }
}
