use tokio::sync::mpsc;
use tracing::debug;

use crate::tracker::event::Event;

/// Sink consumes emitted events. Emission is fire-and-forget: a sink
/// that cannot accept an event drops it without surfacing an error, and
/// the tracker never retries or buffers.
pub trait EventSink: Send + Sync {
    /// Returns the sink's name for logging.
    fn name(&self) -> &str;

    /// Consume a single event.
    fn emit(&self, event: Event);
}

/// Discards every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn name(&self) -> &str {
        "null"
    }

    fn emit(&self, _event: Event) {}
}

/// Logs each event at debug level as one JSON object.
pub struct LogSink;

impl EventSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    fn emit(&self, event: Event) {
        if let Ok(payload) = serde_json::to_string(&event) {
            debug!(event = %event.name, %payload, "event emitted");
        }
    }
}

/// Forwards events into an unbounded channel. Events emitted after the
/// receiver is gone are dropped.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Event>,
}

impl ChannelSink {
    /// Create a sink and the receiving end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn name(&self) -> &str {
        "channel"
    }

    fn emit(&self, event: Event) {
        let _ = self.tx.send(event);
    }
}
