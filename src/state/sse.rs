use tokio::sync::broadcast;
use tracing::trace;

use crate::dto::sse::ServerEvent;

/// Fan-out of [`ServerEvent`]s to every connected SSE client.
pub struct SseHub {
    sender: broadcast::Sender<ServerEvent>,
}

impl SseHub {
    /// Hub buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// New receiver for events sent from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Queue `event` for current subscribers; with none connected it is dropped.
    pub fn broadcast(&self, event: ServerEvent) {
        match self.sender.send(event) {
            Ok(receivers) => trace!(receivers, "SSE event queued"),
            Err(broadcast::error::SendError(event)) => {
                trace!(event = event.event, "no SSE subscribers; event dropped")
            }
        }
    }
}
