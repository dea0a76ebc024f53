use hoso_application::{CacheInvalidator, InvalidationTarget};
use tokio::sync::broadcast;
use tracing::trace;

/// Publishes stale view paths to every connected subscriber.
///
/// Sending never blocks. With no subscribers the notice is dropped, and a
/// lagging subscriber loses its oldest notices once the buffer is full.
#[derive(Debug, Clone)]
pub struct BroadcastCacheInvalidator {
    sender: broadcast::Sender<String>,
}

impl BroadcastCacheInvalidator {
    /// Creates an invalidator buffering up to `capacity` notices per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to stale view paths published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }
}

impl CacheInvalidator for BroadcastCacheInvalidator {
    fn invalidate(&self, target: InvalidationTarget) {
        let path = target.path();
        let receivers = self.sender.send(path.clone()).unwrap_or(0);
        trace!(path = %path, receivers, "view invalidated");
    }
}
