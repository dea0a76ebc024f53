use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::{Stream, StreamExt};
use tracing::warn;

use crate::state::AppState;

const INVALIDATE_EVENT: &str = "invalidate";

/// Streams stale view paths to the dashboard as server-sent events.
pub async fn invalidations_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.invalidator.subscribe()).filter_map(|notice| {
        match notice {
            Ok(path) => Some(Ok(invalidation_event(path))),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                warn!(skipped, "invalidation subscriber lagged behind");
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn invalidation_event(path: String) -> Event {
    Event::default().event(INVALIDATE_EVENT).data(path)
}

#[cfg(test)]
mod tests {
    use hoso_application::{CacheInvalidator, InvalidationTarget};
    use hoso_domain::ModuleKind;
    use hoso_infrastructure::BroadcastCacheInvalidator;
    use tokio_stream::StreamExt;
    use tokio_stream::wrappers::BroadcastStream;

    #[tokio::test]
    async fn subscribers_receive_invalidated_paths() {
        let invalidator = BroadcastCacheInvalidator::new(8);
        let mut stream = BroadcastStream::new(invalidator.subscribe());

        invalidator.invalidate(InvalidationTarget::list_view(
            ModuleKind::CaseDossiers.descriptor(),
        ));

        let received = stream.next().await;
        assert!(matches!(received, Some(Ok(path)) if path == "/data-don-an"));
    }
}
