use crate::app::notifier::ListenerStream;
use crate::transport::http::types::AppState;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use std::convert::Infallible;
use tokio_stream::{Stream, StreamExt};

/// Long-lived server-push channel. Each broadcast arrives as one SSE
/// event named after the changed topic; listeners re-fetch on receipt.
/// Disconnecting drops the stream, which unregisters the listener.
pub async fn stream_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let updates = ListenerStream::new(state.notifier.clone())
        .map(|topic| Ok(Event::default().event(topic).data("update")));
    Sse::new(updates).keep_alive(KeepAlive::default())
}
