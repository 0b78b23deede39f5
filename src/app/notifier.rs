//! Fan-out of change events to connected live-update listeners.
//!
//! The notifier is an explicit object constructed at startup and passed
//! to request handlers through the application state, never a global.
//! Delivery is fire-and-forget: at most once, no replay for listeners
//! that connect later, no acknowledgement.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::Stream;
use tracing::debug;

/// Token identifying one registered listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerHandle {
    id: u64,
}

#[derive(Debug, Default)]
pub struct ChangeNotifier {
    next_id: AtomicU64,
    listeners: Mutex<HashMap<u64, mpsc::UnboundedSender<String>>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener and returns its handle plus the receiving
    /// end the events arrive on.
    pub fn subscribe(&self) -> (ListenerHandle, mpsc::UnboundedReceiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock_listeners().insert(id, tx);
        (ListenerHandle { id }, rx)
    }

    /// Removes a listener. Safe to call after the connection has
    /// already gone away (or twice).
    pub fn unsubscribe(&self, handle: &ListenerHandle) {
        self.lock_listeners().remove(&handle.id);
    }

    /// Sends `topic` to every registered listener. A listener whose
    /// receiving end is gone is dropped from the registry; its failure
    /// never reaches the remaining listeners or the caller.
    pub fn broadcast(&self, topic: &str) {
        self.lock_listeners().retain(|id, tx| {
            if tx.send(topic.to_string()).is_ok() {
                true
            } else {
                debug!(listener = id, "dropping disconnected listener");
                false
            }
        });
    }

    pub fn listener_count(&self) -> usize {
        self.lock_listeners().len()
    }

    fn lock_listeners(&self) -> std::sync::MutexGuard<'_, HashMap<u64, mpsc::UnboundedSender<String>>> {
        // A poisoning panic cannot leave the registry inconsistent;
        // keep serving the map as-is.
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A subscription viewed as a stream of topics. Dropping the stream
/// (the listener disconnected) unregisters it.
pub struct ListenerStream {
    notifier: Arc<ChangeNotifier>,
    handle: ListenerHandle,
    rx: UnboundedReceiverStream<String>,
}

impl ListenerStream {
    pub fn new(notifier: Arc<ChangeNotifier>) -> Self {
        let (handle, rx) = notifier.subscribe();
        ListenerStream {
            notifier,
            handle,
            rx: UnboundedReceiverStream::new(rx),
        }
    }
}

impl Stream for ListenerStream {
    type Item = String;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().rx).poll_next(cx)
    }
}

impl Drop for ListenerStream {
    fn drop(&mut self) {
        self.notifier.unsubscribe(&self.handle);
    }
}
