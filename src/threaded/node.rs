use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;

use crate::{BoxedListener, Event, ListenerId, SharedListener};

/// One slot of the chain arena: the listener behind a shared mutex, its
/// optional tag, and the link to the next node.
///
/// The mutex lets a background dispatch task borrow the listener while the
/// chain keeps addressing the slot by id.
pub(crate) struct ChainNode {
    tag: Option<String>,
    listener: SharedListener,
    next: Option<ListenerId>,
}

impl ChainNode {
    pub(crate) fn new(tag: Option<String>, listener: BoxedListener) -> Self {
        Self {
            tag,
            listener: Arc::new(Mutex::new(listener)),
            next: None,
        }
    }

    pub(crate) fn tag(&self) -> Option<&String> {
        self.tag.as_ref()
    }

    #[inline]
    pub(crate) fn next(&self) -> Option<ListenerId> {
        self.next
    }

    #[inline]
    pub(crate) fn set_next(&mut self, next: Option<ListenerId>) {
        self.next = next;
    }

    /// Invoke the listener for one event and return its handled signal.
    ///
    /// A poisoned slot is recovered rather than propagated; the chain walk
    /// must go on.
    #[inline]
    pub(crate) fn deliver(&self, event: &Event) -> bool {
        let mut listener = self.listener.lock().unwrap_or_else(PoisonError::into_inner);
        listener.on_event(event)
    }

    /// Invoke the listener on its own spawned task and return the handle.
    ///
    /// The slot is cloned into the task, so the node may be detached while
    /// the call is still in flight.
    pub(crate) fn background_deliver(&self, event: Event) -> JoinHandle<bool> {
        let listener = Arc::clone(&self.listener);
        tokio::spawn(async move {
            let mut listener = listener.lock().unwrap_or_else(PoisonError::into_inner);
            listener.on_event(&event)
        })
    }

    pub(crate) fn into_shared(self) -> SharedListener {
        self.listener
    }
}

impl std::fmt::Debug for ChainNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainNode")
            .field("tag", &self.tag)
            .field("next", &self.next)
            .finish()
    }
}
