extern crate alloc;
use alloc::string::String;

use crate::{BoxedListener, Event, ListenerId};

/// One slot of the chain arena: the owned listener, its optional tag, and
/// the link to the next node.
pub(crate) struct ChainNode {
    tag: Option<String>,
    listener: BoxedListener,
    next: Option<ListenerId>,
}

impl ChainNode {
    pub(crate) fn new(tag: Option<String>, listener: BoxedListener) -> Self {
        Self {
            tag,
            listener,
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
    #[inline]
    pub(crate) fn deliver(&mut self, event: &Event) -> bool {
        self.listener.on_event(event)
    }

    pub(crate) fn into_listener(self) -> BoxedListener {
        self.listener
    }
}

impl core::fmt::Debug for ChainNode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChainNode")
            .field("tag", &self.tag)
            .field("next", &self.next)
            .finish()
    }
}
