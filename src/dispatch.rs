#[cfg(not(feature = "threaded"))]
extern crate alloc;
#[cfg(not(feature = "threaded"))]
use alloc::string::String;

#[cfg(feature = "threaded")]
use futures::future::BoxFuture;

use crate::{BoxedListener, ChainError, Event};
#[cfg(feature = "threaded")]
use crate::SharedListener;

/// Handle identifying one listener attached to a chain.
///
/// Ids are handed out by [`EventDispatcher::attach`] and are never reused
/// after a detach, so a stale handle is reported as
/// [`ChainError::ListenerNotFound`] instead of silently addressing a
/// different listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) usize);

impl core::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a `true` handled signal means to the chain walk.
///
/// The listener contract leaves this open, so the chain makes it an explicit,
/// documented parameter instead of an implicit convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchPolicy {
    /// Stop the walk at the first listener that returns `true`.
    #[default]
    FirstWins,
    /// Visit every listener; `true` returns are counted, not short-circuited.
    Broadcast,
}

/// Report of a single chain traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
    /// Listeners visited during the walk.
    pub visited: usize,
    /// Listeners that returned the handled signal.
    pub handled: usize,
    /// The first listener that returned the handled signal, if any.
    pub handled_by: Option<ListenerId>,
}

impl DispatchOutcome {
    /// Returns `true` if at least one listener handled the event.
    #[inline]
    pub fn is_handled(&self) -> bool {
        self.handled > 0
    }
}

/// Defines the contract for the listener chain that delivers robot events.
///
/// Implementors own their listeners in an id-linked arena: attaching yields a
/// [`ListenerId`], links are edges between ids, and a dispatch walks the
/// chain from [`head`](EventDispatcher::head) in link order invoking
/// [`EventListener::on_event`](crate::EventListener::on_event) on each node.
///
/// The chain is expected to be assembled once at startup and then only
/// traversed; linkage methods exist for that assembly and for test rigs, not
/// for restructuring mid-dispatch.
#[cfg(not(feature = "threaded"))]
pub trait EventDispatcher {
    /// Attaches a listener at the tail of the chain.
    ///
    /// # Parameters
    /// * `tag` - An optional tag for identifying the listener in logs.
    /// * `listener` - The listener to take ownership of.
    ///
    /// # Returns
    /// * `Ok(ListenerId)` if the listener was attached successfully.
    /// * `Err(ChainError::OverloadedChain)` if attaching would exceed the
    ///   maximum allowed listeners for the chain.
    fn attach(
        &mut self,
        tag: Option<String>,
        listener: BoxedListener,
    ) -> Result<ListenerId, ChainError>;

    /// Detaches a listener, re-linking its predecessor to its successor.
    ///
    /// # Parameters
    /// * `id` - The listener to detach.
    ///
    /// # Returns
    /// * `Ok(BoxedListener)` with the listener handed back to the caller.
    /// * `Err(ChainError::ListenerNotFound)` if the id is not attached.
    fn detach(&mut self, id: ListenerId) -> Result<BoxedListener, ChainError>;

    /// Gets the number of listeners currently attached to the chain.
    fn listener_count(&self) -> usize;

    /// Returns `true` if the chain has any attached listeners.
    fn has_listeners(&self) -> bool {
        self.listener_count() > 0
    }

    /// Sets the maximum number of listeners allowed on the chain.
    fn set_max_listeners(&mut self, max: usize);

    /// Gets the current maximum number of listeners allowed on the chain.
    fn max_listeners(&self) -> usize;

    /// Gets the first listener of the chain, or `None` if the chain is empty.
    fn head(&self) -> Option<ListenerId>;

    /// Gets the listener linked after `id`.
    ///
    /// # Returns
    /// * `Ok(Some(ListenerId))` - the next listener in the chain.
    /// * `Ok(None)` - `id` is the last node.
    /// * `Err(ChainError::ListenerNotFound)` if the id is not attached.
    fn next(&self, id: ListenerId) -> Result<Option<ListenerId>, ChainError>;

    /// Links `next` after `id`, replacing whatever followed it.
    ///
    /// The caller manages the chain shape; nodes cut loose by a relink stay
    /// attached but are no longer reached from the head.
    ///
    /// # Returns
    /// * `Ok(())` if the link was established.
    /// * `Err(ChainError::ListenerNotFound)` if either id is not attached.
    /// * `Err(ChainError::CycleDetected)` if the link would make the chain
    ///   cyclic.
    fn set_next(&mut self, id: ListenerId, next: Option<ListenerId>) -> Result<(), ChainError>;

    /// Gets the tag a listener was attached with.
    ///
    /// # Returns
    /// * `Ok(Option<String>)` - the tag, if one was given.
    /// * `Err(ChainError::ListenerNotFound)` if the id is not attached.
    fn tag(&self, id: ListenerId) -> Result<Option<String>, ChainError>;

    /// Gets the chain's handled-signal policy.
    fn policy(&self) -> DispatchPolicy;

    /// Sets the chain's handled-signal policy.
    fn set_policy(&mut self, policy: DispatchPolicy);

    /// Delivers an event to the chain, walking from the head in link order.
    ///
    /// # Parameters
    /// * `event` - The event to deliver to each listener.
    ///
    /// # Returns
    /// * `Ok(DispatchOutcome)` describing the walk.
    /// * `Err(ChainError::CycleDetected)` if the traversal guard tripped.
    fn dispatch(&mut self, event: &Event) -> Result<DispatchOutcome, ChainError>;
}

/// Defines the contract for the listener chain that delivers robot events.
///
/// Implementors own their listeners in an id-linked arena: attaching yields a
/// [`ListenerId`], links are edges between ids, and a dispatch walks the
/// chain from [`head`](EventDispatcher::head) in link order invoking
/// [`EventListener::on_event`](crate::EventListener::on_event) on each node.
///
/// The chain is expected to be assembled once at startup and then only
/// traversed; linkage methods exist for that assembly and for test rigs, not
/// for restructuring mid-dispatch.
///
/// # Thread Safety
/// All implementors must be `Send + Sync`.
#[cfg(feature = "threaded")]
pub trait EventDispatcher: Send + Sync {
    /// Attaches a listener at the tail of the chain.
    ///
    /// # Parameters
    /// * `tag` - An optional tag for identifying the listener in logs.
    /// * `listener` - The listener to take ownership of.
    ///
    /// # Returns
    /// * `Ok(ListenerId)` if the listener was attached successfully.
    /// * `Err(ChainError::OverloadedChain)` if attaching would exceed the
    ///   maximum allowed listeners for the chain.
    fn attach(
        &mut self,
        tag: Option<String>,
        listener: BoxedListener,
    ) -> Result<ListenerId, ChainError>;

    /// Detaches a listener, re-linking its predecessor to its successor.
    ///
    /// # Parameters
    /// * `id` - The listener to detach.
    ///
    /// # Returns
    /// * `Ok(SharedListener)` with the listener's slot handed back to the
    ///   caller; it may still be referenced by an in-flight background task.
    /// * `Err(ChainError::ListenerNotFound)` if the id is not attached.
    fn detach(&mut self, id: ListenerId) -> Result<SharedListener, ChainError>;

    /// Gets the number of listeners currently attached to the chain.
    fn listener_count(&self) -> usize;

    /// Returns `true` if the chain has any attached listeners.
    fn has_listeners(&self) -> bool {
        self.listener_count() > 0
    }

    /// Sets the maximum number of listeners allowed on the chain.
    fn set_max_listeners(&mut self, max: usize);

    /// Gets the current maximum number of listeners allowed on the chain.
    fn max_listeners(&self) -> usize;

    /// Gets the first listener of the chain, or `None` if the chain is empty.
    fn head(&self) -> Option<ListenerId>;

    /// Gets the listener linked after `id`.
    ///
    /// # Returns
    /// * `Ok(Some(ListenerId))` - the next listener in the chain.
    /// * `Ok(None)` - `id` is the last node.
    /// * `Err(ChainError::ListenerNotFound)` if the id is not attached.
    fn next(&self, id: ListenerId) -> Result<Option<ListenerId>, ChainError>;

    /// Links `next` after `id`, replacing whatever followed it.
    ///
    /// The caller manages the chain shape; nodes cut loose by a relink stay
    /// attached but are no longer reached from the head.
    ///
    /// # Returns
    /// * `Ok(())` if the link was established.
    /// * `Err(ChainError::ListenerNotFound)` if either id is not attached.
    /// * `Err(ChainError::CycleDetected)` if the link would make the chain
    ///   cyclic.
    fn set_next(&mut self, id: ListenerId, next: Option<ListenerId>) -> Result<(), ChainError>;

    /// Gets the tag a listener was attached with.
    ///
    /// # Returns
    /// * `Ok(Option<String>)` - the tag, if one was given.
    /// * `Err(ChainError::ListenerNotFound)` if the id is not attached.
    fn tag(&self, id: ListenerId) -> Result<Option<String>, ChainError>;

    /// Gets the chain's handled-signal policy.
    fn policy(&self) -> DispatchPolicy;

    /// Sets the chain's handled-signal policy.
    fn set_policy(&mut self, policy: DispatchPolicy);

    /// Delivers an event to the chain, walking from the head in link order.
    ///
    /// # Parameters
    /// * `event` - The event to deliver to each listener.
    ///
    /// # Returns
    /// * `Ok(DispatchOutcome)` describing the walk.
    /// * `Err(ChainError::CycleDetected)` if the traversal guard tripped.
    fn dispatch(&mut self, event: &Event) -> Result<DispatchOutcome, ChainError>;

    /// Delivers an event to the chain asynchronously.
    ///
    /// Under [`DispatchPolicy::FirstWins`] the walk is always sequential;
    /// stopping at the first handler is an ordering guarantee. Under
    /// [`DispatchPolicy::Broadcast`] with `parallel = true`, each listener
    /// runs in its own spawned task and the results are joined.
    ///
    /// # Parameters
    /// * `event` - The event to deliver to each listener.
    /// * `parallel` - If `true`, broadcast listeners are called in parallel
    ///   (spawned as tasks); if `false`, listeners are called sequentially.
    ///
    /// # Returns
    /// A `BoxFuture` that resolves to:
    /// * `Ok(DispatchOutcome)` describing the walk.
    /// * `Err(ChainError::CycleDetected)` if the traversal guard tripped.
    fn dispatch_async<'a>(
        &'a mut self,
        event: Event,
        parallel: bool,
    ) -> BoxFuture<'a, Result<DispatchOutcome, ChainError>>;
}
