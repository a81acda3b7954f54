use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use futures::future::{join_all, BoxFuture};
use log::{debug, trace, warn};

use super::node::ChainNode;
use crate::{
    BoxedListener, ChainError, DispatchOutcome, DispatchPolicy, Event, EventDispatcher,
    ListenerId, SharedListener,
};

/// Sentinel for "no head"; listener ids are arena indices and never reach it.
const NO_HEAD: usize = usize::MAX;

/// A dispatch chain that owns robot-event listeners and delivers each event
/// to them in link order.
///
/// This struct implements the `EventDispatcher` trait and provides
/// thread-safe chain management using a `DashMap` arena keyed by id, with
/// the chain shape carried as links between ids.
///
/// # Implementation Notes
/// - Uses `DashMap` for concurrent, lock-free listener storage; the head and
///   id counter are shared atomics.
/// - Clones share the arena and chain shape; `max_listeners` and the
///   dispatch policy are per-handle.
/// - Listeners sit behind `Arc<Mutex<_>>` slots so parallel broadcast can
///   hand each one to its own task.
#[derive(Clone)]
pub struct EventChain {
    /// The maximum number of listeners allowed on the chain.
    max_listeners: usize,
    /// What a `true` handled signal means to a walk.
    policy: DispatchPolicy,
    /// First node of the chain, or `NO_HEAD`.
    head: Arc<AtomicUsize>,
    /// Next id to hand out.
    next_id: Arc<AtomicUsize>,
    /// The arena of attached listeners.
    nodes: Arc<DashMap<usize, ChainNode>>,
}

impl EventChain {
    /// Creates a new `EventChain` from a passed max listeners value, with
    /// the default [`DispatchPolicy::FirstWins`] policy.
    ///
    /// # Example
    ///
    /// ```
    /// use bot_events::{EventChain, EventDispatcher};
    ///
    /// let chain = EventChain::new(20);
    /// assert_eq!(chain.max_listeners(), 20);
    /// assert!(!chain.has_listeners());
    /// ```
    pub fn new(max_listeners: usize) -> Self {
        Self::with_policy(max_listeners, DispatchPolicy::default())
    }

    /// Creates a new `EventChain` with an explicit dispatch policy.
    ///
    /// # Example
    ///
    /// ```
    /// use bot_events::{DispatchPolicy, EventChain, EventDispatcher};
    ///
    /// let chain = EventChain::with_policy(8, DispatchPolicy::Broadcast);
    /// assert_eq!(chain.policy(), DispatchPolicy::Broadcast);
    /// ```
    pub fn with_policy(max_listeners: usize, policy: DispatchPolicy) -> Self {
        Self {
            max_listeners,
            policy,
            head: Arc::new(AtomicUsize::new(NO_HEAD)),
            next_id: Arc::new(AtomicUsize::new(0)),
            nodes: Arc::new(DashMap::new()),
        }
    }

    fn head_id(&self) -> Option<ListenerId> {
        match self.head.load(Ordering::SeqCst) {
            NO_HEAD => None,
            id => Some(ListenerId(id)),
        }
    }

    fn next_of(&self, id: ListenerId) -> Option<ListenerId> {
        self.nodes.get(&id.0).and_then(|node| node.next())
    }

    /// Last node reachable from the head, or `None` for an empty chain.
    fn tail(&self) -> Option<ListenerId> {
        let mut cursor = self.head_id();
        let mut last = None;
        let mut steps = 0;
        while let Some(id) = cursor {
            // The arena is larger than any acyclic chain through it.
            if steps > self.nodes.len() {
                return last;
            }
            steps += 1;
            last = Some(id);
            cursor = self.next_of(id);
        }
        last
    }

    /// Whether linking `from -> to` would close a cycle, i.e. whether `from`
    /// is reachable by walking the links out of `to`.
    fn would_cycle(&self, from: ListenerId, to: ListenerId) -> bool {
        let mut cursor = Some(to);
        let mut steps = 0;
        while let Some(id) = cursor {
            if id == from {
                return true;
            }
            if steps > self.nodes.len() {
                return true;
            }
            steps += 1;
            cursor = self.next_of(id);
        }
        false
    }

    /// Chain ids from head in link order, with the same non-termination
    /// guard as a dispatch walk.
    fn chain_order(&self) -> Result<Vec<ListenerId>, ChainError> {
        let mut ids = Vec::new();
        let mut cursor = self.head_id();
        while let Some(id) = cursor {
            if ids.len() >= self.nodes.len() {
                return Err(ChainError::CycleDetected);
            }
            if !self.nodes.contains_key(&id.0) {
                return Err(ChainError::ListenerNotFound);
            }
            ids.push(id);
            cursor = self.next_of(id);
        }
        Ok(ids)
    }
}

impl EventDispatcher for EventChain {
    /// Attaches a listener at the tail of the chain.
    ///
    /// The fresh node has no next link; if the chain was non-empty, the old
    /// tail is linked to it.
    ///
    /// # Parameters
    /// * `tag` - An optional tag for identifying the listener in logs.
    /// * `listener` - The listener to take ownership of.
    ///
    /// # Returns
    /// * `Ok(ListenerId)` if the listener was attached successfully.
    /// * `Err(ChainError::OverloadedChain)` if the chain has reached its
    ///   listener limit.
    ///
    /// # Example
    /// ```
    /// use bot_events::{EventChain, EventDispatcher, EventListener};
    ///
    /// struct Silent;
    /// impl EventListener for Silent {}
    ///
    /// let mut chain = EventChain::new(10);
    /// let id = chain.attach(Some("display".into()), Box::new(Silent)).unwrap();
    ///
    /// assert_eq!(chain.head(), Some(id));
    /// assert_eq!(chain.next(id).unwrap(), None);
    /// assert_eq!(chain.tag(id).unwrap(), Some("display".into()));
    /// ```
    fn attach(
        &mut self,
        tag: Option<String>,
        listener: BoxedListener,
    ) -> Result<ListenerId, ChainError> {
        if self.nodes.len() >= self.max_listeners {
            return Err(ChainError::OverloadedChain);
        }
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::SeqCst));

        self.nodes.insert(id.0, ChainNode::new(tag, listener));
        // The fresh node is unreachable until linked, so the tail walk still
        // ends at the old tail.
        if self
            .head
            .compare_exchange(NO_HEAD, id.0, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            if let Some(tail) = self.tail().filter(|tail| *tail != id) {
                if let Some(mut node) = self.nodes.get_mut(&tail.0) {
                    node.set_next(Some(id));
                }
            }
        }
        debug!("listener {} attached ({} on chain)", id, self.nodes.len());
        Ok(id)
    }

    /// Detaches a listener, re-linking its predecessor to its successor.
    ///
    /// # Parameters
    /// * `id` - The listener to detach.
    ///
    /// # Returns
    /// * `Ok(SharedListener)` with the listener's slot handed back to the
    ///   caller.
    /// * `Err(ChainError::ListenerNotFound)` if the id is not attached.
    ///
    /// # Example
    /// ```
    /// use bot_events::{EventChain, EventDispatcher, EventListener};
    ///
    /// struct Silent;
    /// impl EventListener for Silent {}
    ///
    /// let mut chain = EventChain::new(10);
    /// let first = chain.attach(None, Box::new(Silent)).unwrap();
    /// let second = chain.attach(None, Box::new(Silent)).unwrap();
    ///
    /// chain.detach(first).unwrap();
    /// assert_eq!(chain.head(), Some(second));
    /// assert_eq!(chain.listener_count(), 1);
    /// ```
    fn detach(&mut self, id: ListenerId) -> Result<SharedListener, ChainError> {
        let (_, node) = self
            .nodes
            .remove(&id.0)
            .ok_or(ChainError::ListenerNotFound)?;
        let successor = node.next().map(|n| n.0).unwrap_or(NO_HEAD);
        let _ = self
            .head
            .compare_exchange(id.0, successor, Ordering::SeqCst, Ordering::SeqCst);
        for mut other in self.nodes.iter_mut() {
            if other.next() == Some(id) {
                other.set_next(node.next());
            }
        }
        debug!("listener {} detached ({} on chain)", id, self.nodes.len());
        Ok(node.into_shared())
    }

    fn listener_count(&self) -> usize {
        self.nodes.len()
    }

    fn set_max_listeners(&mut self, max: usize) {
        self.max_listeners = max;
    }

    fn max_listeners(&self) -> usize {
        self.max_listeners
    }

    fn head(&self) -> Option<ListenerId> {
        self.head_id()
    }

    fn next(&self, id: ListenerId) -> Result<Option<ListenerId>, ChainError> {
        self.nodes
            .get(&id.0)
            .map(|node| node.next())
            .ok_or(ChainError::ListenerNotFound)
    }

    /// Links `next` after `id`, replacing whatever followed it.
    ///
    /// # Returns
    /// * `Ok(())` if the link was established.
    /// * `Err(ChainError::ListenerNotFound)` if either id is not attached.
    /// * `Err(ChainError::CycleDetected)` if the link would make the chain
    ///   cyclic.
    ///
    /// # Example
    /// ```
    /// use bot_events::{ChainError, EventChain, EventDispatcher, EventListener};
    ///
    /// struct Silent;
    /// impl EventListener for Silent {}
    ///
    /// let mut chain = EventChain::new(10);
    /// let a = chain.attach(None, Box::new(Silent)).unwrap();
    /// let b = chain.attach(None, Box::new(Silent)).unwrap();
    ///
    /// // Closing the loop back onto the head is refused.
    /// assert_eq!(chain.set_next(b, Some(a)), Err(ChainError::CycleDetected));
    /// ```
    fn set_next(&mut self, id: ListenerId, next: Option<ListenerId>) -> Result<(), ChainError> {
        if !self.nodes.contains_key(&id.0) {
            return Err(ChainError::ListenerNotFound);
        }
        if let Some(next_id) = next {
            if !self.nodes.contains_key(&next_id.0) {
                return Err(ChainError::ListenerNotFound);
            }
            if self.would_cycle(id, next_id) {
                warn!("link {} -> {} rejected: chain would cycle", id, next_id);
                return Err(ChainError::CycleDetected);
            }
        }
        if let Some(mut node) = self.nodes.get_mut(&id.0) {
            node.set_next(next);
        }
        Ok(())
    }

    fn tag(&self, id: ListenerId) -> Result<Option<String>, ChainError> {
        self.nodes
            .get(&id.0)
            .map(|node| node.tag().cloned())
            .ok_or(ChainError::ListenerNotFound)
    }

    fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    fn set_policy(&mut self, policy: DispatchPolicy) {
        self.policy = policy;
    }

    /// Delivers an event to the chain, walking from the head in link order.
    ///
    /// Under [`DispatchPolicy::FirstWins`] the walk stops at the first
    /// listener returning `true`; under [`DispatchPolicy::Broadcast`] every
    /// node is visited.
    ///
    /// # Parameters
    /// * `event` - The event to deliver to each listener.
    ///
    /// # Returns
    /// * `Ok(DispatchOutcome)` describing the walk.
    /// * `Err(ChainError::CycleDetected)` if more nodes were visited than
    ///   the chain holds.
    ///
    /// # Example
    /// ```
    /// use bot_events::{Event, EventChain, EventDispatcher, EventListener};
    ///
    /// struct Greedy;
    /// impl EventListener for Greedy {
    ///     fn program_finished(&mut self) -> bool { true }
    /// }
    ///
    /// let mut chain = EventChain::new(10);
    /// let id = chain.attach(None, Box::new(Greedy)).unwrap();
    ///
    /// let outcome = chain.dispatch(&Event::ProgramFinished).unwrap();
    /// assert!(outcome.is_handled());
    /// assert_eq!(outcome.handled_by, Some(id));
    /// ```
    fn dispatch(&mut self, event: &Event) -> Result<DispatchOutcome, ChainError> {
        trace!(
            "dispatching {} to {} listener(s)",
            event.name(),
            self.nodes.len()
        );
        let mut outcome = DispatchOutcome::default();
        let mut cursor = self.head_id();
        while let Some(id) = cursor {
            if outcome.visited >= self.nodes.len() {
                warn!("dispatch of {} did not terminate", event.name());
                return Err(ChainError::CycleDetected);
            }
            let (handled, next) = {
                let node = self.nodes.get(&id.0).ok_or(ChainError::ListenerNotFound)?;
                (node.deliver(event), node.next())
            };
            outcome.visited += 1;
            if handled {
                outcome.handled += 1;
                if outcome.handled_by.is_none() {
                    outcome.handled_by = Some(id);
                }
                if self.policy == DispatchPolicy::FirstWins {
                    trace!("{} consumed by listener {}", event.name(), id);
                    break;
                }
            }
            cursor = next;
        }
        Ok(outcome)
    }

    /// Delivers an event to the chain asynchronously.
    ///
    /// Under [`DispatchPolicy::FirstWins`] the walk is always sequential;
    /// stopping at the first handler is an ordering guarantee that parallel
    /// execution cannot provide. Under [`DispatchPolicy::Broadcast`] with
    /// `parallel = true`, every listener is handed to its own spawned task
    /// and the handled signals are joined.
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
    ///
    /// # Example
    /// ```
    /// use bot_events::{DispatchPolicy, Event, EventChain, EventDispatcher, EventListener};
    ///
    /// struct Greedy;
    /// impl EventListener for Greedy {
    ///     fn program_reset(&mut self) -> bool { true }
    /// }
    ///
    /// # tokio_test::block_on(async {
    /// let mut chain = EventChain::with_policy(10, DispatchPolicy::Broadcast);
    /// chain.attach(None, Box::new(Greedy)).unwrap();
    /// chain.attach(None, Box::new(Greedy)).unwrap();
    ///
    /// let outcome = chain.dispatch_async(Event::ProgramReset, true).await.unwrap();
    /// assert_eq!(outcome.visited, 2);
    /// assert_eq!(outcome.handled, 2);
    /// # })
    /// ```
    fn dispatch_async<'a>(
        &'a mut self,
        event: Event,
        parallel: bool,
    ) -> BoxFuture<'a, Result<DispatchOutcome, ChainError>> {
        Box::pin(async move {
            if self.policy == DispatchPolicy::FirstWins || !parallel {
                return self.dispatch(&event);
            }
            let ids = self.chain_order()?;
            trace!(
                "dispatching {} to {} listener(s) in parallel",
                event.name(),
                ids.len()
            );
            let handles = ids
                .iter()
                .filter_map(|id| self.nodes.get(&id.0))
                .map(|node| node.background_deliver(event))
                .collect::<Vec<_>>();
            let results = join_all(handles).await;

            let mut outcome = DispatchOutcome {
                visited: ids.len(),
                ..DispatchOutcome::default()
            };
            for (id, result) in ids.iter().zip(results) {
                match result {
                    Ok(true) => {
                        outcome.handled += 1;
                        if outcome.handled_by.is_none() {
                            outcome.handled_by = Some(*id);
                        }
                    }
                    Ok(false) => {}
                    Err(e) => warn!("listener {} task failed: {}", id, e),
                }
            }
            Ok(outcome)
        })
    }
}

impl Default for EventChain {
    /// Creates a new `EventChain` with a default max listeners of 10.
    ///
    /// # Example
    ///
    /// ```
    /// use bot_events::{EventChain, EventDispatcher};
    ///
    /// let chain = EventChain::default();
    /// assert_eq!(chain.max_listeners(), 10);
    /// ```
    fn default() -> Self {
        Self::new(10)
    }
}

impl std::fmt::Debug for EventChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChain")
            .field("policy", &self.policy)
            .field("head", &self.head_id())
            .field("listeners", &self.nodes.len())
            .finish()
    }
}
