extern crate alloc;
use alloc::{boxed::Box, string::ToString, sync::Arc, vec::Vec};
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    BoxedListener, ChainError, DispatchPolicy, Event, EventChain, EventDispatcher, EventListener,
};

/// A chain probe: records the order it was visited in and how many times,
/// and answers with a fixed handled signal.
struct Spy {
    handled: bool,
    counter: Arc<AtomicUsize>,
    stamp: Arc<AtomicUsize>,
    calls: Arc<AtomicUsize>,
}
impl EventListener for Spy {
    fn on_event(&mut self, _event: &Event) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.stamp
            .store(self.counter.fetch_add(1, Ordering::SeqCst) + 1, Ordering::SeqCst);
        self.handled
    }
}

fn spy(
    handled: bool,
    counter: &Arc<AtomicUsize>,
) -> (BoxedListener, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let stamp = Arc::new(AtomicUsize::new(0));
    let calls = Arc::new(AtomicUsize::new(0));
    let listener = Spy {
        handled,
        counter: Arc::clone(counter),
        stamp: Arc::clone(&stamp),
        calls: Arc::clone(&calls),
    };
    (Box::new(listener), stamp, calls)
}

struct Null;
impl EventListener for Null {}

#[test]
fn fresh_attach_has_no_next() {
    let mut chain = EventChain::default();
    let id = chain.attach(None, Box::new(Null)).unwrap();

    assert_eq!(chain.head(), Some(id));
    assert_eq!(chain.next(id).unwrap(), None);
}

#[test]
fn attach_links_in_order() {
    let mut chain = EventChain::default();
    let a = chain.attach(Some("a".to_string()), Box::new(Null)).unwrap();
    let b = chain.attach(Some("b".to_string()), Box::new(Null)).unwrap();
    let c = chain.attach(None, Box::new(Null)).unwrap();

    assert_eq!(chain.head(), Some(a));
    assert_eq!(chain.next(a).unwrap(), Some(b));
    assert_eq!(chain.next(b).unwrap(), Some(c));
    assert_eq!(chain.next(c).unwrap(), None);
    assert_eq!(chain.listener_count(), 3);
    assert_eq!(chain.tag(b).unwrap(), Some("b".to_string()));
    assert_eq!(chain.tag(c).unwrap(), None);
}

#[test]
fn set_next_stores_the_exact_id() {
    let mut chain = EventChain::default();
    let a = chain.attach(None, Box::new(Null)).unwrap();
    let b = chain.attach(None, Box::new(Null)).unwrap();
    let c = chain.attach(None, Box::new(Null)).unwrap();

    // Skip b entirely.
    chain.set_next(a, Some(c)).unwrap();
    assert_eq!(chain.next(a).unwrap(), Some(c));

    // Clearing the link works too.
    chain.set_next(a, None).unwrap();
    assert_eq!(chain.next(a).unwrap(), None);
    let _ = b;
}

#[test]
fn linkage_rejects_stale_ids() {
    let mut chain = EventChain::default();
    let a = chain.attach(None, Box::new(Null)).unwrap();
    let b = chain.attach(None, Box::new(Null)).unwrap();
    chain.detach(b).unwrap();

    assert_eq!(chain.next(b), Err(ChainError::ListenerNotFound));
    assert_eq!(chain.set_next(a, Some(b)), Err(ChainError::ListenerNotFound));
    assert_eq!(chain.set_next(b, None), Err(ChainError::ListenerNotFound));
    assert_eq!(chain.tag(b), Err(ChainError::ListenerNotFound));
    assert!(chain.detach(b).is_err());
}

#[test]
fn cyclic_links_are_refused() {
    let mut chain = EventChain::default();
    let a = chain.attach(None, Box::new(Null)).unwrap();
    let b = chain.attach(None, Box::new(Null)).unwrap();
    let c = chain.attach(None, Box::new(Null)).unwrap();

    // Self-loop and back-edges both close a cycle.
    assert_eq!(chain.set_next(a, Some(a)), Err(ChainError::CycleDetected));
    assert_eq!(chain.set_next(b, Some(a)), Err(ChainError::CycleDetected));
    assert_eq!(chain.set_next(c, Some(a)), Err(ChainError::CycleDetected));

    // The chain is untouched by the refused links.
    assert_eq!(chain.next(a).unwrap(), Some(b));
    assert_eq!(chain.next(b).unwrap(), Some(c));
}

#[test]
fn chain_overload() {
    let mut chain = EventChain::new(2);
    chain.attach(None, Box::new(Null)).unwrap();
    chain.attach(None, Box::new(Null)).unwrap();

    // Third attach should fail
    let res = chain.attach(None, Box::new(Null));
    assert_eq!(res.err(), Some(ChainError::OverloadedChain));
    assert_eq!(chain.listener_count(), 2);
}

#[test]
fn broadcast_visits_every_node_exactly_once_in_link_order() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut chain = EventChain::with_policy(10, DispatchPolicy::Broadcast);

    let mut stamps = Vec::new();
    let mut calls = Vec::new();
    for _ in 0..4 {
        let (listener, stamp, call) = spy(false, &counter);
        chain.attach(None, listener).unwrap();
        stamps.push(stamp);
        calls.push(call);
    }

    let outcome = chain.dispatch(&Event::ProgramReset).unwrap();
    assert_eq!(outcome.visited, 4);
    assert_eq!(outcome.handled, 0);
    assert_eq!(outcome.handled_by, None);
    assert!(!outcome.is_handled());

    for (i, stamp) in stamps.iter().enumerate() {
        assert_eq!(stamp.load(Ordering::SeqCst), i + 1, "node {} out of order", i);
    }
    for call in &calls {
        assert_eq!(call.load(Ordering::SeqCst), 1);
    }
}

#[test]
fn first_wins_stops_at_the_first_handler() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut chain = EventChain::default();

    let (quiet, _, quiet_calls) = spy(false, &counter);
    let (greedy, _, greedy_calls) = spy(true, &counter);
    let (unreached, _, unreached_calls) = spy(true, &counter);

    chain.attach(None, quiet).unwrap();
    let winner = chain.attach(None, greedy).unwrap();
    chain.attach(None, unreached).unwrap();

    let outcome = chain.dispatch(&Event::Tick { micros: 500 }).unwrap();
    assert_eq!(outcome.visited, 2);
    assert_eq!(outcome.handled, 1);
    assert_eq!(outcome.handled_by, Some(winner));

    assert_eq!(quiet_calls.load(Ordering::SeqCst), 1);
    assert_eq!(greedy_calls.load(Ordering::SeqCst), 1);
    assert_eq!(unreached_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn broadcast_aggregates_handlers() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut chain = EventChain::with_policy(10, DispatchPolicy::Broadcast);

    let (quiet, _, _) = spy(false, &counter);
    let (first, _, _) = spy(true, &counter);
    let (second, _, second_calls) = spy(true, &counter);

    chain.attach(None, quiet).unwrap();
    let first_id = chain.attach(None, first).unwrap();
    chain.attach(None, second).unwrap();

    let outcome = chain.dispatch(&Event::ProgramFinished).unwrap();
    assert_eq!(outcome.visited, 3);
    assert_eq!(outcome.handled, 2);
    // The earliest handler is reported even when the walk continues.
    assert_eq!(outcome.handled_by, Some(first_id));
    assert_eq!(second_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn empty_chain_dispatch_is_a_no_op() {
    let mut chain = EventChain::default();
    let outcome = chain.dispatch(&Event::ProgramFinished).unwrap();

    assert_eq!(outcome.visited, 0);
    assert!(!outcome.is_handled());
}

#[test]
fn detach_relinks_around_the_node() {
    let mut chain = EventChain::default();
    let a = chain.attach(None, Box::new(Null)).unwrap();
    let b = chain.attach(None, Box::new(Null)).unwrap();
    let c = chain.attach(None, Box::new(Null)).unwrap();

    chain.detach(b).unwrap();
    assert_eq!(chain.next(a).unwrap(), Some(c));
    assert_eq!(chain.listener_count(), 2);

    chain.detach(a).unwrap();
    assert_eq!(chain.head(), Some(c));

    chain.detach(c).unwrap();
    assert_eq!(chain.head(), None);
    assert!(!chain.has_listeners());
}

#[test]
fn detach_hands_the_listener_back() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut chain = EventChain::default();
    let (listener, _, calls) = spy(true, &counter);
    let id = chain.attach(None, listener).unwrap();

    let mut returned = chain.detach(id).unwrap();
    assert!(returned.on_event(&Event::ProgramReset));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn aborted_boundaries_flow_through_dispatch() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut chain = EventChain::with_policy(4, DispatchPolicy::Broadcast);
    let (listener, _, calls) = spy(false, &counter);
    chain.attach(None, listener).unwrap();

    chain.dispatch(&Event::aborted(0, 9)).unwrap();
    chain.dispatch(&Event::aborted(9, 9)).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn policy_can_be_swapped_between_dispatches() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut chain = EventChain::default();
    assert_eq!(chain.policy(), DispatchPolicy::FirstWins);

    let (first, _, _) = spy(true, &counter);
    let (second, _, second_calls) = spy(true, &counter);
    chain.attach(None, first).unwrap();
    chain.attach(None, second).unwrap();

    let outcome = chain.dispatch(&Event::ProgramReset).unwrap();
    assert_eq!(outcome.visited, 1);

    chain.set_policy(DispatchPolicy::Broadcast);
    let outcome = chain.dispatch(&Event::ProgramReset).unwrap();
    assert_eq!(outcome.visited, 2);
    assert_eq!(second_calls.load(Ordering::SeqCst), 1);
}
