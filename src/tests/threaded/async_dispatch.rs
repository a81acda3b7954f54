use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::{
    BoxedListener, DispatchPolicy, Event, EventChain, EventDispatcher, EventListener,
};

struct Spy {
    handled: bool,
    calls: Arc<AtomicUsize>,
}
impl EventListener for Spy {
    fn on_event(&mut self, _event: &Event) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.handled
    }
}

fn spy(handled: bool) -> (BoxedListener, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let listener = Spy {
        handled,
        calls: Arc::clone(&calls),
    };
    (Box::new(listener), calls)
}

#[tokio::test]
async fn async_first_wins_is_sequential_even_when_parallel_is_requested() {
    let mut chain = EventChain::default();

    let (quiet, quiet_calls) = spy(false);
    let (greedy, _) = spy(true);
    let (unreached, unreached_calls) = spy(true);

    chain.attach(None, quiet).unwrap();
    let winner = chain.attach(None, greedy).unwrap();
    chain.attach(None, unreached).unwrap();

    let outcome = chain
        .dispatch_async(Event::ProgramStarted { total_moves: 3 }, true)
        .await
        .unwrap();

    assert_eq!(outcome.visited, 2);
    assert_eq!(outcome.handled_by, Some(winner));
    assert_eq!(quiet_calls.load(Ordering::SeqCst), 1);
    assert_eq!(unreached_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn async_sequential_broadcast_matches_sync_dispatch() {
    let mut chain = EventChain::with_policy(10, DispatchPolicy::Broadcast);

    let mut calls = Vec::new();
    for i in 0..3 {
        let (listener, call) = spy(i % 2 == 0);
        chain.attach(None, listener).unwrap();
        calls.push(call);
    }

    let outcome = chain
        .dispatch_async(Event::ProgramFinished, false)
        .await
        .unwrap();

    assert_eq!(outcome.visited, 3);
    assert_eq!(outcome.handled, 2);
    for call in &calls {
        assert_eq!(call.load(Ordering::SeqCst), 1);
    }
}

#[tokio::test]
async fn parallel_broadcast_reaches_every_listener() {
    let mut chain = EventChain::with_policy(10, DispatchPolicy::Broadcast);

    let mut calls = Vec::new();
    for _ in 0..5 {
        let (listener, call) = spy(true);
        chain.attach(None, listener).unwrap();
        calls.push(call);
    }

    let outcome = chain
        .dispatch_async(Event::ButtonPressed(crate::Button::Go), true)
        .await
        .unwrap();

    assert_eq!(outcome.visited, 5);
    assert_eq!(outcome.handled, 5);
    // handled_by reports the earliest node in chain order, whatever order
    // the tasks finished in.
    assert_eq!(outcome.handled_by, chain.head());
    for call in &calls {
        assert_eq!(call.load(Ordering::SeqCst), 1);
    }
}

#[tokio::test]
async fn parallel_broadcast_on_an_empty_chain() {
    let mut chain = EventChain::with_policy(10, DispatchPolicy::Broadcast);

    let outcome = chain
        .dispatch_async(Event::Tick { micros: 16_000 }, true)
        .await
        .unwrap();

    assert_eq!(outcome.visited, 0);
    assert!(!outcome.is_handled());
}

#[tokio::test]
async fn listener_can_keep_state_across_async_dispatches() {
    #[derive(Default)]
    struct Progress {
        executed: Arc<AtomicUsize>,
    }
    impl EventListener for Progress {
        fn move_executed(&mut self, _movement: crate::Move) -> bool {
            self.executed.fetch_add(1, Ordering::SeqCst);
            true
        }
    }

    let executed = Arc::new(AtomicUsize::new(0));
    let mut chain = EventChain::with_policy(4, DispatchPolicy::Broadcast);
    chain
        .attach(
            Some("progress".to_string()),
            Box::new(Progress {
                executed: Arc::clone(&executed),
            }),
        )
        .unwrap();

    for _ in 0..4 {
        chain
            .dispatch_async(Event::MoveExecuted(crate::Move::Forward), true)
            .await
            .unwrap();
    }
    assert_eq!(executed.load(Ordering::SeqCst), 4);
}
