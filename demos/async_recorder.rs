//! Example: parallel broadcast to host-side listeners (threaded)
use bot_events::{
    Button, DispatchPolicy, Event, EventChain, EventDispatcher, EventListener,
};

struct Recorder {
    name: &'static str,
}

impl EventListener for Recorder {
    fn button_pressed(&mut self, button: Button) -> bool {
        println!("[{}] pressed {:?}", self.name, button);
        true
    }

    fn program_aborted(&mut self, executed: u8, total: u8) -> bool {
        println!("[{}] aborted at {}/{}", self.name, executed, total);
        true
    }
}

#[tokio::main]
async fn main() {
    let mut chain = EventChain::with_policy(10, DispatchPolicy::Broadcast);
    chain
        .attach(Some("journal".to_string()), Box::new(Recorder { name: "journal" }))
        .unwrap();
    chain
        .attach(Some("telemetry".to_string()), Box::new(Recorder { name: "telemetry" }))
        .unwrap();

    // Every listener gets the event on its own task.
    let outcome = chain
        .dispatch_async(Event::ButtonPressed(Button::Go), true)
        .await
        .unwrap();
    println!("{} of {} listeners handled the press", outcome.handled, outcome.visited);

    let outcome = chain
        .dispatch_async(Event::aborted(2, 5), true)
        .await
        .unwrap();
    println!("{} of {} listeners saw the abort", outcome.handled, outcome.visited);
}
