//! Example: button panel feeding a move program
use bot_events::{Button, Event, EventChain, EventDispatcher, EventListener, Move};

/// Turns direction buttons into queued moves.
#[derive(Default)]
struct Programmer {
    queued: Vec<Move>,
}

impl EventListener for Programmer {
    fn button_released(&mut self, button: Button) -> bool {
        let movement = match button {
            Button::Up => Move::Forward,
            Button::Down => Move::Backward,
            Button::Left => Move::TurnLeft,
            Button::Right => Move::TurnRight,
            // Go and Reset belong to the executor, not the programmer.
            _ => return false,
        };
        self.queued.push(movement);
        println!("queued {:?} ({} total)", movement, self.queued.len());
        true
    }

    fn button_long_released(&mut self, button: Button) -> bool {
        if button == Button::Reset {
            self.queued.clear();
            println!("program cleared");
            return true;
        }
        false
    }
}

fn main() {
    let mut chain = EventChain::default();
    chain
        .attach(Some("programmer".to_string()), Box::new(Programmer::default()))
        .unwrap();

    // Simulate a few presses on the panel
    for button in [Button::Up, Button::Up, Button::Left] {
        chain.dispatch(&Event::ButtonPressed(button)).unwrap();
        chain.dispatch(&Event::ButtonReleased(button)).unwrap();
    }
    chain
        .dispatch(&Event::ButtonLongReleased(Button::Reset))
        .unwrap();
}
