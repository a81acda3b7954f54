//! Example: program progress display listener
use bot_events::{
    Event, EventChain, EventDispatcher, EventListener, Move, MoveCount,
};

#[derive(Default)]
struct ProgressDisplay {
    total: MoveCount,
    executed: MoveCount,
}

impl EventListener for ProgressDisplay {
    fn program_started(&mut self, total_moves: MoveCount) -> bool {
        self.total = total_moves;
        self.executed = 0;
        println!("program started: {} moves", total_moves);
        true
    }

    fn move_executed(&mut self, movement: Move) -> bool {
        self.executed += 1;
        println!("{:?} done ({}/{})", movement, self.executed, self.total);
        true
    }

    fn program_finished(&mut self) -> bool {
        println!("program finished");
        true
    }
}

fn main() {
    let mut chain = EventChain::default();
    chain
        .attach(Some("display".to_string()), Box::new(ProgressDisplay::default()))
        .unwrap();

    // Simulate a short program run
    let program = [Move::Forward, Move::TurnLeft, Move::Forward];
    chain
        .dispatch(&Event::ProgramStarted {
            total_moves: program.len() as MoveCount,
        })
        .unwrap();
    for movement in program {
        chain.dispatch(&Event::MoveExecuting(movement)).unwrap();
        chain.dispatch(&Event::MoveExecuted(movement)).unwrap();
    }
    chain.dispatch(&Event::ProgramFinished).unwrap();
}
