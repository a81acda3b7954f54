use crate::{Button, Event, Micros, Move, MoveCount};

/// Defines the contract for observers of robot lifecycle events.
///
/// Every hook has a default body that does nothing and returns `false`
/// ("not handled"), so a concrete listener implements only the events
/// relevant to its function: a display updates on program hooks, a buzzer
/// on button hooks, and so on.
///
/// Hooks are synchronous, non-blocking callbacks invoked from the control
/// loop; none of them may stall. They have no error channel: an
/// implementation that can fail must report it out-of-band (a status field,
/// a log line), since the only output here is the handled signal.
///
/// Whether a `true` return stops the event from reaching listeners further
/// down the chain is decided by the chain's [`DispatchPolicy`], not by this
/// trait.
///
/// [`DispatchPolicy`]: crate::DispatchPolicy
///
/// # Example
/// ```
/// use bot_events::{EventListener, Move};
///
/// #[derive(Default)]
/// struct MoveCounter {
///     executed: u32,
/// }
///
/// impl EventListener for MoveCounter {
///     fn move_executed(&mut self, _movement: Move) -> bool {
///         self.executed += 1;
///         true
///     }
/// }
///
/// let mut counter = MoveCounter::default();
/// assert!(counter.move_executed(Move::Forward));
/// assert!(!counter.program_finished());
/// assert_eq!(counter.executed, 1);
/// ```
pub trait EventListener {
    /// Periodic tick from the driving loop.
    ///
    /// # Parameters
    /// * `micros` - Elapsed microseconds since the loop started.
    fn tick(&mut self, _micros: Micros) -> bool {
        false
    }

    /// A move from the program has started executing.
    fn move_executing(&mut self, _movement: Move) -> bool {
        false
    }

    /// A move from the program has finished executing.
    fn move_executed(&mut self, _movement: Move) -> bool {
        false
    }

    /// A move was appended to the current program.
    fn move_added(&mut self, _movement: Move) -> bool {
        false
    }

    /// Program execution started.
    ///
    /// # Parameters
    /// * `total_moves` - Total moves in the program.
    fn program_started(&mut self, _total_moves: MoveCount) -> bool {
        false
    }

    /// Program execution completed normally.
    fn program_finished(&mut self) -> bool {
        false
    }

    /// The program was cleared.
    fn program_reset(&mut self) -> bool {
        false
    }

    /// Program execution stopped before completion.
    ///
    /// # Parameters
    /// * `executed` - Moves already executed when the program stopped.
    /// * `total` - Total moves in the program.
    fn program_aborted(&mut self, _executed: MoveCount, _total: MoveCount) -> bool {
        false
    }

    /// A button transitioned to pressed.
    fn button_pressed(&mut self, _button: Button) -> bool {
        false
    }

    /// A button was released (short press).
    fn button_released(&mut self, _button: Button) -> bool {
        false
    }

    /// A button was released after being held past the long-press threshold.
    fn button_long_released(&mut self, _button: Button) -> bool {
        false
    }

    /// Routes an [`Event`] value to the matching hook.
    ///
    /// This is the single entry point the chain walks through; overriding it
    /// directly is possible but rarely useful.
    ///
    /// # Returns
    /// The handled signal from the routed hook.
    fn on_event(&mut self, event: &Event) -> bool {
        match *event {
            Event::Tick { micros } => self.tick(micros),
            Event::MoveExecuting(movement) => self.move_executing(movement),
            Event::MoveExecuted(movement) => self.move_executed(movement),
            Event::MoveAdded(movement) => self.move_added(movement),
            Event::ProgramStarted { total_moves } => self.program_started(total_moves),
            Event::ProgramFinished => self.program_finished(),
            Event::ProgramReset => self.program_reset(),
            Event::ProgramAborted { executed, total } => self.program_aborted(executed, total),
            Event::ButtonPressed(button) => self.button_pressed(button),
            Event::ButtonReleased(button) => self.button_released(button),
            Event::ButtonLongReleased(button) => self.button_long_released(button),
        }
    }
}
