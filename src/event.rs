use crate::{Micros, MoveCount};

/// An atomic unit of robot motion. Opaque to the dispatch layer; only the
/// motor controller interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    Pause,
}

/// Identifier for one of the robot's physical input buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Go,
    Reset,
}

/// The closed set of robot lifecycle notifications.
///
/// One variant per listener hook. The control loop builds these at the point
/// a state transition occurs and hands them to the chain for delivery; the
/// long-press threshold behind [`Event::ButtonLongReleased`] is computed
/// upstream, so it arrives here as a discrete event rather than a timer.
///
/// # Example
/// ```
/// use bot_events::{Event, Move};
///
/// let event = Event::MoveAdded(Move::Forward);
/// assert_eq!(event.name(), "move_added");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Periodic tick from the driving loop, with elapsed microseconds.
    Tick { micros: Micros },
    /// A queued move has begun executing.
    MoveExecuting(Move),
    /// A queued move has finished executing.
    MoveExecuted(Move),
    /// A move was appended to the current program.
    MoveAdded(Move),
    /// Program execution began with the given number of moves.
    ProgramStarted { total_moves: MoveCount },
    /// Program execution completed normally.
    ProgramFinished,
    /// The program was cleared.
    ProgramReset,
    /// The program stopped before completion. `executed <= total` holds for
    /// every event the controller produces.
    ProgramAborted { executed: MoveCount, total: MoveCount },
    /// A button transitioned to pressed.
    ButtonPressed(Button),
    /// A button was released before the long-press threshold.
    ButtonReleased(Button),
    /// A button was released after being held past the long-press threshold.
    ButtonLongReleased(Button),
}

impl Event {
    /// Builds a [`Event::ProgramAborted`], checking `executed <= total` in
    /// debug builds.
    ///
    /// # Example
    /// ```
    /// use bot_events::Event;
    ///
    /// let event = Event::aborted(2, 5);
    /// assert_eq!(event, Event::ProgramAborted { executed: 2, total: 5 });
    /// ```
    pub fn aborted(executed: MoveCount, total: MoveCount) -> Self {
        debug_assert!(executed <= total, "aborted past the end of the program");
        Event::ProgramAborted { executed, total }
    }

    /// Static label for this event, matching the listener hook it routes to.
    /// Used for log lines.
    ///
    /// # Example
    /// ```
    /// use bot_events::{Button, Event};
    ///
    /// assert_eq!(Event::ProgramFinished.name(), "program_finished");
    /// assert_eq!(Event::ButtonPressed(Button::Go).name(), "button_pressed");
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            Event::Tick { .. } => "tick",
            Event::MoveExecuting(_) => "move_executing",
            Event::MoveExecuted(_) => "move_executed",
            Event::MoveAdded(_) => "move_added",
            Event::ProgramStarted { .. } => "program_started",
            Event::ProgramFinished => "program_finished",
            Event::ProgramReset => "program_reset",
            Event::ProgramAborted { .. } => "program_aborted",
            Event::ButtonPressed(_) => "button_pressed",
            Event::ButtonReleased(_) => "button_released",
            Event::ButtonLongReleased(_) => "button_long_released",
        }
    }
}
