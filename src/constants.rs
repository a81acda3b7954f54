#[cfg(not(feature = "threaded"))]
extern crate alloc;
#[cfg(not(feature = "threaded"))]
use alloc::boxed::Box;

#[cfg(feature = "threaded")]
use std::sync::{Arc, Mutex};

use crate::EventListener;

/// Elapsed time in microseconds, as supplied by the driving loop on each
/// periodic tick.
pub type Micros = u32;

/// Number of moves in a program. The controller's programs are small enough
/// that a byte-sized count is the native width.
pub type MoveCount = u8;

/// Type alias for an owned listener trait object.
///
/// - Allows any listener (no thread-safety required).
///
/// # Example (embedded/no_std)
/// ```
/// extern crate alloc;
/// use alloc::boxed::Box;
/// use bot_events::{BoxedListener, EventListener};
///
/// struct Silent;
/// impl EventListener for Silent {}
///
/// let listener: BoxedListener = Box::new(Silent);
/// ```
#[cfg(not(feature = "threaded"))]
pub type BoxedListener = Box<dyn EventListener>;

/// Type alias for an owned listener trait object.
///
/// - Requires `Send` so a listener can be handed to a background task.
///
/// # Example (threaded)
/// ```
/// use bot_events::{BoxedListener, EventListener};
///
/// struct Silent;
/// impl EventListener for Silent {}
///
/// let listener: BoxedListener = Box::new(Silent);
/// ```
#[cfg(feature = "threaded")]
pub type BoxedListener = Box<dyn EventListener + Send>;

/// Type alias for a listener slot shared between the chain and background
/// dispatch tasks.
#[cfg(feature = "threaded")]
pub type SharedListener = Arc<Mutex<BoxedListener>>;
