//! Shared context threaded through every scheduled task.
//!
//! `HeaterContext` is the one struct that tasks read from and write to:
//! the board, the event sink, the settled switch states, and the display
//! buffer.  The scheduler owns nothing else that tasks can see.

use crate::debounce::SwitchBank;
use crate::display::DisplayBuffer;

use super::ports::{ButtonId, EventSink, HeaterHardware};

/// Everything the task table shares.
pub struct HeaterContext<H, S> {
    /// The board: pins, converter, store, segment lines.
    pub hw: H,
    pub sink: S,
    /// Settled switch states, written by the debounce task only.
    pub switches: SwitchBank<{ ButtonId::COUNT }>,
    /// Digit values and visibility, written by the control task.
    pub display: DisplayBuffer,
}

impl<H: HeaterHardware, S: EventSink> HeaterContext<H, S> {
    pub fn new(hw: H, sink: S) -> Self {
        Self {
            hw,
            sink,
            switches: SwitchBank::new(),
            display: DisplayBuffer::new(),
        }
    }
}
