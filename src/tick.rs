//! Interrupt-driven tick signal.
//!
//! The periodic timer is the only asynchronous event source in the
//! system.  Its callback does nothing but raise a single flag; the
//! scheduler loop reads and lowers it.
//!
//! ```text
//! ┌─────────────┐  raise()  ┌────────────┐  take()  ┌──────────────┐
//! │ Timer ISR   │──────────▶│  TickFlag  │─────────▶│  Scheduler   │
//! │ (producer)  │           │ (1 word)   │          │  (consumer)  │
//! └─────────────┘           └────────────┘          └──────────────┘
//! ```
//!
//! Ticks coalesce: if the loop has not lowered the flag before the next
//! interrupt, the second tick is absorbed and one pass runs for both.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::error::Result;

/// Single-producer / single-consumer tick-pending flag.
pub struct TickFlag {
    pending: AtomicBool,
}

impl TickFlag {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Mark a tick as pending.  Safe to call from interrupt context.
    pub fn raise(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Lower the flag, returning whether a tick was pending.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Peek without consuming.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

impl Default for TickFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// The flag raised by the board's tick timer.
pub static TICK_FLAG: TickFlag = TickFlag::new();

/// Timer callback — register this with the [`TickSource`].
pub fn on_tick() {
    TICK_FLAG.raise();
}

// ───────────────────────────────────────────────────────────────
// Tick source port
// ───────────────────────────────────────────────────────────────

/// Timer input-clock divider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prescaler {
    Div1,
    Div2,
    Div4,
    Div8,
}

impl Prescaler {
    pub fn divisor(self) -> u32 {
        match self {
            Self::Div1 => 1,
            Self::Div2 => 2,
            Self::Div4 => 4,
            Self::Div8 => 8,
        }
    }
}

/// Periodic hardware timer driving the scheduler.
///
/// The scheduler only touches it at startup: stop, register the
/// callback, clear the counter, then start.
pub trait TickSource {
    /// Register the function called on every period elapse.
    fn set_periodic_callback(&mut self, callback: fn()) -> Result<()>;

    /// Start counting with the given input divider.
    fn start(&mut self, prescaler: Prescaler) -> Result<()>;

    /// Stop counting.  No further callbacks fire.
    fn stop(&mut self) -> Result<()>;

    /// Reset the counter to zero.
    fn clear_counter(&mut self) -> Result<()>;
}
