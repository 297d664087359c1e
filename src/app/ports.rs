//! Port traits — the hexagonal boundary between the control core and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ HeaterController (domain)
//! ```
//!
//! Driven adapters (pins, converter, byte store, display, event sinks)
//! implement these traits.  The [`HeaterController`](super::controller::HeaterController)
//! and the task table consume them via generics, so the control core never
//! touches hardware directly.
//!
//! Every method returns [`Result`]; the core logs failures and carries on.

use crate::debounce::SwitchState;
use crate::error::{HalError, Result};

// ───────────────────────────────────────────────────────────────
// Channel identities
// ───────────────────────────────────────────────────────────────

/// Front-panel buttons, in switch-bank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ButtonId {
    OnOff = 0,
    Down = 1,
    Up = 2,
}

impl ButtonId {
    pub const COUNT: usize = 3;
    pub const ALL: [ButtonId; Self::COUNT] = [Self::OnOff, Self::Down, Self::Up];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for ButtonId {
    type Error = HalError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::OnOff),
            1 => Ok(Self::Down),
            2 => Ok(Self::Up),
            other => Err(HalError::InvalidId(other)),
        }
    }
}

/// Digital outputs driven by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OutputId {
    HeatingElement = 0,
    CoolingElement = 1,
    StatusLed = 2,
}

impl OutputId {
    pub const COUNT: usize = 3;

    pub fn index(self) -> usize {
        self as usize
    }
}

// ───────────────────────────────────────────────────────────────
// Digital I/O ports
// ───────────────────────────────────────────────────────────────

/// Instantaneous switch level with polarity already applied.
pub trait SwitchInput {
    fn read_input(&mut self, id: ButtonId) -> Result<SwitchState>;
}

/// Element and indicator outputs.
pub trait OutputPort {
    fn set_output(&mut self, id: OutputId, on: bool) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Analog port
// ───────────────────────────────────────────────────────────────

/// Temperature sensor converter.  Returns raw counts.
pub trait AnalogPort {
    fn read_sample(&mut self) -> Result<u16>;
}

// ───────────────────────────────────────────────────────────────
// Persistent byte store
// ───────────────────────────────────────────────────────────────

/// Byte-addressed non-volatile memory.
///
/// Writes complete (or fail) before returning; implementations busy-wait
/// for the device inside the caller's turn.
pub trait ByteStore {
    fn read_byte(&mut self, address: u16) -> Result<u8>;
    fn write_byte(&mut self, address: u16, value: u8) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Display port
// ───────────────────────────────────────────────────────────────

/// Two-digit numeric display, as seen by the controller.
pub trait DisplayPort {
    /// Store `value` (0–9) for digit `position` (0 = tens).
    fn set_digit(&mut self, position: u8, value: u8) -> Result<()>;

    fn set_visible(&mut self, visible: bool) -> Result<()>;
}

/// Raw segment/common lines of a multiplexed seven-segment display.
pub trait SegmentBus {
    /// Drive the shared segment lines with an already-encoded pattern.
    fn write_segments(&mut self, pattern: u8) -> Result<()>;

    /// Enable or disable the common line of digit `position`.
    fn set_digit_enabled(&mut self, position: u8, enabled: bool) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`HeaterEvent`](super::events::HeaterEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::HeaterEvent);
}

// ───────────────────────────────────────────────────────────────
// Board bundle
// ───────────────────────────────────────────────────────────────

/// Everything the task table needs from one board.
///
/// Lets a single adapter satisfy every port without a double mutable
/// borrow at the call site.
pub trait HeaterHardware: SwitchInput + OutputPort + AnalogPort + ByteStore + SegmentBus {}

impl<T> HeaterHardware for T where
    T: SwitchInput + OutputPort + AnalogPort + ByteStore + SegmentBus
{
}
