//! Two-digit seven-segment display.
//!
//! The controller writes digit values and a visibility flag into a
//! [`DisplayBuffer`]; the display task feeds that buffer to a
//! [`SegmentRefresh`] which lights one digit per invocation.
//!
//! ```text
//!  Controller ──set_digit/set_visible──▶ DisplayBuffer
//!                                            │ (read every 25 ms)
//!                                            ▼
//!                      SegmentRefresh ──▶ SegmentBus (pins)
//! ```
//!
//! Segment bit order is `a` (bit 0) through `g` (bit 6), `dp` at bit 7.

use crate::app::ports::{DisplayPort, SegmentBus};
use crate::error::{HalError, Result, report};

/// Number of digits on the panel.
pub const DIGITS: usize = 2;

/// Active-low segment patterns for a common-anode part, indexed by digit.
const COMMON_ANODE: [u8; 10] = [0xC0, 0xF9, 0xA4, 0xB0, 0x99, 0x92, 0x82, 0xF8, 0x80, 0x90];

/// Active-high segment patterns for a common-cathode part.
const COMMON_CATHODE: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];

/// Which way the display's common pin is wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Polarity {
    #[default]
    CommonCathode,
    CommonAnode,
}

impl Polarity {
    /// Segment line levels that show `digit` (true bit = line driven high).
    pub fn encode(self, digit: u8) -> Result<u8> {
        let idx = usize::from(digit);
        match self {
            Self::CommonCathode => COMMON_CATHODE.get(idx).copied(),
            Self::CommonAnode => COMMON_ANODE.get(idx).copied(),
        }
        .ok_or(HalError::InvalidDigit(digit))
    }
}

// ───────────────────────────────────────────────────────────────
// DisplayBuffer
// ───────────────────────────────────────────────────────────────

/// Digit values and visibility, shared between the controller and the
/// refresh task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayBuffer {
    digits: [u8; DIGITS],
    visible: bool,
}

impl DisplayBuffer {
    pub const fn new() -> Self {
        Self {
            digits: [0; DIGITS],
            visible: false,
        }
    }

    pub fn digits(&self) -> [u8; DIGITS] {
        self.digits
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The two digits read as a number.
    pub fn value(&self) -> u8 {
        self.digits[0] * 10 + self.digits[1]
    }
}

impl DisplayPort for DisplayBuffer {
    fn set_digit(&mut self, position: u8, value: u8) -> Result<()> {
        if value > 9 {
            return Err(HalError::InvalidDigit(value));
        }
        let slot = self
            .digits
            .get_mut(usize::from(position))
            .ok_or(HalError::InvalidId(position))?;
        *slot = value;
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) -> Result<()> {
        self.visible = visible;
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// SegmentRefresh
// ───────────────────────────────────────────────────────────────

/// Digit multiplexer.  One call lights the next digit in turn.
#[derive(Debug, Clone, Copy)]
pub struct SegmentRefresh {
    polarity: Polarity,
    current: u8,
}

impl SegmentRefresh {
    pub const fn new(polarity: Polarity) -> Self {
        Self { polarity, current: 0 }
    }

    /// Turn off the digit lit last time, drive the segments for the
    /// current one, light it if the display is visible, then move on.
    pub fn refresh(&mut self, buffer: &DisplayBuffer, bus: &mut impl SegmentBus) {
        let previous = if self.current == 0 {
            DIGITS as u8 - 1
        } else {
            self.current - 1
        };
        report(bus.set_digit_enabled(previous, false), "digit off");

        let digit = buffer.digits[usize::from(self.current)];
        match self.polarity.encode(digit) {
            Ok(pattern) => report(bus.write_segments(pattern), "segment write"),
            Err(e) => log::warn!("Display: {e}"),
        }

        if buffer.visible {
            report(bus.set_digit_enabled(self.current, true), "digit on");
        }

        self.current = (self.current + 1) % DIGITS as u8;
    }

    /// Digit that the next refresh will light.
    pub fn current(&self) -> u8 {
        self.current
    }
}
