//! Hardware adapter — bridges real peripherals to the domain port traits.
//!
//! Owns the button inputs, element/LED outputs, seven-segment lines, the
//! temperature converter and the byte store, exposing them through
//! [`SwitchInput`], [`OutputPort`], [`SegmentBus`], [`AnalogPort`] and
//! [`ByteStore`].  Pins are any `embedded-hal` 1.0 digital pins, so the
//! same adapter runs on ESP-IDF `PinDriver`s and on test doubles.

use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::app::ports::{
    AnalogPort, ButtonId, ByteStore, OutputId, OutputPort, SegmentBus, SwitchInput,
};
use crate::debounce::SwitchState;
use crate::error::{HalError, Result};

/// Pin level that means "asserted".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveLevel {
    High,
    Low,
}

impl ActiveLevel {
    fn pin_state(self, asserted: bool) -> PinState {
        PinState::from(asserted == (self == Self::High))
    }
}

/// A pin together with the level that asserts it.
pub struct Line<P> {
    pin: P,
    active: ActiveLevel,
}

impl<P> Line<P> {
    pub fn new(pin: P, active: ActiveLevel) -> Self {
        Self { pin, active }
    }

    pub fn active_high(pin: P) -> Self {
        Self::new(pin, ActiveLevel::High)
    }

    /// Buttons wired to ground with pull-ups.
    pub fn active_low(pin: P) -> Self {
        Self::new(pin, ActiveLevel::Low)
    }
}

impl<P: InputPin> Line<P> {
    fn is_asserted(&mut self) -> Result<bool> {
        let high = self.pin.is_high().map_err(|_| HalError::Gpio)?;
        Ok(high == (self.active == ActiveLevel::High))
    }
}

impl<P: OutputPin> Line<P> {
    fn assert(&mut self, asserted: bool) -> Result<()> {
        self.pin
            .set_state(self.active.pin_state(asserted))
            .map_err(|_| HalError::Gpio)
    }
}

/// Seven-segment wiring: eight segment lines (a..g, dp) and one common
/// line per digit.
pub struct SegmentLines<O> {
    pub segments: [O; 8],
    pub commons: [Line<O>; 2],
}

// ───────────────────────────────────────────────────────────────
// HardwareAdapter
// ───────────────────────────────────────────────────────────────

/// Concrete adapter that combines all board hardware behind port traits.
pub struct HardwareAdapter<I, O, A, S> {
    buttons: [Line<I>; ButtonId::COUNT],
    outputs: [Line<O>; OutputId::COUNT],
    display: SegmentLines<O>,
    adc: A,
    store: S,
}

impl<I, O, A, S> HardwareAdapter<I, O, A, S>
where
    I: InputPin,
    O: OutputPin,
    A: AnalogPort,
    S: ByteStore,
{
    /// `buttons` in [`ButtonId`] order, `outputs` in [`OutputId`] order.
    pub fn new(
        buttons: [Line<I>; ButtonId::COUNT],
        outputs: [Line<O>; OutputId::COUNT],
        display: SegmentLines<O>,
        adc: A,
        store: S,
    ) -> Self {
        Self {
            buttons,
            outputs,
            display,
            adc,
            store,
        }
    }
}

// ── SwitchInput / OutputPort ──────────────────────────────────

impl<I: InputPin, O, A, S> SwitchInput for HardwareAdapter<I, O, A, S> {
    fn read_input(&mut self, id: ButtonId) -> Result<SwitchState> {
        self.buttons[id.index()].is_asserted().map(SwitchState::from)
    }
}

impl<I, O: OutputPin, A, S> OutputPort for HardwareAdapter<I, O, A, S> {
    fn set_output(&mut self, id: OutputId, on: bool) -> Result<()> {
        self.outputs[id.index()].assert(on)
    }
}

// ── SegmentBus ────────────────────────────────────────────────

impl<I, O: OutputPin, A, S> SegmentBus for HardwareAdapter<I, O, A, S> {
    fn write_segments(&mut self, pattern: u8) -> Result<()> {
        for (bit, pin) in self.display.segments.iter_mut().enumerate() {
            pin.set_state(PinState::from(pattern & (1 << bit) != 0))
                .map_err(|_| HalError::Gpio)?;
        }
        Ok(())
    }

    fn set_digit_enabled(&mut self, position: u8, enabled: bool) -> Result<()> {
        self.display
            .commons
            .get_mut(usize::from(position))
            .ok_or(HalError::InvalidId(position))?
            .assert(enabled)
    }
}

// ── AnalogPort / ByteStore passthrough ────────────────────────

impl<I, O, A: AnalogPort, S> AnalogPort for HardwareAdapter<I, O, A, S> {
    fn read_sample(&mut self) -> Result<u16> {
        self.adc.read_sample()
    }
}

impl<I, O, A, S: ByteStore> ByteStore for HardwareAdapter<I, O, A, S> {
    fn read_byte(&mut self, address: u16) -> Result<u8> {
        self.store.read_byte(address)
    }

    fn write_byte(&mut self, address: u16, value: u8) -> Result<()> {
        self.store.write_byte(address, value)
    }
}
