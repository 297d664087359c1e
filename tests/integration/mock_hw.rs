//! Mock hardware adapter for integration tests.
//!
//! Records every output, store and segment call so tests can assert on
//! the full command history without touching real pins or buses.

use std::collections::HashMap;

use waterheater::app::events::HeaterEvent;
use waterheater::app::ports::{
    AnalogPort, ButtonId, ByteStore, EventSink, OutputId, OutputPort, SegmentBus, SwitchInput,
};
use waterheater::debounce::SwitchState;
use waterheater::error::{HalError, Result};

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCall {
    SetOutput { id: OutputId, on: bool },
    ReadSample,
    ReadByte(u16),
    WriteByte { address: u16, value: u8 },
    Segments(u8),
    DigitEnabled { position: u8, enabled: bool },
}

// ── MockBoard ─────────────────────────────────────────────────

pub struct MockBoard {
    pub calls: Vec<BoardCall>,
    /// Instantaneous (already polarity-corrected) button levels.
    pub pressed: [bool; ButtonId::COUNT],
    /// Raw converter count returned by `read_sample`.
    pub raw_sample: u16,
    pub store: HashMap<u16, u8>,
    pub fail_inputs: bool,
    pub fail_store: bool,
    pub input_reads: usize,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            pressed: [false; ButtonId::COUNT],
            raw_sample: 0,
            store: HashMap::new(),
            fail_inputs: false,
            fail_store: false,
            input_reads: 0,
        }
    }

    /// Water at `degrees` with the default sensor factor of 2.
    pub fn with_water(mut self, degrees: u16) -> Self {
        self.raw_sample = degrees * 2;
        self
    }

    pub fn with_stored(mut self, address: u16, value: u8) -> Self {
        self.store.insert(address, value);
        self
    }

    /// Last commanded level of `id`, false if never written.
    pub fn output(&self, id: OutputId) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                BoardCall::SetOutput { id: i, on } if *i == id => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn count(&self, pred: impl Fn(&BoardCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn sample_reads(&self) -> usize {
        self.count(|c| matches!(c, BoardCall::ReadSample))
    }

    pub fn store_writes(&self) -> Vec<(u16, u8)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BoardCall::WriteByte { address, value } => Some((*address, *value)),
                _ => None,
            })
            .collect()
    }

    pub fn segment_writes(&self) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BoardCall::Segments(p) => Some(*p),
                _ => None,
            })
            .collect()
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SwitchInput for MockBoard {
    fn read_input(&mut self, id: ButtonId) -> Result<SwitchState> {
        self.input_reads += 1;
        if self.fail_inputs {
            return Err(HalError::Gpio);
        }
        Ok(SwitchState::from(self.pressed[id.index()]))
    }
}

impl OutputPort for MockBoard {
    fn set_output(&mut self, id: OutputId, on: bool) -> Result<()> {
        self.calls.push(BoardCall::SetOutput { id, on });
        Ok(())
    }
}

impl AnalogPort for MockBoard {
    fn read_sample(&mut self) -> Result<u16> {
        self.calls.push(BoardCall::ReadSample);
        Ok(self.raw_sample)
    }
}

impl ByteStore for MockBoard {
    fn read_byte(&mut self, address: u16) -> Result<u8> {
        self.calls.push(BoardCall::ReadByte(address));
        if self.fail_store {
            return Err(HalError::Bus);
        }
        Ok(self.store.get(&address).copied().unwrap_or(0xFF))
    }

    fn write_byte(&mut self, address: u16, value: u8) -> Result<()> {
        self.calls.push(BoardCall::WriteByte { address, value });
        if self.fail_store {
            return Err(HalError::Bus);
        }
        self.store.insert(address, value);
        Ok(())
    }
}

impl SegmentBus for MockBoard {
    fn write_segments(&mut self, pattern: u8) -> Result<()> {
        self.calls.push(BoardCall::Segments(pattern));
        Ok(())
    }

    fn set_digit_enabled(&mut self, position: u8, enabled: bool) -> Result<()> {
        self.calls.push(BoardCall::DigitEnabled { position, enabled });
        Ok(())
    }
}

// ── Recording event sink ─────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<HeaterEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &HeaterEvent) {
        self.events.push(*event);
    }
}
