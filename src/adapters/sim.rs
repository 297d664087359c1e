//! Simulated board for host runs.
//!
//! Stands in for every port on a development machine:
//!
//! - a first-order thermal plant driven by the element outputs,
//! - buttons pressed from a script keyed by tick number,
//! - an in-memory EEPROM that starts erased (0xFF),
//! - segment/common lines latched for inspection.
//!
//! The plant advances once per [`SimBoard::advance_tick`], so a run is
//! deterministic regardless of wall-clock timing.

use log::debug;

use crate::app::ports::{
    AnalogPort, ButtonId, ByteStore, OutputId, OutputPort, SegmentBus, SwitchInput,
};
use crate::debounce::SwitchState;
use crate::error::{HalError, Result, StorageError};

/// Bytes of simulated EEPROM.
pub const SIM_STORE_SIZE: usize = 256;

/// One scripted button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedPress {
    pub at_tick: u64,
    pub button: ButtonId,
    pub hold_ticks: u64,
}

impl ScriptedPress {
    pub fn new(at_tick: u64, button: ButtonId, hold_ticks: u64) -> Self {
        Self {
            at_tick,
            button,
            hold_ticks,
        }
    }

    fn is_held(&self, tick: u64) -> bool {
        tick >= self.at_tick && tick < self.at_tick + self.hold_ticks
    }
}

/// Water tank temperature model (degrees C per tick).
#[derive(Debug, Clone, Copy)]
pub struct ThermalPlant {
    pub temperature: f32,
    pub ambient: f32,
    pub heat_rate: f32,
    pub cool_rate: f32,
    /// Fraction of the gap to ambient lost per tick.
    pub loss: f32,
}

impl Default for ThermalPlant {
    fn default() -> Self {
        Self {
            temperature: 25.0,
            ambient: 25.0,
            heat_rate: 0.02,
            cool_rate: 0.02,
            loss: 0.0001,
        }
    }
}

impl ThermalPlant {
    pub fn step(&mut self, heating: bool, cooling: bool) {
        if heating {
            self.temperature += self.heat_rate;
        }
        if cooling {
            self.temperature -= self.cool_rate;
        }
        self.temperature -= (self.temperature - self.ambient) * self.loss;
    }
}

/// The simulated board.
pub struct SimBoard {
    tick: u64,
    plant: ThermalPlant,
    sensor_factor: u16,
    script: Vec<ScriptedPress>,
    outputs: [bool; OutputId::COUNT],
    store: [u8; SIM_STORE_SIZE],
    segments: u8,
    enabled: [bool; 2],
}

impl SimBoard {
    pub fn new(plant: ThermalPlant, sensor_factor: u16) -> Self {
        Self {
            tick: 0,
            plant,
            sensor_factor,
            script: Vec::new(),
            outputs: [false; OutputId::COUNT],
            store: [0xFF; SIM_STORE_SIZE],
            segments: 0,
            enabled: [false; 2],
        }
    }

    pub fn with_script(mut self, script: Vec<ScriptedPress>) -> Self {
        self.script = script;
        self
    }

    /// Move simulated time forward one scheduler tick.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
        self.plant.step(
            self.outputs[OutputId::HeatingElement.index()],
            self.outputs[OutputId::CoolingElement.index()],
        );
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn temperature(&self) -> f32 {
        self.plant.temperature
    }

    pub fn output(&self, id: OutputId) -> bool {
        self.outputs[id.index()]
    }

    pub fn stored_byte(&self, address: u16) -> Option<u8> {
        self.store.get(usize::from(address)).copied()
    }

    pub fn segments(&self) -> u8 {
        self.segments
    }

    pub fn digit_enabled(&self, position: u8) -> bool {
        self.enabled.get(usize::from(position)).copied().unwrap_or(false)
    }
}

impl SwitchInput for SimBoard {
    fn read_input(&mut self, id: ButtonId) -> Result<SwitchState> {
        let held = self
            .script
            .iter()
            .any(|p| p.button == id && p.is_held(self.tick));
        Ok(SwitchState::from(held))
    }
}

impl OutputPort for SimBoard {
    fn set_output(&mut self, id: OutputId, on: bool) -> Result<()> {
        let slot = &mut self.outputs[id.index()];
        if *slot != on {
            debug!("Sim: {:?} -> {}", id, if on { "on" } else { "off" });
        }
        *slot = on;
        Ok(())
    }
}

impl AnalogPort for SimBoard {
    fn read_sample(&mut self) -> Result<u16> {
        let raw = self.plant.temperature.max(0.0) * f32::from(self.sensor_factor);
        Ok(raw as u16)
    }
}

impl ByteStore for SimBoard {
    fn read_byte(&mut self, address: u16) -> Result<u8> {
        self.stored_byte(address)
            .ok_or(HalError::Storage(StorageError::OutOfRange(address)))
    }

    fn write_byte(&mut self, address: u16, value: u8) -> Result<()> {
        let slot = self
            .store
            .get_mut(usize::from(address))
            .ok_or(StorageError::OutOfRange(address))?;
        *slot = value;
        Ok(())
    }
}

impl SegmentBus for SimBoard {
    fn write_segments(&mut self, pattern: u8) -> Result<()> {
        self.segments = pattern;
        Ok(())
    }

    fn set_digit_enabled(&mut self, position: u8, enabled: bool) -> Result<()> {
        let slot = self
            .enabled
            .get_mut(usize::from(position))
            .ok_or(HalError::InvalidId(position))?;
        *slot = enabled;
        Ok(())
    }
}
