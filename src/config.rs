//! System configuration parameters
//!
//! All tunable parameters for the water heater.  Defaults reproduce the
//! shipped product; a JSON override can be loaded at startup.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::display::Polarity;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaterConfig {
    // --- Scheduler ---
    /// Tick interval of the periodic timer (milliseconds)
    pub tick_ms: u32,
    /// One-shot initialisation task period (milliseconds)
    pub init_task_period_ms: u32,
    /// Switch debounce task period (milliseconds)
    pub debounce_task_period_ms: u32,
    /// Control state machine task period (milliseconds)
    pub control_task_period_ms: u32,
    /// Display multiplex task period (milliseconds)
    pub display_task_period_ms: u32,
    /// Initial delays in ticks, in table order: init, debounce, control, display
    pub initial_delay_ticks: [u32; 4],

    // --- Setpoint ---
    /// Lowest selectable setpoint (degrees)
    pub setpoint_min: u8,
    /// Highest selectable setpoint (degrees)
    pub setpoint_max: u8,
    /// Increment applied by one Up/Down press (degrees)
    pub setpoint_step: u8,
    /// Setpoint seeded into an unprogrammed store (degrees)
    pub initial_setpoint: u8,
    /// Byte address of the persisted setpoint
    pub setpoint_address: u16,

    // --- Control ---
    /// Half-width of the dead-band around the setpoint (degrees)
    pub dead_band: u8,
    /// Switch both elements off inside the dead-band
    pub dead_band_shutoff: bool,
    /// Raw analog counts per degree
    pub sensor_factor: u16,
    /// Control invocations between temperature samples
    pub sample_every: u16,
    /// Control invocations per half second
    pub half_second_every: u16,
    /// Half seconds without a press before leaving setpoint adjustment
    pub settings_timeout_half_secs: u8,

    // --- Inputs ---
    /// Consecutive equal raw reads before a switch state is accepted
    pub debounce_settle_count: u8,

    // --- Display ---
    /// How the seven-segment common pins are wired
    pub display_polarity: Polarity,
}

impl Default for HeaterConfig {
    fn default() -> Self {
        Self {
            // Scheduler
            tick_ms: 5,
            init_task_period_ms: 5,
            debounce_task_period_ms: 5,
            control_task_period_ms: 25,
            display_task_period_ms: 25,
            initial_delay_ticks: [0, 1, 1, 2],

            // Setpoint
            setpoint_min: 35,
            setpoint_max: 75,
            setpoint_step: 5,
            initial_setpoint: 60,
            setpoint_address: 0x0000,

            // Control
            dead_band: 5,
            dead_band_shutoff: true,
            sensor_factor: 2,
            sample_every: 8,       // 200 ms at 25 ms
            half_second_every: 20, // 500 ms at 25 ms
            settings_timeout_half_secs: 10,

            // Inputs
            debounce_settle_count: 5,

            // Display
            display_polarity: Polarity::CommonCathode,
        }
    }
}

impl HeaterConfig {
    /// Parse a JSON document and validate it.  Missing fields take
    /// their default value.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|_| ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the scheduler and controller cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::Validation("tick_ms must be non-zero"));
        }
        for period in [
            self.init_task_period_ms,
            self.debounce_task_period_ms,
            self.control_task_period_ms,
            self.display_task_period_ms,
        ] {
            if period == 0 || period % self.tick_ms != 0 {
                return Err(ConfigError::Validation(
                    "task periods must be non-zero multiples of tick_ms",
                ));
            }
        }
        if self.setpoint_step == 0 {
            return Err(ConfigError::Validation("setpoint_step must be non-zero"));
        }
        if self.setpoint_min >= self.setpoint_max {
            return Err(ConfigError::Validation("setpoint_min must be below setpoint_max"));
        }
        if (self.setpoint_max - self.setpoint_min) % self.setpoint_step != 0 {
            return Err(ConfigError::Validation(
                "setpoint range must be a whole number of steps",
            ));
        }
        if self.setpoint_max > 99 {
            return Err(ConfigError::Validation("setpoint_max must fit two digits"));
        }
        if !self.is_valid_setpoint(self.initial_setpoint) {
            return Err(ConfigError::Validation(
                "initial_setpoint must be a reachable setpoint",
            ));
        }
        if self.sensor_factor == 0 {
            return Err(ConfigError::Validation("sensor_factor must be non-zero"));
        }
        if self.sample_every == 0 || self.half_second_every == 0 {
            return Err(ConfigError::Validation("control cadences must be non-zero"));
        }
        if self.debounce_settle_count == 0 {
            return Err(ConfigError::Validation("debounce_settle_count must be non-zero"));
        }
        Ok(())
    }

    /// True if `value` is one of the setpoints reachable with Up/Down.
    pub fn is_valid_setpoint(&self, value: u8) -> bool {
        (self.setpoint_min..=self.setpoint_max).contains(&value)
            && (value - self.setpoint_min) % self.setpoint_step == 0
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from loading or validating a [`HeaterConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid JSON for this schema.
    Parse,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    Validation(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "config could not be parsed"),
            Self::Validation(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
