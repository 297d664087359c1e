//! GPIO / peripheral pin assignments for the water heater control board.
//!
//! Single source of truth: the device entry point references this module
//! rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Front-panel buttons (to ground, internal pull-ups, active LOW)
// ---------------------------------------------------------------------------

pub const BUTTON_ON_OFF_GPIO: i32 = 4;
pub const BUTTON_DOWN_GPIO: i32 = 5;
pub const BUTTON_UP_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Elements and indicator (relay drivers, active HIGH)
// ---------------------------------------------------------------------------

pub const HEATING_ELEMENT_GPIO: i32 = 7;
pub const COOLING_ELEMENT_GPIO: i32 = 15;
pub const STATUS_LED_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Temperature sensor (ADC1)
// ---------------------------------------------------------------------------

/// ADC1 channel 2 (GPIO 3 on ESP32-S3).
pub const TEMP_ADC_CHANNEL: u32 = 2;

// ---------------------------------------------------------------------------
// Seven-segment display
// ---------------------------------------------------------------------------

/// Segment lines a, b, c, d, e, f, g, dp.
pub const SEGMENT_GPIOS: [i32; 8] = [17, 18, 8, 9, 10, 11, 12, 13];
/// Common lines: tens, ones.
pub const DIGIT_COMMON_GPIOS: [i32; 2] = [14, 21];

// ---------------------------------------------------------------------------
// EEPROM (I²C0)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 1;
pub const I2C_SCL_GPIO: i32 = 2;
pub const I2C_FREQ_HZ: u32 = 100_000;
/// 24C256: 32 KiB.
pub const EEPROM_CAPACITY: u32 = 32 * 1024;
/// 7-bit address with A0 strapped high.
pub const EEPROM_I2C_ADDRESS: u8 = 0x51;
