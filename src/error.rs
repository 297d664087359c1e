//! Unified error types for the water heater firmware.
//!
//! Every collaborator behind a port trait (GPIO, ADC, two-wire bus,
//! EEPROM, tick timer, display) reports failure through [`HalError`].
//! The control core never branches on these: a failed call is logged
//! and the tick carries on as if it had succeeded.  All variants are
//! `Copy` so they can be passed around without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Hardware abstraction errors
// ---------------------------------------------------------------------------

/// Failure reported by a hardware collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// A GPIO read or write failed.
    Gpio,
    /// The analog converter did not produce a sample.
    Adc,
    /// A two-wire bus transaction was not acknowledged.
    Bus,
    /// The non-volatile store rejected the access.
    Storage(StorageError),
    /// The periodic tick timer could not be configured.
    Timer,
    /// A display digit outside 0–9 was requested.
    InvalidDigit(u8),
    /// An input/output/display position that the board does not have.
    InvalidId(u8),
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpio => write!(f, "GPIO access failed"),
            Self::Adc => write!(f, "ADC read failed"),
            Self::Bus => write!(f, "bus transaction not acknowledged"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Timer => write!(f, "tick timer configuration failed"),
            Self::InvalidDigit(d) => write!(f, "digit {d} out of range"),
            Self::InvalidId(id) => write!(f, "no such channel {id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Address lies beyond the end of the device.
    OutOfRange(u16),
    /// The device stayed busy (no acknowledge) for the whole poll budget.
    Busy,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange(addr) => write!(f, "address 0x{addr:04X} out of range"),
            Self::Busy => write!(f, "device busy"),
        }
    }
}

impl From<StorageError> for HalError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias for collaborator calls.
pub type Result<T> = core::result::Result<T, HalError>;

/// Log a failed collaborator call and carry on.
///
/// The core treats every port call as successful; this is the single
/// place where the failure becomes visible.
pub fn report(result: Result<()>, what: &'static str) {
    if let Err(e) = result {
        log::warn!("{what}: {e}");
    }
}
