//! Two-wire EEPROM byte store.
//!
//! Drives a 24Cxx-style serial EEPROM over any `embedded-hal` I²C bus:
//!
//! ```text
//!  write:  S [0x50|W] [addr_hi] [addr_lo] [data] P
//!  read:   S [0x50|W] [addr_hi] [addr_lo] Sr [0x50|R] [data] NACK P
//! ```
//!
//! The device ignores its address while an internal write cycle runs,
//! so every transaction first polls for an acknowledge.  Polling is
//! bounded; a device that never answers reports [`StorageError::Busy`].

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};
use log::debug;

use crate::app::ports::ByteStore;
use crate::error::{HalError, Result, StorageError};

/// 7-bit bus address of the device with A0–A2 tied low.
pub const DEFAULT_ADDRESS: u8 = 0x50;

/// Address attempts before giving up on a busy device.
pub const DEFAULT_POLL_BUDGET: u32 = 1000;

/// Byte store backed by an I²C EEPROM.
pub struct I2cEeprom<I2C> {
    bus: I2C,
    address: u8,
    capacity: u32,
    poll_budget: u32,
}

impl<I2C: I2c> I2cEeprom<I2C> {
    /// `capacity` is the device size in bytes (e.g. 32768 for a 24C256).
    pub fn new(bus: I2C, capacity: u32) -> Self {
        Self {
            bus,
            address: DEFAULT_ADDRESS,
            capacity,
            poll_budget: DEFAULT_POLL_BUDGET,
        }
    }

    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn with_poll_budget(mut self, attempts: u32) -> Self {
        self.poll_budget = attempts.max(1);
        self
    }

    /// Give the bus back.
    pub fn release(self) -> I2C {
        self.bus
    }

    fn check(&self, address: u16) -> Result<[u8; 2]> {
        if u32::from(address) >= self.capacity {
            return Err(StorageError::OutOfRange(address).into());
        }
        Ok(address.to_be_bytes())
    }

    /// Run `op` until the device acknowledges its address.
    fn with_ack_poll<T>(
        &mut self,
        mut op: impl FnMut(&mut I2C, u8) -> core::result::Result<T, I2C::Error>,
    ) -> Result<T> {
        for attempt in 0..self.poll_budget {
            match op(&mut self.bus, self.address) {
                Ok(value) => {
                    if attempt > 0 {
                        debug!("EEPROM: acknowledged after {} polls", attempt);
                    }
                    return Ok(value);
                }
                Err(e) if matches!(e.kind(), ErrorKind::NoAcknowledge(_)) => continue,
                Err(_) => return Err(HalError::Bus),
            }
        }
        Err(StorageError::Busy.into())
    }
}

impl<I2C: I2c> ByteStore for I2cEeprom<I2C> {
    fn read_byte(&mut self, address: u16) -> Result<u8> {
        let [hi, lo] = self.check(address)?;
        self.with_ack_poll(|bus, dev| {
            let mut data = [0u8; 1];
            bus.write_read(dev, &[hi, lo], &mut data)?;
            Ok(data[0])
        })
    }

    fn write_byte(&mut self, address: u16, value: u8) -> Result<()> {
        let [hi, lo] = self.check(address)?;
        self.with_ack_poll(|bus, dev| bus.write(dev, &[hi, lo, value]))
    }
}
