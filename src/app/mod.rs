//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules of the water heater: the
//! control state machine, the task table the scheduler runs, and the
//! context those tasks share.  All interaction with hardware happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod context;
pub mod controller;
pub mod events;
pub mod ports;
pub mod tasks;
