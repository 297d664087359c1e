//! Outbound application events.
//!
//! The [`HeaterController`](super::controller::HeaterController) and the
//! init task emit these through the [`EventSink`](super::ports::EventSink)
//! port.  Adapters on the other side decide what to do with them.

use super::controller::{HeaterMode, RunningElement};

/// Structured events emitted by the control core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaterEvent {
    /// The operating mode changed.
    ModeChanged { from: HeaterMode, to: HeaterMode },

    /// Up/Down moved the setpoint (degrees).
    SetpointChanged(u8),

    /// Hysteresis switched the active element.
    ElementChanged { from: RunningElement, to: RunningElement },

    /// The setpoint was written to the store on the way to Off.
    SetpointSaved(u8),

    /// The setpoint was read from the store on the way to Running.
    SetpointLoaded(u8),

    /// The init task seeded an unprogrammed store.
    StoreSeeded(u8),
}
