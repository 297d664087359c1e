//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured heater events to the
//! logger (UART on the device, stderr on the host).

use log::info;

use crate::app::events::HeaterEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`HeaterEvent`] as one line.
#[derive(Debug, Default)]
pub struct LogEventSink {
    emitted: u32,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events emitted since startup.
    pub fn emitted(&self) -> u32 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &HeaterEvent) {
        self.emitted = self.emitted.wrapping_add(1);
        match event {
            HeaterEvent::ModeChanged { from, to } => {
                info!("MODE | {} -> {}", from.name(), to.name());
            }
            HeaterEvent::SetpointChanged(sp) => {
                info!("SETPOINT | {}\u{00b0}C", sp);
            }
            HeaterEvent::ElementChanged { from, to } => {
                info!("ELEMENT | {:?} -> {:?}", from, to);
            }
            HeaterEvent::SetpointSaved(sp) => {
                info!("STORE | saved setpoint {}\u{00b0}C", sp);
            }
            HeaterEvent::SetpointLoaded(sp) => {
                info!("STORE | loaded setpoint {}\u{00b0}C", sp);
            }
            HeaterEvent::StoreSeeded(sp) => {
                info!("STORE | seeded setpoint {}\u{00b0}C", sp);
            }
        }
    }
}
