//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter          | Implements                         | Connects to                |
//! |------------------|------------------------------------|----------------------------|
//! | `hardware`       | SwitchInput, OutputPort, SegmentBus| embedded-hal GPIO pins     |
//! |                  | AnalogPort, ByteStore (delegated)  |                            |
//! | `eeprom`         | ByteStore                          | 24Cxx EEPROM over I²C      |
//! | `log_sink`       | EventSink                          | Serial / console log       |
//! | `sim`            | every board port                   | Thermal model (host runs)  |
//! | `console_logger` | `log::Log`                         | stderr (host runs)         |

pub mod eeprom;
pub mod hardware;
pub mod log_sink;
pub mod sim;

#[cfg(not(target_os = "espidf"))]
pub mod console_logger;
