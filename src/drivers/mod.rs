//! Peripheral drivers that sit below the adapters.

#[cfg(target_os = "espidf")]
pub mod adc;
pub mod tick_timer;
