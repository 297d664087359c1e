//! Periodic tick timer.
//!
//! Implements [`TickSource`] with ESP-IDF's `esp_timer` API on the device
//! and a sleeping std thread on simulation targets.  Either way the
//! registered callback runs outside the scheduler loop and must only
//! raise the tick flag.

use crate::error::Result;
use crate::tick::{Prescaler, TickSource};

#[cfg(target_os = "espidf")]
use esp_idf_sys::*;

#[cfg(target_os = "espidf")]
use crate::error::HalError;

// ═══════════════════════════════════════════════════════════════
//  ESP-IDF implementation
// ═══════════════════════════════════════════════════════════════

/// Periodic timer firing every `period_us` (times the prescaler divisor).
#[cfg(target_os = "espidf")]
pub struct TickTimer {
    period_us: u64,
    handle: esp_timer_handle_t,
    running: bool,
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_trampoline(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` is the `fn()` stored by `set_periodic_callback`;
    // function pointers and data pointers have the same width here.
    let callback: fn() = unsafe { core::mem::transmute::<*mut core::ffi::c_void, fn()>(arg) };
    callback();
}

#[cfg(target_os = "espidf")]
impl TickTimer {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_us: u64::from(period_ms) * 1000,
            handle: core::ptr::null_mut(),
            running: false,
        }
    }

    fn delete(&mut self) {
        if self.handle.is_null() {
            return;
        }
        // SAFETY: handle came from esp_timer_create and is stopped first.
        unsafe {
            esp_timer_stop(self.handle);
            esp_timer_delete(self.handle);
        }
        self.handle = core::ptr::null_mut();
        self.running = false;
    }
}

#[cfg(target_os = "espidf")]
impl TickSource for TickTimer {
    fn set_periodic_callback(&mut self, callback: fn()) -> Result<()> {
        self.delete();
        let args = esp_timer_create_args_t {
            callback: Some(tick_trampoline),
            arg: callback as *mut core::ffi::c_void,
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"tick".as_ptr(),
            skip_unhandled_events: true,
        };
        // SAFETY: `args` outlives the call; the handle is owned by self.
        let ret = unsafe { esp_timer_create(&args, &mut self.handle) };
        if ret != ESP_OK as i32 {
            log::error!("tick_timer: create failed (rc={})", ret);
            return Err(HalError::Timer);
        }
        Ok(())
    }

    fn start(&mut self, prescaler: Prescaler) -> Result<()> {
        if self.handle.is_null() {
            return Err(HalError::Timer);
        }
        let period = self.period_us * u64::from(prescaler.divisor());
        // SAFETY: handle is a live timer created above.
        let ret = unsafe { esp_timer_start_periodic(self.handle, period) };
        if ret != ESP_OK as i32 {
            log::error!("tick_timer: start failed (rc={})", ret);
            return Err(HalError::Timer);
        }
        self.running = true;
        log::info!("tick_timer: every {}us", period);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if self.handle.is_null() || !self.running {
            return Ok(());
        }
        // SAFETY: handle is a live, running timer.
        let ret = unsafe { esp_timer_stop(self.handle) };
        self.running = false;
        if ret != ESP_OK as i32 {
            return Err(HalError::Timer);
        }
        Ok(())
    }

    fn clear_counter(&mut self) -> Result<()> {
        // esp_timer restarts its period on every start; nothing to clear.
        Ok(())
    }
}

#[cfg(target_os = "espidf")]
impl Drop for TickTimer {
    fn drop(&mut self) {
        self.delete();
    }
}

// ═══════════════════════════════════════════════════════════════
//  Simulation implementation
// ═══════════════════════════════════════════════════════════════

#[cfg(not(target_os = "espidf"))]
use std::sync::Arc;
#[cfg(not(target_os = "espidf"))]
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
#[cfg(not(target_os = "espidf"))]
use std::thread::JoinHandle;
#[cfg(not(target_os = "espidf"))]
use std::time::Duration;

/// Periodic timer backed by a std thread that sleeps one period per tick.
#[cfg(not(target_os = "espidf"))]
pub struct TickTimer {
    period: Duration,
    callback: Option<fn()>,
    running: Arc<AtomicBool>,
    counter: Arc<AtomicU32>,
    thread: Option<JoinHandle<()>>,
}

#[cfg(not(target_os = "espidf"))]
impl TickTimer {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period: Duration::from_millis(u64::from(period_ms)),
            callback: None,
            running: Arc::new(AtomicBool::new(false)),
            counter: Arc::new(AtomicU32::new(0)),
            thread: None,
        }
    }

    /// Periods elapsed since the last clear.
    pub fn counter(&self) -> u32 {
        self.counter.load(Ordering::Acquire)
    }
}

#[cfg(not(target_os = "espidf"))]
impl TickSource for TickTimer {
    fn set_periodic_callback(&mut self, callback: fn()) -> Result<()> {
        self.callback = Some(callback);
        Ok(())
    }

    fn start(&mut self, prescaler: Prescaler) -> Result<()> {
        self.stop()?;
        let period = self.period * prescaler.divisor();
        let callback = self.callback;
        let running = Arc::clone(&self.running);
        let counter = Arc::clone(&self.counter);
        running.store(true, Ordering::Release);
        self.thread = Some(std::thread::spawn(move || {
            while running.load(Ordering::Acquire) {
                std::thread::sleep(period);
                if !running.load(Ordering::Acquire) {
                    break;
                }
                counter.fetch_add(1, Ordering::AcqRel);
                if let Some(cb) = callback {
                    cb();
                }
            }
        }));
        log::info!("tick_timer(sim): every {:?}", period);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.running.store(false, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        Ok(())
    }

    fn clear_counter(&mut self) -> Result<()> {
        self.counter.store(0, Ordering::Release);
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
impl Drop for TickTimer {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
