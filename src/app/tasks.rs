//! The water heater's task table.
//!
//! ```text
//!  idx  task      period  delay  does
//!  ───  ────────  ──────  ─────  ──────────────────────────────────────
//!   0   Init       5 ms     0    outputs off, seed store, suspend
//!   1   Debounce   5 ms     1    raw pins → settled switch states
//!   2   Control   25 ms     1    HeaterController::run
//!   3   Display   25 ms     2    light the next seven-segment digit
//! ```
//!
//! Table order is load-bearing: the debounce task runs before control on
//! a shared tick, so control always sees that tick's settled states.

use log::{debug, info, warn};

use crate::config::HeaterConfig;
use crate::debounce::SwitchFilter;
use crate::display::SegmentRefresh;
use crate::error::report;
use crate::scheduler::{Runnable, TaskControl, TaskDescriptor};

use super::context::HeaterContext;
use super::controller::HeaterController;
use super::events::HeaterEvent;
use super::ports::{ButtonId, DisplayPort, EventSink, HeaterHardware, OutputId};

/// Number of entries in the task table.
pub const TASK_COUNT: usize = 4;

// ═══════════════════════════════════════════════════════════════
//  Task variants
// ═══════════════════════════════════════════════════════════════

/// One entry of the table.  Each variant carries the state its
/// runnable keeps between invocations.
pub enum HeaterTask {
    Init(InitTask),
    Debounce(DebounceTask),
    Control(Box<HeaterController>),
    Display(SegmentRefresh),
}

impl<H: HeaterHardware, S: EventSink> Runnable<HeaterContext<H, S>> for HeaterTask {
    fn run(&mut self, ctx: &mut HeaterContext<H, S>, control: &mut TaskControl) {
        match self {
            Self::Init(task) => task.run(ctx, control),
            Self::Debounce(task) => task.run(ctx),
            Self::Control(controller) => controller.run(
                ctx.switches.states(),
                &mut ctx.hw,
                &mut ctx.display,
                &mut ctx.sink,
            ),
            Self::Display(refresh) => refresh.refresh(&ctx.display, &mut ctx.hw),
        }
    }
}

impl HeaterTask {
    /// The controller, if this is the control entry.
    pub fn as_controller(&self) -> Option<&HeaterController> {
        match self {
            Self::Control(controller) => Some(controller),
            _ => None,
        }
    }
}

/// Build the table from configuration.
pub fn build_task_table(config: &HeaterConfig) -> [TaskDescriptor<HeaterTask>; TASK_COUNT] {
    let [init_delay, debounce_delay, control_delay, display_delay] = config.initial_delay_ticks;
    [
        TaskDescriptor {
            name: "init",
            task: HeaterTask::Init(InitTask::new(config)),
            period_ms: config.init_task_period_ms,
            initial_delay_ticks: init_delay,
        },
        TaskDescriptor {
            name: "debounce",
            task: HeaterTask::Debounce(DebounceTask::new(config.debounce_settle_count)),
            period_ms: config.debounce_task_period_ms,
            initial_delay_ticks: debounce_delay,
        },
        TaskDescriptor {
            name: "control",
            task: HeaterTask::Control(Box::new(HeaterController::new(config.clone()))),
            period_ms: config.control_task_period_ms,
            initial_delay_ticks: control_delay,
        },
        TaskDescriptor {
            name: "display",
            task: HeaterTask::Display(SegmentRefresh::new(config.display_polarity)),
            period_ms: config.display_task_period_ms,
            initial_delay_ticks: display_delay,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════
//  Init
// ═══════════════════════════════════════════════════════════════

/// One-shot power-up work.
pub struct InitTask {
    config: HeaterConfig,
}

impl InitTask {
    pub fn new(config: &HeaterConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn run<H: HeaterHardware, S: EventSink>(
        &mut self,
        ctx: &mut HeaterContext<H, S>,
        control: &mut TaskControl,
    ) {
        report(ctx.hw.set_output(OutputId::HeatingElement, false), "heating element off");
        report(ctx.hw.set_output(OutputId::CoolingElement, false), "cooling element off");
        report(ctx.hw.set_output(OutputId::StatusLed, false), "status LED off");
        report(ctx.display.set_visible(false), "display off");

        let address = self.config.setpoint_address;
        let initial = self.config.initial_setpoint;
        match ctx.hw.read_byte(address) {
            Ok(stored) if self.config.is_valid_setpoint(stored) => {
                info!("Init: stored setpoint {}", stored);
            }
            Ok(stored) => {
                info!(
                    "Init: store holds {:#04x}, seeding setpoint {}",
                    stored, initial
                );
                match ctx.hw.write_byte(address, initial) {
                    Ok(()) => ctx.sink.emit(&HeaterEvent::StoreSeeded(initial)),
                    Err(e) => warn!("Init: seeding store failed: {e}"),
                }
            }
            Err(e) => warn!("Init: store read failed: {e}"),
        }

        control.suspend();
    }
}

// ═══════════════════════════════════════════════════════════════
//  Debounce
// ═══════════════════════════════════════════════════════════════

/// Per-tick switch sampling.
pub struct DebounceTask {
    filters: [SwitchFilter; ButtonId::COUNT],
    settle: u8,
}

impl DebounceTask {
    pub fn new(settle: u8) -> Self {
        Self {
            filters: [SwitchFilter::new(); ButtonId::COUNT],
            settle,
        }
    }

    fn run<H: HeaterHardware, S: EventSink>(&mut self, ctx: &mut HeaterContext<H, S>) {
        for id in ButtonId::ALL {
            let filter = &mut self.filters[id.index()];
            let raw = match ctx.hw.read_input(id) {
                Ok(level) => level,
                Err(e) => {
                    warn!("Debounce: {:?} read failed: {e}", id);
                    filter.previous_raw()
                }
            };
            if let Some(state) = filter.sample(raw, self.settle) {
                debug!("Debounce: {:?} -> {:?}", id, state);
            }
            ctx.switches.set(id.index(), filter.stable());
        }
    }
}
