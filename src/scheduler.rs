//! Cooperative periodic-task scheduler.
//!
//! A fixed table of tasks is dispatched from a single loop whenever the
//! tick flag is raised.  Tasks run to completion in table order; none can
//! preempt another.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Task table (static order)                                   │
//! │  ┌──────────┬──────────┬────────────┬──────────────────────┐ │
//! │  │ task     │ period   │ countdown  │ state                │ │
//! │  ├──────────┼──────────┼────────────┼──────────────────────┤ │
//! │  │ Init     │ 1 tick   │ 0          │ Running → Suspended  │ │
//! │  │ Debounce │ 1 tick   │ 1          │ Running              │ │
//! │  │ Control  │ 5 ticks  │ 1          │ Running              │ │
//! │  │ Display  │ 5 ticks  │ 2          │ Running              │ │
//! │  └──────────┴──────────┴────────────┴──────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick, for every running task: a zero countdown reloads the
//! period and runs the task; the countdown is then decremented whether
//! or not the task ran.

use log::{debug, info};

use crate::error::report;
use crate::tick::{Prescaler, TickFlag, TickSource};

// ═══════════════════════════════════════════════════════════════
//  Task abstraction
// ═══════════════════════════════════════════════════════════════

/// A unit of periodic work.
///
/// `C` is the shared application context every task in the table
/// receives.  `control` lets the running task act on its own schedule
/// entry (and only its own).
pub trait Runnable<C> {
    fn run(&mut self, ctx: &mut C, control: &mut TaskControl);
}

/// Static registration for one task.
pub struct TaskDescriptor<T> {
    pub name: &'static str,
    pub task: T,
    /// Nominal period in milliseconds.  Must be a non-zero multiple of
    /// the tick interval.
    pub period_ms: u32,
    /// Ticks to wait before the first run.
    pub initial_delay_ticks: u32,
}

/// Run state of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Running,
    Suspended,
}

/// Runtime bookkeeping for one table entry.
pub struct ScheduledTask<T> {
    name: &'static str,
    task: T,
    remaining_ticks: u32,
    period_ticks: u32,
    state: TaskState,
}

impl<T> ScheduledTask<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn remaining_ticks(&self) -> u32 {
        self.remaining_ticks
    }

    pub fn period_ticks(&self) -> u32 {
        self.period_ticks
    }

    pub fn task(&self) -> &T {
        &self.task
    }
}

/// Self-directed schedule requests made by the currently running task.
///
/// Handed to [`Runnable::run`]; the scheduler applies the requests to the
/// task that received it before the countdown is decremented.
#[derive(Debug)]
pub struct TaskControl {
    tick_ms: u32,
    suspend: bool,
    sleep_ticks: u32,
}

impl TaskControl {
    fn new(tick_ms: u32) -> Self {
        Self {
            tick_ms,
            suspend: false,
            sleep_ticks: 0,
        }
    }

    /// Stop scheduling the calling task.  Used by one-shot work.
    pub fn suspend(&mut self) {
        self.suspend = true;
    }

    /// Defer the calling task's next run by `ms` beyond its period.
    pub fn sleep(&mut self, ms: u32) {
        self.sleep_ticks = self.sleep_ticks.saturating_add(ms / self.tick_ms);
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// The scheduler engine: owns the task table and the tick flag it waits on.
pub struct Scheduler<T, const N: usize> {
    tasks: [ScheduledTask<T>; N],
    flag: &'static TickFlag,
    tick_ms: u32,
    ticks: u64,
}

impl<T, const N: usize> Scheduler<T, N> {
    /// Build one scheduled entry per descriptor, all running.
    pub fn new(table: [TaskDescriptor<T>; N], tick_ms: u32, flag: &'static TickFlag) -> Self {
        debug_assert!(tick_ms > 0, "tick interval must be non-zero");
        let tasks = table.map(|d| {
            debug_assert!(
                d.period_ms > 0 && d.period_ms % tick_ms == 0,
                "task '{}' period {}ms is not a multiple of the {}ms tick",
                d.name,
                d.period_ms,
                tick_ms
            );
            ScheduledTask {
                name: d.name,
                task: d.task,
                remaining_ticks: d.initial_delay_ticks,
                period_ticks: d.period_ms / tick_ms,
                state: TaskState::Running,
            }
        });
        info!("Scheduler: {} tasks, {}ms tick", N, tick_ms);
        Self {
            tasks,
            flag,
            tick_ms,
            ticks: 0,
        }
    }

    /// Hook the tick timer up to `on_tick`.  The timer is left stopped.
    pub fn attach(&self, timer: &mut impl TickSource, on_tick: fn()) {
        report(timer.stop(), "tick timer stop");
        report(timer.set_periodic_callback(on_tick), "tick timer callback");
        report(timer.clear_counter(), "tick timer clear");
    }

    /// Start the timer and dispatch forever.
    pub fn start<C>(&mut self, timer: &mut impl TickSource, ctx: &mut C) -> !
    where
        T: Runnable<C>,
    {
        report(timer.start(Prescaler::Div1), "tick timer start");
        info!("Scheduler: started");
        loop {
            if !self.poll(ctx) {
                core::hint::spin_loop();
            }
        }
    }

    /// Dispatch one tick if the flag is raised.  Returns whether it was.
    pub fn poll<C>(&mut self, ctx: &mut C) -> bool
    where
        T: Runnable<C>,
    {
        if self.flag.take() {
            self.dispatch(ctx);
            true
        } else {
            false
        }
    }

    /// Run one tick's worth of the table.
    pub fn dispatch<C>(&mut self, ctx: &mut C)
    where
        T: Runnable<C>,
    {
        self.ticks += 1;
        for entry in &mut self.tasks {
            if entry.state != TaskState::Running {
                continue;
            }

            if entry.remaining_ticks == 0 {
                entry.remaining_ticks = entry.period_ticks;
                let mut control = TaskControl::new(self.tick_ms);
                entry.task.run(ctx, &mut control);

                if control.sleep_ticks > 0 {
                    debug!("Scheduler: '{}' sleeps {} ticks", entry.name, control.sleep_ticks);
                    entry.remaining_ticks =
                        entry.remaining_ticks.saturating_add(control.sleep_ticks);
                }
                if control.suspend {
                    info!("Scheduler: '{}' suspended", entry.name);
                    entry.state = TaskState::Suspended;
                }
            }

            entry.remaining_ticks = entry.remaining_ticks.saturating_sub(1);
        }
    }

    /// Ticks dispatched since startup.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn tasks(&self) -> &[ScheduledTask<T>; N] {
        &self.tasks
    }

    /// Number of tasks still being scheduled.
    pub fn running_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.state == TaskState::Running)
            .count()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
