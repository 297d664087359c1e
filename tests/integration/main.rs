//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host (x86_64) with no
//! real hardware required.

mod heater_flow_tests;
mod mock_hw;
mod sim_board_tests;
mod task_table_tests;

use waterheater::app::context::HeaterContext;
use waterheater::app::controller::HeaterController;
use waterheater::app::ports::{ButtonId, HeaterHardware};
use waterheater::app::tasks::{HeaterTask, TASK_COUNT, build_task_table};
use waterheater::config::HeaterConfig;
use waterheater::scheduler::Scheduler;
use waterheater::tick::TickFlag;

use mock_hw::{MockBoard, RecordingSink};

pub type Sched = Scheduler<HeaterTask, TASK_COUNT>;

/// Scheduler with the production task table and its own tick flag.
pub fn scheduler(config: &HeaterConfig) -> Sched {
    let flag: &'static TickFlag = Box::leak(Box::new(TickFlag::new()));
    Scheduler::new(build_task_table(config), config.tick_ms, flag)
}

pub fn rig(board: MockBoard) -> (Sched, HeaterContext<MockBoard, RecordingSink>) {
    let config = HeaterConfig::default();
    (scheduler(&config), HeaterContext::new(board, RecordingSink::default()))
}

pub fn run_ticks<H: HeaterHardware>(
    sched: &mut Sched,
    ctx: &mut HeaterContext<H, RecordingSink>,
    n: u64,
) {
    for _ in 0..n {
        sched.dispatch(ctx);
    }
}

/// Hold `button` long enough to settle, then release it long enough for
/// the control task to see the release edge.
pub fn click(
    sched: &mut Sched,
    ctx: &mut HeaterContext<MockBoard, RecordingSink>,
    button: ButtonId,
) {
    ctx.hw.pressed[button.index()] = true;
    run_ticks(sched, ctx, 15);
    ctx.hw.pressed[button.index()] = false;
    run_ticks(sched, ctx, 15);
}

pub fn controller(sched: &Sched) -> &HeaterController {
    sched.tasks()[2]
        .task()
        .as_controller()
        .expect("control task sits at index 2")
}
