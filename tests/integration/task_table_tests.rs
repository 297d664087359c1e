//! Integration tests for the scheduler running the production task table.
//!
//! Timeline with the default table (tick = one `dispatch`):
//! init at 0; debounce every tick from 1; control at 1, 6, 11, ...;
//! display at 2, 7, 12, ...

use waterheater::app::events::HeaterEvent;
use waterheater::app::ports::OutputId;
use waterheater::scheduler::TaskState;

use super::mock_hw::{BoardCall, MockBoard};
use super::{rig, run_ticks};

#[test]
fn init_runs_once_and_seeds_erased_store() {
    let (mut sched, mut ctx) = rig(MockBoard::new());
    run_ticks(&mut sched, &mut ctx, 10);

    assert_eq!(sched.tasks()[0].state(), TaskState::Suspended);
    assert_eq!(sched.running_count(), 3);
    assert_eq!(ctx.hw.store_writes(), vec![(0x0000, 60)]);
    assert!(ctx.sink.events.contains(&HeaterEvent::StoreSeeded(60)));
    assert_eq!(
        ctx.hw.calls[..3],
        [
            BoardCall::SetOutput { id: OutputId::HeatingElement, on: false },
            BoardCall::SetOutput { id: OutputId::CoolingElement, on: false },
            BoardCall::SetOutput { id: OutputId::StatusLed, on: false },
        ]
    );
}

#[test]
fn init_keeps_valid_stored_setpoint() {
    let (mut sched, mut ctx) = rig(MockBoard::new().with_stored(0, 45));
    run_ticks(&mut sched, &mut ctx, 3);
    assert!(ctx.hw.store_writes().is_empty());
}

#[test]
fn debounce_polls_every_button_every_tick() {
    let (mut sched, mut ctx) = rig(MockBoard::new());
    // Ticks 0..=10: debounce runs on ticks 1..=10.
    run_ticks(&mut sched, &mut ctx, 11);
    assert_eq!(ctx.hw.input_reads, 30);
}

#[test]
fn control_samples_on_first_and_every_eighth_run() {
    let (mut sched, mut ctx) = rig(MockBoard::new().with_water(50));
    // Control runs 1, 9 and 17 fall on ticks 1, 41 and 81.
    run_ticks(&mut sched, &mut ctx, 41);
    assert_eq!(ctx.hw.sample_reads(), 1);
    run_ticks(&mut sched, &mut ctx, 1);
    assert_eq!(ctx.hw.sample_reads(), 2);
    run_ticks(&mut sched, &mut ctx, 40);
    assert_eq!(ctx.hw.sample_reads(), 3);
}

#[test]
fn display_refreshes_every_fifth_tick_after_delay() {
    let (mut sched, mut ctx) = rig(MockBoard::new());
    run_ticks(&mut sched, &mut ctx, 2);
    assert!(ctx.hw.segment_writes().is_empty());
    run_ticks(&mut sched, &mut ctx, 1);
    assert_eq!(ctx.hw.segment_writes().len(), 1);
    run_ticks(&mut sched, &mut ctx, 10);
    assert_eq!(ctx.hw.segment_writes().len(), 3);
}

#[test]
fn hidden_display_is_never_lit() {
    let (mut sched, mut ctx) = rig(MockBoard::new());
    run_ticks(&mut sched, &mut ctx, 200);
    assert_eq!(
        ctx.hw.count(|c| matches!(c, BoardCall::DigitEnabled { enabled: true, .. })),
        0
    );
}

#[test]
fn tick_count_tracks_dispatches() {
    let (mut sched, mut ctx) = rig(MockBoard::new());
    run_ticks(&mut sched, &mut ctx, 123);
    assert_eq!(sched.tick_count(), 123);
}
