//! End-to-end control flows: buttons in, elements and display out.
//!
//! Every test drives the full task table through the scheduler, so the
//! debounce filter, control cadences and display refresh all take part.

use waterheater::app::controller::{HeaterMode, RunningElement};
use waterheater::app::events::HeaterEvent;
use waterheater::app::ports::{ButtonId, OutputId};

use super::mock_hw::{BoardCall, MockBoard};
use super::{click, controller, rig, run_ticks};

#[test]
fn on_off_loads_stored_setpoint_and_runs() {
    let (mut sched, mut ctx) = rig(MockBoard::new().with_stored(0, 45));
    run_ticks(&mut sched, &mut ctx, 5);
    click(&mut sched, &mut ctx, ButtonId::OnOff);

    let c = controller(&sched);
    assert_eq!(c.mode(), HeaterMode::Running);
    assert_eq!(c.setpoint(), 45);
    assert!(ctx.sink.events.contains(&HeaterEvent::SetpointLoaded(45)));
    assert!(ctx.sink.events.contains(&HeaterEvent::ModeChanged {
        from: HeaterMode::Off,
        to: HeaterMode::Running,
    }));
}

#[test]
fn press_without_release_does_nothing() {
    let (mut sched, mut ctx) = rig(MockBoard::new());
    ctx.hw.pressed[ButtonId::OnOff.index()] = true;
    run_ticks(&mut sched, &mut ctx, 200);
    assert_eq!(controller(&sched).mode(), HeaterMode::Off);
}

#[test]
fn short_glitch_is_filtered_out() {
    let (mut sched, mut ctx) = rig(MockBoard::new());
    run_ticks(&mut sched, &mut ctx, 10);
    ctx.hw.pressed[ButtonId::OnOff.index()] = true;
    run_ticks(&mut sched, &mut ctx, 3);
    ctx.hw.pressed[ButtonId::OnOff.index()] = false;
    run_ticks(&mut sched, &mut ctx, 30);
    assert_eq!(controller(&sched).mode(), HeaterMode::Off);
}

#[test]
fn hot_water_selects_cooling_once_window_fills() {
    let (mut sched, mut ctx) = rig(MockBoard::new().with_water(70));
    run_ticks(&mut sched, &mut ctx, 5);
    click(&mut sched, &mut ctx, ButtonId::OnOff);
    run_ticks(&mut sched, &mut ctx, 450);

    assert_eq!(controller(&sched).running_element(), RunningElement::Cooling);
    assert!(ctx.hw.output(OutputId::CoolingElement));
    assert!(!ctx.hw.output(OutputId::HeatingElement));
    assert!(ctx.hw.output(OutputId::StatusLed));
}

#[test]
fn cold_water_heats_and_blinks_indicator() {
    let (mut sched, mut ctx) = rig(MockBoard::new().with_water(30));
    run_ticks(&mut sched, &mut ctx, 5);
    click(&mut sched, &mut ctx, ButtonId::OnOff);
    run_ticks(&mut sched, &mut ctx, 500);

    assert_eq!(controller(&sched).running_element(), RunningElement::Heating);
    assert!(ctx.hw.output(OutputId::HeatingElement));
    let led = |on| {
        ctx.hw
            .count(|c| *c == BoardCall::SetOutput { id: OutputId::StatusLed, on })
    };
    assert!(led(true) >= 2, "indicator blinks on");
    assert!(led(false) >= 2, "indicator blinks off");
}

#[test]
fn settings_revert_to_running_after_five_idle_seconds() {
    let (mut sched, mut ctx) = rig(MockBoard::new());
    run_ticks(&mut sched, &mut ctx, 5);
    click(&mut sched, &mut ctx, ButtonId::OnOff);
    click(&mut sched, &mut ctx, ButtonId::Up);
    assert_eq!(controller(&sched).mode(), HeaterMode::SettingSetpoint);
    assert_eq!(controller(&sched).setpoint(), 60);

    run_ticks(&mut sched, &mut ctx, 850);
    assert_eq!(controller(&sched).mode(), HeaterMode::SettingSetpoint);
    run_ticks(&mut sched, &mut ctx, 150);
    assert_eq!(controller(&sched).mode(), HeaterMode::Running);
}

#[test]
fn power_off_persists_adjusted_setpoint() {
    let (mut sched, mut ctx) = rig(MockBoard::new().with_water(30));
    run_ticks(&mut sched, &mut ctx, 5);
    click(&mut sched, &mut ctx, ButtonId::OnOff);
    click(&mut sched, &mut ctx, ButtonId::Up);
    click(&mut sched, &mut ctx, ButtonId::Up);
    assert_eq!(controller(&sched).setpoint(), 65);
    click(&mut sched, &mut ctx, ButtonId::OnOff);

    let c = controller(&sched);
    assert_eq!(c.mode(), HeaterMode::Off);
    assert_eq!(c.running_element(), RunningElement::None);
    assert_eq!(ctx.hw.store_writes(), vec![(0, 60), (0, 65)]);
    assert!(ctx.sink.events.contains(&HeaterEvent::SetpointSaved(65)));
    for id in [OutputId::HeatingElement, OutputId::CoolingElement, OutputId::StatusLed] {
        assert!(!ctx.hw.output(id), "{id:?} left on");
    }
    assert!(!ctx.display.is_visible());
}

#[test]
fn down_lowers_setpoint_in_setting_mode() {
    let (mut sched, mut ctx) = rig(MockBoard::new());
    run_ticks(&mut sched, &mut ctx, 5);
    click(&mut sched, &mut ctx, ButtonId::OnOff);
    click(&mut sched, &mut ctx, ButtonId::Down);
    click(&mut sched, &mut ctx, ButtonId::Down);
    assert_eq!(controller(&sched).setpoint(), 55);
    assert_eq!(ctx.display.value(), 55);
    assert!(ctx.sink.events.contains(&HeaterEvent::SetpointChanged(55)));
}

#[test]
fn running_display_shows_live_temperature() {
    let (mut sched, mut ctx) = rig(MockBoard::new().with_water(57));
    run_ticks(&mut sched, &mut ctx, 5);
    click(&mut sched, &mut ctx, ButtonId::OnOff);
    run_ticks(&mut sched, &mut ctx, 100);

    assert_eq!(ctx.display.value(), 57);
    assert!(ctx.display.is_visible());
    let patterns = ctx.hw.segment_writes();
    assert!(patterns.contains(&0x6D), "tens digit 5");
    assert!(patterns.contains(&0x07), "ones digit 7");
    assert!(ctx.hw.count(|c| matches!(c, BoardCall::DigitEnabled { enabled: true, .. })) > 0);
}

#[test]
fn failing_switch_reads_hold_last_state() {
    let mut board = MockBoard::new();
    board.fail_inputs = true;
    let (mut sched, mut ctx) = rig(board);
    ctx.hw.pressed[ButtonId::OnOff.index()] = true;
    run_ticks(&mut sched, &mut ctx, 60);
    ctx.hw.pressed[ButtonId::OnOff.index()] = false;
    run_ticks(&mut sched, &mut ctx, 60);
    assert_eq!(controller(&sched).mode(), HeaterMode::Off);
}

#[test]
fn failing_store_keeps_initial_setpoint() {
    let mut board = MockBoard::new();
    board.fail_store = true;
    let (mut sched, mut ctx) = rig(board);
    run_ticks(&mut sched, &mut ctx, 5);
    click(&mut sched, &mut ctx, ButtonId::OnOff);

    let c = controller(&sched);
    assert_eq!(c.mode(), HeaterMode::Running);
    assert_eq!(c.setpoint(), 60);
    assert!(!ctx
        .sink
        .events
        .iter()
        .any(|e| matches!(e, HeaterEvent::StoreSeeded(_) | HeaterEvent::SetpointLoaded(_))));
}
