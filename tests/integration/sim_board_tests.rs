//! The production task table against the simulated board and its
//! thermal plant.

use waterheater::adapters::sim::{ScriptedPress, SimBoard, ThermalPlant};
use waterheater::app::context::HeaterContext;
use waterheater::app::controller::HeaterMode;
use waterheater::app::ports::{ButtonId, OutputId};
use waterheater::config::HeaterConfig;

use super::mock_hw::RecordingSink;
use super::{Sched, controller, scheduler};

const HOLD: u64 = 20;

fn sim(script: Vec<ScriptedPress>) -> (Sched, HeaterContext<SimBoard, RecordingSink>) {
    let config = HeaterConfig::default();
    let board = SimBoard::new(ThermalPlant::default(), config.sensor_factor).with_script(script);
    (scheduler(&config), HeaterContext::new(board, RecordingSink::default()))
}

/// Dispatch then let the plant react, `n` times.
fn step(sched: &mut Sched, ctx: &mut HeaterContext<SimBoard, RecordingSink>, n: u64) {
    for _ in 0..n {
        sched.dispatch(ctx);
        ctx.hw.advance_tick();
    }
}

#[test]
fn erased_store_is_seeded_on_first_boot() {
    let (mut sched, mut ctx) = sim(Vec::new());
    step(&mut sched, &mut ctx, 5);
    assert_eq!(ctx.hw.stored_byte(0), Some(60));
}

#[test]
fn running_display_drives_segment_lines() {
    let (mut sched, mut ctx) = sim(vec![ScriptedPress::new(10, ButtonId::OnOff, HOLD)]);
    // First sample in Running lands on tick 41; water is still at 25.
    step(&mut sched, &mut ctx, 60);
    assert!(ctx.display.is_visible());
    assert_eq!(ctx.display.value(), 25);

    let mut lit = Vec::new();
    for _ in 0..2 {
        step(&mut sched, &mut ctx, 5);
        let digit = if ctx.hw.digit_enabled(0) { 0 } else { 1 };
        assert!(ctx.hw.digit_enabled(digit) && !ctx.hw.digit_enabled(1 - digit));
        lit.push((digit, ctx.hw.segments()));
    }
    lit.sort_unstable();
    assert_eq!(lit, vec![(0, 0x5B), (1, 0x6D)]);
}

#[test]
fn water_settles_near_setpoint() {
    let (mut sched, mut ctx) = sim(vec![ScriptedPress::new(10, ButtonId::OnOff, HOLD)]);
    step(&mut sched, &mut ctx, 200);
    assert_eq!(controller(&sched).mode(), HeaterMode::Running);
    assert!(ctx.hw.output(OutputId::HeatingElement));

    step(&mut sched, &mut ctx, 6000);
    let water = ctx.hw.temperature();
    assert!((50.0..70.0).contains(&water), "water at {water}");
    assert!(!ctx.hw.output(OutputId::CoolingElement));
}

#[test]
fn adjusted_setpoint_survives_power_cycle() {
    let (mut sched, mut ctx) = sim(vec![
        ScriptedPress::new(10, ButtonId::OnOff, HOLD),
        ScriptedPress::new(200, ButtonId::Up, HOLD),
        ScriptedPress::new(260, ButtonId::Up, HOLD),
        ScriptedPress::new(400, ButtonId::OnOff, HOLD),
        ScriptedPress::new(600, ButtonId::OnOff, HOLD),
    ]);

    step(&mut sched, &mut ctx, 500);
    assert_eq!(controller(&sched).mode(), HeaterMode::Off);
    assert_eq!(ctx.hw.stored_byte(0), Some(65));
    assert!(!ctx.hw.output(OutputId::HeatingElement));
    assert!(!ctx.hw.digit_enabled(0) && !ctx.hw.digit_enabled(1));

    step(&mut sched, &mut ctx, 200);
    assert_eq!(controller(&sched).mode(), HeaterMode::Running);
    assert_eq!(controller(&sched).setpoint(), 65);
}
