//! Water Heater Firmware — Main Entry Point
//!
//! Hexagonal architecture driven by a cooperative tick scheduler.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter (device)   SimBoard (host)   LogEventSink     │
//! │  pins · ADC · I²C EEPROM    thermal model     (EventSink)      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │  Task table: Init · Debounce · Control · Display       │    │
//! │  │  HeaterController (pure logic)                         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler ◀── TickFlag ◀── TickTimer (esp_timer / thread)     │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::info;

use waterheater::adapters::log_sink::LogEventSink;
use waterheater::app::context::HeaterContext;
use waterheater::app::tasks::{HeaterTask, TASK_COUNT, build_task_table};
use waterheater::config::HeaterConfig;
use waterheater::drivers::tick_timer::TickTimer;
use waterheater::scheduler::Scheduler;
use waterheater::tick;

/// Environment variable naming a JSON configuration file.
const CONFIG_ENV: &str = "WATERHEATER_CONFIG";

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Logger ─────────────────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(target_os = "espidf"))]
    waterheater::adapters::console_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  WaterHeater v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config()?;
    info!(
        "Config: tick={}ms setpoint={}..{} step {} dead-band {}{}",
        config.tick_ms,
        config.setpoint_min,
        config.setpoint_max,
        config.setpoint_step,
        config.dead_band,
        if config.dead_band_shutoff { " (shutoff)" } else { "" }
    );

    run(config)
}

/// Defaults, or the JSON file named by `WATERHEATER_CONFIG`.
fn load_config() -> Result<HeaterConfig> {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        info!("Config: defaults");
        return Ok(HeaterConfig::default());
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config = HeaterConfig::from_json(&text).map_err(|e| {
        log::error!("Config: {path}: {e}");
        e
    })?;
    info!("Config: loaded {}", path);
    Ok(config)
}

fn scheduler(config: &HeaterConfig) -> Scheduler<HeaterTask, TASK_COUNT> {
    Scheduler::new(build_task_table(config), config.tick_ms, &tick::TICK_FLAG)
}

// ── Device ────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn run(config: HeaterConfig) -> Result<()> {
    use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, Input, Output, PinDriver, Pull};
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::peripherals::Peripherals;
    use esp_idf_hal::units::Hertz;

    use waterheater::adapters::eeprom::I2cEeprom;
    use waterheater::adapters::hardware::{HardwareAdapter, Line, SegmentLines};
    use waterheater::drivers::adc::OneshotAdc;
    use waterheater::pins;

    type InPin = PinDriver<'static, AnyIOPin, Input>;
    type OutPin = PinDriver<'static, AnyOutputPin, Output>;

    fn input(gpio: i32) -> Result<InPin> {
        // SAFETY: each GPIO number in `pins` is claimed exactly once.
        let mut pin = PinDriver::input(unsafe { AnyIOPin::new(gpio) })?;
        pin.set_pull(Pull::Up)?;
        Ok(pin)
    }

    fn output(gpio: i32) -> Result<OutPin> {
        // SAFETY: as above.
        Ok(PinDriver::output(unsafe { AnyOutputPin::new(gpio) })?)
    }

    fn outputs<const N: usize>(gpios: [i32; N]) -> Result<[OutPin; N]> {
        let pins = gpios.iter().map(|&g| output(g)).collect::<Result<Vec<_>>>()?;
        pins.try_into()
            .map_err(|_| anyhow::anyhow!("pin table length mismatch"))
    }

    let peripherals = Peripherals::take()?;

    let buttons = [
        Line::active_low(input(pins::BUTTON_ON_OFF_GPIO)?),
        Line::active_low(input(pins::BUTTON_DOWN_GPIO)?),
        Line::active_low(input(pins::BUTTON_UP_GPIO)?),
    ];
    let elements = [
        Line::active_high(output(pins::HEATING_ELEMENT_GPIO)?),
        Line::active_high(output(pins::COOLING_ELEMENT_GPIO)?),
        Line::active_high(output(pins::STATUS_LED_GPIO)?),
    ];
    let display = SegmentLines {
        segments: outputs(pins::SEGMENT_GPIOS)?,
        commons: outputs(pins::DIGIT_COMMON_GPIOS)?.map(Line::active_high),
    };

    let i2c = I2cDriver::new(
        peripherals.i2c0,
        // SAFETY: as above.
        unsafe { AnyIOPin::new(pins::I2C_SDA_GPIO) },
        unsafe { AnyIOPin::new(pins::I2C_SCL_GPIO) },
        &I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ)),
    )?;
    let eeprom =
        I2cEeprom::new(i2c, pins::EEPROM_CAPACITY).with_address(pins::EEPROM_I2C_ADDRESS);
    let adc = OneshotAdc::new(pins::TEMP_ADC_CHANNEL)
        .map_err(|e| anyhow::anyhow!("temperature ADC: {e}"))?;

    let hw = HardwareAdapter::new(buttons, elements, display, adc, eeprom);
    let mut ctx = HeaterContext::new(hw, LogEventSink::new());

    let mut sched = scheduler(&config);
    let mut timer = TickTimer::new(config.tick_ms);
    sched.attach(&mut timer, tick::on_tick);
    sched.start(&mut timer, &mut ctx)
}

// ── Host simulation ───────────────────────────────────────────

/// Environment variable bounding a host run (seconds of simulated time).
#[cfg(not(target_os = "espidf"))]
const SIM_SECONDS_ENV: &str = "WATERHEATER_SIM_SECONDS";

#[cfg(not(target_os = "espidf"))]
fn run(config: HeaterConfig) -> Result<()> {
    use waterheater::adapters::sim::{ScriptedPress, SimBoard, ThermalPlant};
    use waterheater::app::ports::{ButtonId, OutputId};
    use waterheater::error::report;
    use waterheater::tick::{Prescaler, TickSource};

    let seconds: u64 = std::env::var(SIM_SECONDS_ENV)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(30);
    let ticks_per_sec = u64::from(1000 / config.tick_ms);
    let total_ticks = seconds * ticks_per_sec;

    // Power on, bump the setpoint once, power off near the end.
    let hold = 20;
    let script = vec![
        ScriptedPress::new(ticks_per_sec, ButtonId::OnOff, hold),
        ScriptedPress::new(total_ticks / 2, ButtonId::Up, hold),
        ScriptedPress::new(total_ticks / 2 + 3 * hold, ButtonId::Up, hold),
        ScriptedPress::new(total_ticks.saturating_sub(ticks_per_sec), ButtonId::OnOff, hold),
    ];
    let board = SimBoard::new(ThermalPlant::default(), config.sensor_factor).with_script(script);
    let mut ctx = HeaterContext::new(board, LogEventSink::new());

    let mut sched = scheduler(&config);
    let mut timer = TickTimer::new(config.tick_ms);
    sched.attach(&mut timer, tick::on_tick);
    report(timer.start(Prescaler::Div1), "tick timer start");
    info!("Sim: running {}s ({} ticks)", seconds, total_ticks);

    let mut last_report = 0;
    while ctx.hw.tick() < total_ticks {
        if !sched.poll(&mut ctx) {
            std::thread::yield_now();
            continue;
        }
        ctx.hw.advance_tick();
        if ctx.hw.tick() - last_report >= 2 * ticks_per_sec {
            last_report = ctx.hw.tick();
            info!(
                "Sim: t={}s water={:.1}\u{00b0}C display={:02} heat={} cool={}",
                ctx.hw.tick() / ticks_per_sec,
                ctx.hw.temperature(),
                ctx.display.value(),
                ctx.hw.output(OutputId::HeatingElement),
                ctx.hw.output(OutputId::CoolingElement),
            );
        }
    }

    report(timer.stop(), "tick timer stop");
    info!(
        "Sim: done after {} ticks, {} events, stored setpoint {:?}",
        sched.tick_count(),
        ctx.sink.emitted(),
        ctx.hw.stored_byte(config.setpoint_address)
    );
    Ok(())
}
