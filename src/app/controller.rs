//! Temperature-control state machine.
//!
//! ```text
//!            on/off                 up / down
//!   OFF ─────────────▶ RUNNING ─────────────────▶ SETTING
//!    ▲                   │  ▲                        │
//!    │      on/off       │  └──[10 idle half-secs]───┤
//!    └───────────────────┴───────────────────────────┘
//!                        on/off (persist setpoint)
//! ```
//!
//! The controller is invoked by the control task every 25 ms with the
//! settled switch states.  One invocation does, in order:
//!
//! 1. release-edge handling (pressed → not-pressed since last invocation),
//! 2. on the sample cadence: one temperature sample, then hysteresis,
//! 3. on the half-second cadence: settings timeout, then blink.
//!
//! All I/O goes through port traits; failures are logged and the
//! invocation carries on with the last known values.

use heapless::HistoryBuffer;
use log::{debug, info, warn};

use crate::config::HeaterConfig;
use crate::debounce::SwitchState;
use crate::error::report;

use super::events::HeaterEvent;
use super::ports::{AnalogPort, ButtonId, ByteStore, DisplayPort, EventSink, OutputId, OutputPort};

/// Number of samples averaged by the hysteresis step.
pub const WINDOW_LEN: usize = 10;

// ---------------------------------------------------------------------------
// Mode / element identity
// ---------------------------------------------------------------------------

/// Operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HeaterMode {
    Off = 0,
    SettingSetpoint = 1,
    Running = 2,
}

impl HeaterMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::SettingSetpoint => "SettingSetpoint",
            Self::Running => "Running",
        }
    }
}

/// The actuator hysteresis last selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunningElement {
    Heating,
    Cooling,
    None,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Control task state.  Everything the task remembers between
/// invocations lives here.
pub struct HeaterController {
    config: HeaterConfig,
    mode: HeaterMode,
    setpoint: u8,
    window: HistoryBuffer<u16, WINDOW_LEN>,
    last_sample: u16,
    running_element: RunningElement,
    /// Half-second advances spent in SettingSetpoint without a press.
    settings_timeout: u8,
    sample_phase: u16,
    half_second_phase: u16,
    invocations: u64,
    previous: [SwitchState; ButtonId::COUNT],
    indicator_phase: bool,
    display_phase: bool,
}

impl HeaterController {
    /// A controller in `Off` holding the configured initial setpoint.
    pub fn new(config: HeaterConfig) -> Self {
        let setpoint = config.initial_setpoint;
        Self {
            config,
            mode: HeaterMode::Off,
            setpoint,
            window: HistoryBuffer::new(),
            last_sample: 0,
            running_element: RunningElement::None,
            settings_timeout: 0,
            sample_phase: 0,
            half_second_phase: 0,
            invocations: 0,
            previous: [SwitchState::NotPressed; ButtonId::COUNT],
            indicator_phase: false,
            display_phase: false,
        }
    }

    // ── Per-invocation orchestration ──────────────────────────

    /// Run one control invocation.
    pub fn run<IO, D, S>(
        &mut self,
        buttons: [SwitchState; ButtonId::COUNT],
        io: &mut IO,
        display: &mut D,
        sink: &mut S,
    ) where
        IO: AnalogPort + OutputPort + ByteStore,
        D: DisplayPort,
        S: EventSink,
    {
        self.invocations += 1;

        self.check_switches(buttons, io, display, sink);

        if self.sample_phase == 0 {
            self.add_sample(io, display);
            self.take_action(io, sink);
        }
        self.sample_phase = (self.sample_phase + 1) % self.config.sample_every;

        self.half_second_phase += 1;
        if self.half_second_phase >= self.config.half_second_every {
            self.half_second_phase = 0;
            self.advance_settings_timeout(sink);
            self.blink(io, display);
        }
    }

    fn check_switches<IO, D, S>(
        &mut self,
        buttons: [SwitchState; ButtonId::COUNT],
        io: &mut IO,
        display: &mut D,
        sink: &mut S,
    ) where
        IO: OutputPort + ByteStore,
        D: DisplayPort,
        S: EventSink,
    {
        let previous = self.previous;
        self.previous = buttons;

        for id in ButtonId::ALL {
            let idx = id.index();
            if previous[idx].is_pressed() && !buttons[idx].is_pressed() {
                self.on_release(id, io, display, sink);
            }
        }
    }

    // ── Release edges ─────────────────────────────────────────

    /// Act on a button release.
    pub fn on_release<IO, D, S>(
        &mut self,
        button: ButtonId,
        io: &mut IO,
        display: &mut D,
        sink: &mut S,
    ) where
        IO: OutputPort + ByteStore,
        D: DisplayPort,
        S: EventSink,
    {
        debug!("Controller: {:?} released in {}", button, self.mode.name());
        match button {
            ButtonId::OnOff => self.toggle_power(io, display, sink),
            ButtonId::Up => self.adjust(self.config.setpoint_step as i16, display, sink),
            ButtonId::Down => self.adjust(-(self.config.setpoint_step as i16), display, sink),
        }
    }

    fn toggle_power<IO, D, S>(&mut self, io: &mut IO, display: &mut D, sink: &mut S)
    where
        IO: OutputPort + ByteStore,
        D: DisplayPort,
        S: EventSink,
    {
        if self.mode == HeaterMode::Off {
            self.load_setpoint(io, sink);
            self.set_mode(HeaterMode::Running, sink);
            return;
        }

        self.set_mode(HeaterMode::Off, sink);
        report(io.set_output(OutputId::HeatingElement, false), "heating element off");
        report(io.set_output(OutputId::CoolingElement, false), "cooling element off");
        report(io.set_output(OutputId::StatusLed, false), "status LED off");
        report(display.set_visible(false), "display off");
        self.set_running_element(RunningElement::None, sink);

        match io.write_byte(self.config.setpoint_address, self.setpoint) {
            Ok(()) => sink.emit(&HeaterEvent::SetpointSaved(self.setpoint)),
            Err(e) => warn!("Controller: setpoint save failed: {e}"),
        }
    }

    fn load_setpoint(&mut self, io: &mut impl ByteStore, sink: &mut impl EventSink) {
        match io.read_byte(self.config.setpoint_address) {
            Ok(value) if self.config.is_valid_setpoint(value) => {
                self.setpoint = value;
                sink.emit(&HeaterEvent::SetpointLoaded(value));
            }
            Ok(value) => {
                warn!(
                    "Controller: stored setpoint {} invalid, using {}",
                    value, self.config.initial_setpoint
                );
                self.setpoint = self.config.initial_setpoint;
            }
            Err(e) => warn!("Controller: setpoint load failed: {e}, keeping {}", self.setpoint),
        }
    }

    fn adjust(&mut self, delta: i16, display: &mut impl DisplayPort, sink: &mut impl EventSink) {
        match self.mode {
            HeaterMode::Off => return,
            HeaterMode::Running => {
                self.set_mode(HeaterMode::SettingSetpoint, sink);
            }
            HeaterMode::SettingSetpoint => {
                let min = i16::from(self.config.setpoint_min);
                let max = i16::from(self.config.setpoint_max);
                let next = (i16::from(self.setpoint) + delta).clamp(min, max) as u8;
                if next != self.setpoint {
                    self.setpoint = next;
                    sink.emit(&HeaterEvent::SetpointChanged(next));
                }
            }
        }
        self.settings_timeout = 0;
        self.show_value(self.setpoint.into(), display);
    }

    // ── Sampling & hysteresis ─────────────────────────────────

    /// Take one sample into the window.  In Running the live value is
    /// shown and the display forced on.
    pub fn add_sample(&mut self, io: &mut impl AnalogPort, display: &mut impl DisplayPort) {
        let sample = match io.read_sample() {
            Ok(raw) => raw / self.config.sensor_factor,
            Err(e) => {
                warn!("Controller: sample failed: {e}, reusing {}", self.last_sample);
                self.last_sample
            }
        };
        self.last_sample = sample;
        self.window.write(sample);

        if self.mode == HeaterMode::Running {
            self.show_value(sample, display);
            report(display.set_visible(true), "display on");
        }
    }

    /// Mean of the window.  Slots not yet written count as zero.
    pub fn window_mean(&self) -> f32 {
        let total: u32 = self.window.as_slice().iter().map(|&s| u32::from(s)).sum();
        total as f32 / WINDOW_LEN as f32
    }

    /// Hysteresis step.  Does nothing in Off.
    pub fn take_action(&mut self, io: &mut impl OutputPort, sink: &mut impl EventSink) {
        if self.mode == HeaterMode::Off {
            return;
        }

        let diff = self.window_mean() - f32::from(self.setpoint);
        let band = f32::from(self.config.dead_band);

        if diff > band {
            report(io.set_output(OutputId::CoolingElement, true), "cooling element on");
            report(io.set_output(OutputId::HeatingElement, false), "heating element off");
            report(io.set_output(OutputId::StatusLed, true), "status LED on");
            self.set_running_element(RunningElement::Cooling, sink);
        } else if -diff > band {
            report(io.set_output(OutputId::HeatingElement, true), "heating element on");
            report(io.set_output(OutputId::CoolingElement, false), "cooling element off");
            self.set_running_element(RunningElement::Heating, sink);
        } else if self.config.dead_band_shutoff {
            report(io.set_output(OutputId::HeatingElement, false), "heating element off");
            report(io.set_output(OutputId::CoolingElement, false), "cooling element off");
            report(io.set_output(OutputId::StatusLed, false), "status LED off");
            self.set_running_element(RunningElement::None, sink);
        }
    }

    // ── Half-second work ──────────────────────────────────────

    /// Count one idle half second in SettingSetpoint; fall back to
    /// Running once the timeout is reached.
    pub fn advance_settings_timeout(&mut self, sink: &mut impl EventSink) {
        if self.mode != HeaterMode::SettingSetpoint {
            return;
        }
        self.settings_timeout += 1;
        if self.settings_timeout >= self.config.settings_timeout_half_secs {
            self.settings_timeout = 0;
            self.set_mode(HeaterMode::Running, sink);
        }
    }

    /// Toggle the indicator while heating and the display while setting.
    pub fn blink(&mut self, io: &mut impl OutputPort, display: &mut impl DisplayPort) {
        if self.mode != HeaterMode::Off && self.running_element == RunningElement::Heating {
            report(io.set_output(OutputId::StatusLed, self.indicator_phase), "status LED blink");
            self.indicator_phase = !self.indicator_phase;
        }
        if self.mode == HeaterMode::SettingSetpoint {
            report(display.set_visible(self.display_phase), "display blink");
            self.display_phase = !self.display_phase;
        }
    }

    // ── Helpers ───────────────────────────────────────────────

    fn show_value(&self, value: u16, display: &mut impl DisplayPort) {
        report(display.set_digit(0, ((value / 10) % 10) as u8), "tens digit");
        report(display.set_digit(1, (value % 10) as u8), "ones digit");
    }

    fn set_mode(&mut self, next: HeaterMode, sink: &mut impl EventSink) {
        if next == self.mode {
            return;
        }
        info!("Controller: {} -> {}", self.mode.name(), next.name());
        sink.emit(&HeaterEvent::ModeChanged {
            from: self.mode,
            to: next,
        });
        self.mode = next;
    }

    fn set_running_element(&mut self, next: RunningElement, sink: &mut impl EventSink) {
        if next == self.running_element {
            return;
        }
        sink.emit(&HeaterEvent::ElementChanged {
            from: self.running_element,
            to: next,
        });
        self.running_element = next;
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn mode(&self) -> HeaterMode {
        self.mode
    }

    pub fn setpoint(&self) -> u8 {
        self.setpoint
    }

    pub fn running_element(&self) -> RunningElement {
        self.running_element
    }

    pub fn settings_timeout(&self) -> u8 {
        self.settings_timeout
    }

    pub fn last_sample(&self) -> u16 {
        self.last_sample
    }

    /// Invocations since startup.
    pub fn invocations(&self) -> u64 {
        self.invocations
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
