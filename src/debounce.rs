//! Tick-driven switch debounce filter.
//!
//! ## Algorithm
//!
//! Sampled once per scheduler tick.  Each switch keeps its previous raw
//! reading and a settle counter:
//!
//! | Raw reading vs previous | Counter      | Stable state            |
//! |-------------------------|--------------|-------------------------|
//! | equal                   | +1           | unchanged               |
//! | different               | reset to 0   | unchanged               |
//! | counter reaches settle  | reset to 0   | overwritten with raw    |
//!
//! With a 5 ms tick and a settle count of 5 a change is accepted after
//! 25 ms of steady input; anything that bounces faster never reaches the
//! consumers, which only see the stable state.

/// Logical switch level after polarity has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchState {
    #[default]
    NotPressed,
    Pressed,
}

impl SwitchState {
    pub fn is_pressed(self) -> bool {
        self == Self::Pressed
    }
}

impl From<bool> for SwitchState {
    fn from(pressed: bool) -> Self {
        if pressed { Self::Pressed } else { Self::NotPressed }
    }
}

/// Debounce state for a single switch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwitchFilter {
    previous_raw: SwitchState,
    settle_count: u8,
    stable: SwitchState,
}

impl SwitchFilter {
    pub const fn new() -> Self {
        Self {
            previous_raw: SwitchState::NotPressed,
            settle_count: 0,
            stable: SwitchState::NotPressed,
        }
    }

    /// Feed one raw sample.  Returns `Some(new_state)` when the stable
    /// state changed on this sample.
    pub fn sample(&mut self, raw: SwitchState, settle: u8) -> Option<SwitchState> {
        if raw == self.previous_raw {
            self.settle_count = self.settle_count.saturating_add(1);
        } else {
            self.settle_count = 0;
        }
        self.previous_raw = raw;

        if self.settle_count == settle {
            self.settle_count = 0;
            let changed = self.stable != raw;
            self.stable = raw;
            if changed {
                return Some(raw);
            }
        }
        None
    }

    /// The raw reading seen on the last sample.
    pub fn previous_raw(&self) -> SwitchState {
        self.previous_raw
    }

    pub fn stable(&self) -> SwitchState {
        self.stable
    }

    pub fn settle_count(&self) -> u8 {
        self.settle_count
    }
}

/// The settled state of every monitored switch, indexed by switch id.
///
/// Written only by the debounce task; everything else reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchBank<const N: usize> {
    states: [SwitchState; N],
}

impl<const N: usize> Default for SwitchBank<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SwitchBank<N> {
    pub const fn new() -> Self {
        Self {
            states: [SwitchState::NotPressed; N],
        }
    }

    pub fn get(&self, idx: usize) -> SwitchState {
        self.states.get(idx).copied().unwrap_or_default()
    }

    pub fn set(&mut self, idx: usize, state: SwitchState) {
        if let Some(slot) = self.states.get_mut(idx) {
            *slot = state;
        }
    }

    pub fn states(&self) -> [SwitchState; N] {
        self.states
    }
}
