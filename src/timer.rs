//! Cycle-counted countdown timers.
//!
//! Timers count dispatcher cycles, not wall time: a start action loads the
//! configured number of ticks and the dispatcher decrements every timer
//! once per cycle after the FSM has run.  A timer never reloads itself.

use log::debug;

use crate::config::SystemConfig;

/// A single countdown.
///
/// Expired whenever `remaining` is zero, including before the first
/// start.  Rows that must fire only once per expiry track that in the
/// FSM context, not here.
#[derive(Debug, Clone)]
pub struct Countdown {
    name: &'static str,
    duration: u32,
    remaining: u32,
}

impl Countdown {
    pub fn new(name: &'static str, duration_ticks: u32) -> Self {
        Self {
            name,
            duration: duration_ticks,
            remaining: 0,
        }
    }

    /// Load the configured duration.
    pub fn start(&mut self) {
        self.remaining = self.duration;
        debug!("timer '{}' started ({} ticks)", self.name, self.duration);
    }

    /// Advance by one dispatcher cycle.  Saturates at zero.
    pub fn tick(&mut self) {
        if self.remaining > 0 {
            self.remaining -= 1;
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }
}

/// The two timers driven by the dispatcher.
#[derive(Debug, Clone)]
pub struct Timers {
    /// Settle time before a measurement is taken.
    pub measure: Countdown,
    /// Cool-down after an emergency stop.
    pub stabilization: Countdown,
}

impl Timers {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            measure: Countdown::new("measure", config.measure_ticks()),
            stabilization: Countdown::new("stabilization", config.stabilization_ticks()),
        }
    }

    /// Decrement both timers.  Called once per cycle, after the FSM.
    pub fn advance(&mut self) {
        self.measure.tick();
        self.stabilization.tick();
        debug!(
            "timers: measure={} stabilization={}",
            self.measure.remaining(),
            self.stabilization.remaining()
        );
    }
}
