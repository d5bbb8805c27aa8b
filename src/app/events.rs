//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, test recorder, ...).

use crate::app::commands::Mode;
use crate::fsm::StateId;

/// Which of the two machines an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Machine {
    SingleShot,
    Continuous,
}

impl Machine {
    pub fn for_mode(mode: Mode) -> Self {
        if mode.uses_continuous_table() {
            Self::Continuous
        } else {
            Self::SingleShot
        }
    }
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The dispatcher has started; both machines are in their initial state.
    Started,

    /// The operator selected a different mode.
    ModeChanged { from: Option<Mode>, to: Mode },

    /// A machine moved between states.
    StateChanged {
        machine: Machine,
        from: StateId,
        to: StateId,
    },

    /// New level-lock timeouts were observed this cycle.  Carries the
    /// running total.
    LockFault { total: u32 },

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry snapshot suitable for logging.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryData {
    pub cycle: u64,
    pub mode: Option<Mode>,
    pub single_shot_state: StateId,
    pub continuous_state: StateId,
    /// `None` if the level lock could not be taken in time.
    pub level: Option<f32>,
    pub measurement_enabled: bool,
    pub status_led: bool,
    pub measure_ticks_left: u32,
    pub stabilization_ticks_left: u32,
    pub lock_faults: u32,
}
