//! Shared mutable context threaded through every guard and action.
//!
//! `FsmContext` is the single struct the transition tables read from and
//! write to: the shared level register, both timers, the button snapshot
//! taken before the update, the output commands applied after it, the
//! measurement-enabled flag toggled by the stabilization actions, and the
//! pending flags that make the two stay-rows fire once per entry.  Think
//! of it as the "blackboard" in a blackboard architecture.  Both machines
//! share one context, so switching mode keeps timers and flags intact.

use std::sync::Arc;

use crate::config::SystemConfig;
use crate::level::LevelRegister;
use crate::timer::Timers;

// ---------------------------------------------------------------------------
// Input snapshot (read-only to guards; written by the dispatcher)
// ---------------------------------------------------------------------------

/// Button levels sampled at the start of a cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub emergency_pressed: bool,
    pub stop_pressed: bool,
}

// ---------------------------------------------------------------------------
// Output commands (written by actions; applied by the dispatcher)
// ---------------------------------------------------------------------------

/// Requested output levels.  The dispatcher applies them after `update`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputCommands {
    pub status_led: bool,
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

pub struct FsmContext {
    /// Shared tank level (also used by the boot workers).
    pub level: Arc<LevelRegister>,
    /// Measurement and stabilization countdowns.
    pub timers: Timers,
    /// Latest button snapshot.
    pub inputs: InputSnapshot,
    /// Outputs to apply after the FSM has run.
    pub commands: OutputCommands,
    /// Cleared while stabilizing after an emergency stop.
    pub measurement_enabled: bool,
    /// Set on emergency entry, cleared by the stabilization exit action.
    pub stabilization_pending: bool,
    /// Set by a stop request, cleared once the final reading is taken.
    pub final_reading_pending: bool,
}

impl FsmContext {
    pub fn new(config: &SystemConfig, level: Arc<LevelRegister>) -> Self {
        Self {
            level,
            timers: Timers::from_config(config),
            inputs: InputSnapshot::default(),
            commands: OutputCommands::default(),
            measurement_enabled: true,
            stabilization_pending: false,
            final_reading_pending: false,
        }
    }
}
