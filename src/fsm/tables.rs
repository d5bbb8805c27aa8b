//! The two control policies as static transition tables.
//!
//! Within each state group the emergency row comes first, so a pressed
//! emergency button preempts every other pending guard (including the
//! side-effecting level checks).
//!
//! ```text
//!  single-shot
//!  IDLE ─[enabled]/start─▶ WAITING ─[measure expired]/point─▶ EVALUATE
//!                                                  │  [between]  ↺
//!                              [full]/drain ◀──────┴──────▶ [empty]/fill
//!                                   ▼                           ▼
//!                               DRAINING ↺ [empty]        FILLING ↺ [full]
//!
//!  WAITING | EVALUATE | DRAINING | FILLING ─[emergency]/stab on─▶ STABILIZING
//!  STABILIZING ─[stab exit due]/stab off─▶ ↺
//!
//!  continuous
//!  IDLE ─[enabled]/start─▶ MEASURING ─[measure expired]/sample─▶ RETRIGGER
//!                           ▲  │  │  │                                │
//!                           │  │  │  └──────────[always]/start─────────┘
//!                           │  │  └─[stop]/stop─▶ STOPPED ─[final due]/final─▶ ↺
//!             [full]/drain ─┘  └─ [empty]/fill
//!  DRAINING ─[empty]─▶ IDLE        FILLING ─[full]─▶ IDLE
//!
//!  MEASURING | DRAINING | FILLING ─[emergency]/stab on─▶ STABILIZING
//! ```

use super::callbacks::{
    always, continuous_measurement, drain_tank, emergency_pressed, fill_tank, final_measurement,
    final_reading_due, level_between_bounds, measure_timer_expired, measurement_enabled,
    point_measurement, stabilization_exit_due, stabilization_off, stabilization_on,
    start_measure_timer, stop_measurement, stop_pressed, tank_empty, tank_full,
};
use super::context::FsmContext;
use super::{Destination, Fsm, StateId, Transition};

use Destination::{Stay, To};

type Row = Transition<FsmContext>;

// ═══════════════════════════════════════════════════════════════════════════
//  Single-shot (point measurement)
// ═══════════════════════════════════════════════════════════════════════════

pub mod single_shot {
    use super::*;

    pub const IDLE: StateId = StateId(0);
    pub const WAITING: StateId = StateId(1);
    pub const EVALUATE: StateId = StateId(2);
    pub const DRAINING: StateId = StateId(3);
    pub const FILLING: StateId = StateId(4);
    pub const STABILIZING: StateId = StateId(5);

    pub static STATE_NAMES: [&str; 6] = [
        "Idle",
        "Waiting",
        "Evaluate",
        "Draining",
        "Filling",
        "Stabilizing",
    ];

    pub static TABLE: [Row; 12] = [
        Row::new(IDLE, measurement_enabled, To(WAITING), Some(start_measure_timer)),
        //
        Row::new(WAITING, emergency_pressed, To(STABILIZING), Some(stabilization_on)),
        Row::new(WAITING, measure_timer_expired, To(EVALUATE), Some(point_measurement)),
        //
        Row::new(EVALUATE, emergency_pressed, To(STABILIZING), Some(stabilization_on)),
        Row::new(EVALUATE, level_between_bounds, Stay, None),
        Row::new(EVALUATE, tank_full, To(DRAINING), Some(drain_tank)),
        Row::new(EVALUATE, tank_empty, To(FILLING), Some(fill_tank)),
        //
        Row::new(DRAINING, emergency_pressed, To(STABILIZING), Some(stabilization_on)),
        Row::new(DRAINING, tank_empty, Stay, None),
        //
        Row::new(FILLING, emergency_pressed, To(STABILIZING), Some(stabilization_on)),
        Row::new(FILLING, tank_full, Stay, None),
        //
        Row::new(STABILIZING, stabilization_exit_due, Stay, Some(stabilization_off)),
    ];

    pub fn machine() -> Fsm<FsmContext> {
        Fsm::new("single-shot", &TABLE).with_state_names(&STATE_NAMES)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Continuous measurement
// ═══════════════════════════════════════════════════════════════════════════

pub mod continuous {
    use super::*;

    pub const IDLE: StateId = StateId(0);
    pub const MEASURING: StateId = StateId(1);
    pub const DRAINING: StateId = StateId(2);
    pub const FILLING: StateId = StateId(3);
    pub const STABILIZING: StateId = StateId(5);
    pub const STOPPED: StateId = StateId(6);
    pub const RETRIGGER: StateId = StateId(7);

    pub static STATE_NAMES: [&str; 8] = [
        "Idle",
        "Measuring",
        "Draining",
        "Filling",
        "-",
        "Stabilizing",
        "Stopped",
        "Retrigger",
    ];

    pub static TABLE: [Row; 13] = [
        Row::new(IDLE, measurement_enabled, To(MEASURING), Some(start_measure_timer)),
        //
        Row::new(MEASURING, emergency_pressed, To(STABILIZING), Some(stabilization_on)),
        Row::new(MEASURING, measure_timer_expired, To(RETRIGGER), Some(continuous_measurement)),
        Row::new(MEASURING, tank_full, To(DRAINING), Some(drain_tank)),
        Row::new(MEASURING, tank_empty, To(FILLING), Some(fill_tank)),
        Row::new(MEASURING, stop_pressed, To(STOPPED), Some(stop_measurement)),
        //
        Row::new(RETRIGGER, always, To(MEASURING), Some(start_measure_timer)),
        //
        Row::new(DRAINING, emergency_pressed, To(STABILIZING), Some(stabilization_on)),
        Row::new(DRAINING, tank_empty, To(IDLE), None),
        //
        Row::new(FILLING, emergency_pressed, To(STABILIZING), Some(stabilization_on)),
        Row::new(FILLING, tank_full, To(IDLE), None),
        //
        Row::new(STABILIZING, stabilization_exit_due, Stay, Some(stabilization_off)),
        //
        Row::new(STOPPED, final_reading_due, Stay, Some(final_measurement)),
    ];

    pub fn machine() -> Fsm<FsmContext> {
        Fsm::new("continuous", &TABLE).with_state_names(&STATE_NAMES)
    }
}
