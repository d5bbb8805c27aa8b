//! Guards and actions shared by both transition tables.
//!
//! Plain `fn` items so they can sit in `static` tables.  Level guards
//! treat a lock fault as "condition not met"; level actions log it and
//! skip.  The register has already logged and counted the fault.

use log::{info, warn};

use super::context::FsmContext;
use crate::error::LockError;
use crate::level::SampleKind;

fn guard_result(name: &str, result: Result<bool, LockError>) -> bool {
    match result {
        Ok(held) => held,
        Err(e) => {
            warn!("guard '{name}' skipped: {e}");
            false
        }
    }
}

fn action_result<T>(name: &str, result: Result<T, LockError>) {
    if let Err(e) = result {
        warn!("action '{name}' skipped: {e}");
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Guards
// ═══════════════════════════════════════════════════════════════════════════

pub fn always(_ctx: &mut FsmContext) -> bool {
    true
}

pub fn measurement_enabled(ctx: &mut FsmContext) -> bool {
    ctx.measurement_enabled
}

pub fn measure_timer_expired(ctx: &mut FsmContext) -> bool {
    ctx.timers.measure.is_expired()
}

/// Stabilization timer expired and the exit action has not run yet.
pub fn stabilization_exit_due(ctx: &mut FsmContext) -> bool {
    ctx.stabilization_pending && ctx.timers.stabilization.is_expired()
}

/// A stop was requested and the measure timer has run out.
pub fn final_reading_due(ctx: &mut FsmContext) -> bool {
    ctx.final_reading_pending && ctx.timers.measure.is_expired()
}

pub fn emergency_pressed(ctx: &mut FsmContext) -> bool {
    if ctx.inputs.emergency_pressed {
        info!("emergency button pressed");
    }
    ctx.inputs.emergency_pressed
}

pub fn stop_pressed(ctx: &mut FsmContext) -> bool {
    if ctx.inputs.stop_pressed {
        info!("stop-measurement button pressed");
    }
    ctx.inputs.stop_pressed
}

pub fn tank_empty(ctx: &mut FsmContext) -> bool {
    guard_result("tank_empty", ctx.level.is_empty())
}

pub fn tank_full(ctx: &mut FsmContext) -> bool {
    guard_result("tank_full", ctx.level.is_full())
}

pub fn level_between_bounds(ctx: &mut FsmContext) -> bool {
    guard_result("level_between_bounds", ctx.level.is_between_bounds())
}

// ═══════════════════════════════════════════════════════════════════════════
//  Actions
// ═══════════════════════════════════════════════════════════════════════════

pub fn start_measure_timer(ctx: &mut FsmContext) {
    ctx.timers.measure.start();
}

pub fn point_measurement(ctx: &mut FsmContext) {
    action_result("point_measurement", ctx.level.sample(SampleKind::Point));
}

pub fn continuous_measurement(ctx: &mut FsmContext) {
    action_result(
        "continuous_measurement",
        ctx.level.sample(SampleKind::Continuous),
    );
}

/// Stop request: one more reading once the running measure period ends.
pub fn stop_measurement(ctx: &mut FsmContext) {
    ctx.final_reading_pending = true;
    info!("measurement stopped, final reading pending");
}

/// Last measurement after a stop request.
pub fn final_measurement(ctx: &mut FsmContext) {
    ctx.final_reading_pending = false;
    info!("taking final reading");
    point_measurement(ctx);
}

pub fn drain_tank(ctx: &mut FsmContext) {
    action_result("drain_tank", ctx.level.drain());
}

pub fn fill_tank(ctx: &mut FsmContext) {
    action_result("fill_tank", ctx.level.fill());
}

/// Emergency entry: stop measuring, light the LED, start the cool-down.
pub fn stabilization_on(ctx: &mut FsmContext) {
    ctx.measurement_enabled = false;
    ctx.commands.status_led = true;
    ctx.stabilization_pending = true;
    ctx.timers.stabilization.start();
    warn!("emergency stop: stabilizing");
}

/// Emergency exit: LED off, measuring re-enabled.
pub fn stabilization_off(ctx: &mut FsmContext) {
    ctx.commands.status_led = false;
    ctx.measurement_enabled = true;
    ctx.stabilization_pending = false;
    info!("stabilization finished");
}
