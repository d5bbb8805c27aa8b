//! Application service: the mode dispatcher.
//!
//! [`AppService`] owns both transition-table machines and the shared
//! context.  Each cycle it samples the buttons, runs the machine picked
//! by the operator's mode exactly once, applies the outputs, and then
//! advances both timers.  All I/O flows through port traits injected at
//! call sites, making the whole dispatcher testable with mock adapters.
//!
//! ```text
//!   ModeSource ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!    InputPort ──▶ │          AppService          │
//!   OutputPort ◀── │ single-shot · continuous FSM │
//!                  └──────────────┬───────────────┘
//!                                 ▼
//!                         Arc<LevelRegister>
//! ```

use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::error::Result;
use crate::fsm::context::FsmContext;
use crate::fsm::tables::{continuous, single_shot};
use crate::fsm::{Fsm, StateId};
use crate::level::LevelRegister;

use super::commands::Mode;
use super::events::{AppEvent, Machine, TelemetryData};
use super::ports::{EventSink, InputPort, ModeSource, OutputPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    single_shot: Fsm<FsmContext>,
    continuous: Fsm<FsmContext>,
    ctx: FsmContext,
    config: SystemConfig,
    cycle: u64,
    last_mode: Option<Mode>,
    /// Register fault count already reported through `LockFault`.
    lock_faults_seen: u32,
}

impl AppService {
    /// Build the dispatcher around a shared level register.
    ///
    /// Rejects an invalid configuration.
    pub fn new(config: SystemConfig, level: Arc<LevelRegister>) -> Result<Self> {
        config.validate()?;
        let ctx = FsmContext::new(&config, level);
        Ok(Self {
            single_shot: single_shot::machine(),
            continuous: continuous::machine(),
            ctx,
            config,
            cycle: 0,
            last_mode: None,
            lock_faults_seen: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        info!(
            "dispatcher started: period {} ms, measure {} ticks, stabilization {} ticks",
            self.config.cycle_period_ms,
            self.config.measure_ticks(),
            self.config.stabilization_ticks()
        );
        sink.emit(&AppEvent::Started);
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one dispatcher cycle for `mode`:
    /// inputs → selected FSM → outputs → timers → events.
    ///
    /// The `hw` parameter satisfies **both** [`InputPort`] and
    /// [`OutputPort`], avoiding a double mutable borrow while keeping the
    /// port boundary explicit.
    pub fn tick(
        &mut self,
        mode: Mode,
        hw: &mut (impl InputPort + OutputPort),
        sink: &mut impl EventSink,
    ) {
        self.cycle += 1;
        self.note_mode(mode, sink);

        // 1. Sample buttons
        self.ctx.inputs = hw.read_inputs();

        // 2. Run the selected machine once
        let machine = Machine::for_mode(mode);
        let fsm = match machine {
            Machine::SingleShot => &mut self.single_shot,
            Machine::Continuous => &mut self.continuous,
        };
        match fsm.update(&mut self.ctx) {
            Some(fired) if fired.changed_state() => {
                sink.emit(&AppEvent::StateChanged {
                    machine,
                    from: fired.from,
                    to: fired.to(),
                });
            }
            _ => {}
        }

        // 3. Apply outputs
        hw.set_status_led(self.ctx.commands.status_led);

        // 4. Advance both timers
        self.ctx.timers.advance();

        // 5. Faults and telemetry
        self.report_lock_faults(sink);
        let every = u64::from(self.config.telemetry_interval_cycles);
        if every != 0 && self.cycle % every == 0 {
            sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
        }
    }

    /// Poll `source` and run a cycle if a mode has been selected.
    ///
    /// Returns `false` (and leaves machines and timers untouched) while
    /// the operator has not chosen a mode yet.
    pub fn run_cycle(
        &mut self,
        source: &mut impl ModeSource,
        hw: &mut (impl InputPort + OutputPort),
        sink: &mut impl EventSink,
    ) -> bool {
        match source.current_mode() {
            Some(mode) => {
                self.tick(mode, hw, sink);
                true
            }
            None => {
                debug!("no mode selected yet");
                false
            }
        }
    }

    fn note_mode(&mut self, mode: Mode, sink: &mut impl EventSink) {
        if self.last_mode != Some(mode) {
            info!("mode: {mode}");
            sink.emit(&AppEvent::ModeChanged {
                from: self.last_mode,
                to: mode,
            });
            self.last_mode = Some(mode);
        }
    }

    fn report_lock_faults(&mut self, sink: &mut impl EventSink) {
        let total = self.ctx.level.lock_faults();
        if total > self.lock_faults_seen {
            warn!(
                "{} new level lock fault(s), {total} total",
                total - self.lock_faults_seen
            );
            self.lock_faults_seen = total;
            sink.emit(&AppEvent::LockFault { total });
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            cycle: self.cycle,
            mode: self.last_mode,
            single_shot_state: self.single_shot.current_state(),
            continuous_state: self.continuous.current_state(),
            level: self.ctx.level.snapshot().ok(),
            measurement_enabled: self.ctx.measurement_enabled,
            status_led: self.ctx.commands.status_led,
            measure_ticks_left: self.ctx.timers.measure.remaining(),
            stabilization_ticks_left: self.ctx.timers.stabilization.remaining(),
            lock_faults: self.ctx.level.lock_faults(),
        }
    }

    pub fn state(&self, machine: Machine) -> StateId {
        match machine {
            Machine::SingleShot => self.single_shot.current_state(),
            Machine::Continuous => self.continuous.current_state(),
        }
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle
    }

    pub fn mode(&self) -> Option<Mode> {
        self.last_mode
    }

    pub fn context(&self) -> &FsmContext {
        &self.ctx
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn level(&self) -> &Arc<LevelRegister> {
        &self.ctx.level
    }
}
