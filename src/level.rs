//! Lock-protected tank level register.
//!
//! ```text
//!   FSM guards/actions ─┐
//!                       ├──▶ Mutex<LevelCell { value, display, sampler }>
//!   boot workers ───────┘
//! ```
//!
//! Every operation takes the lock for its whole duration.  Drain and fill
//! are multi-step loops that refresh the display after every unit step
//! and only release the lock once the register is clamped back into
//! `[min, max]`, so no other caller can ever observe an out-of-range
//! value.  The display and the sampler live under the same lock, which
//! serializes LCD writes with level mutation.
//!
//! ## Lock policy
//!
//! [`LockPolicy::Blocking`] waits without limit.  [`LockPolicy::Timeout`]
//! bounds the wait; a miss is logged at `error!`, counted in
//! [`LevelRegister::lock_faults`] and returned as [`LockError::Timeout`].

use core::fmt::Write as _;
use core::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

use log::{debug, error, info};
use parking_lot::{Mutex, MutexGuard};

use crate::app::ports::DisplaySink;
use crate::config::SystemConfig;
use crate::error::LockError;
use crate::sensors::LevelSampler;

// ---------------------------------------------------------------------------
// Policy and sample kind
// ---------------------------------------------------------------------------

/// How the register's lock is acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockPolicy {
    /// Wait forever.
    Blocking,
    /// Give up after the duration and report a fault.
    Timeout(Duration),
}

impl LockPolicy {
    pub fn from_config(config: &SystemConfig) -> Self {
        match config.lock_timeout_ms {
            Some(ms) => Self::Timeout(Duration::from_millis(u64::from(ms))),
            None => Self::Blocking,
        }
    }
}

/// Which measurement path requested a sample.  Only affects logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    Point,
    Continuous,
}

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

/// State guarded by the lock.
struct LevelCell {
    value: f32,
    display: Box<dyn DisplaySink + Send>,
    sampler: Box<dyn LevelSampler + Send>,
}

impl LevelCell {
    /// Clear, wait for the display, print.
    fn show(&mut self, text: &str, settle: Duration) {
        self.display.clear();
        if !settle.is_zero() {
            thread::sleep(settle);
        }
        self.display.print(text);
    }
}

/// `f32::clamp` that never panics: inverted bounds yield `max`.
fn bound(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// The shared tank level.  Wrap in an `Arc` to share between the
/// dispatcher and the boot workers.
pub struct LevelRegister {
    cell: Mutex<LevelCell>,
    min: f32,
    max: f32,
    nudge: f32,
    step_delay: Duration,
    policy: LockPolicy,
    lock_faults: AtomicU32,
}

impl LevelRegister {
    pub fn new(
        config: &SystemConfig,
        display: impl DisplaySink + Send + 'static,
        sampler: impl LevelSampler + Send + 'static,
    ) -> Self {
        Self {
            cell: Mutex::new(LevelCell {
                value: bound(config.initial_level, config.level_min, config.level_max),
                display: Box::new(display),
                sampler: Box::new(sampler),
            }),
            min: config.level_min,
            max: config.level_max,
            nudge: config.boundary_nudge,
            step_delay: Duration::from_millis(u64::from(config.step_delay_ms)),
            policy: LockPolicy::from_config(config),
            lock_faults: AtomicU32::new(0),
        }
    }

    fn lock(&self, op: &'static str) -> Result<MutexGuard<'_, LevelCell>, LockError> {
        match self.policy {
            LockPolicy::Blocking => Ok(self.cell.lock()),
            LockPolicy::Timeout(limit) => self.cell.try_lock_for(limit).ok_or_else(|| {
                let waited_ms = u32::try_from(limit.as_millis()).unwrap_or(u32::MAX);
                let total = self.lock_faults.fetch_add(1, Ordering::Relaxed) + 1;
                error!("level lock: '{op}' gave up after {waited_ms} ms (fault #{total})");
                LockError::Timeout { waited_ms }
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Empty the tank one unit per step, then clamp at `min`.
    /// Returns the number of steps taken.
    pub fn drain(&self) -> Result<u32, LockError> {
        let mut cell = self.lock("drain")?;
        let mut steps = 0;
        while cell.value > self.min {
            cell.value -= 1.0;
            steps += 1;
            cell.show("Draining tank", self.step_delay);
        }
        if cell.value < self.min {
            cell.value = self.min;
        }
        info!("tank drained in {steps} steps");
        Ok(steps)
    }

    /// Fill the tank one unit per step, then clamp at `max`.
    /// Returns the number of steps taken.
    pub fn fill(&self) -> Result<u32, LockError> {
        let mut cell = self.lock("fill")?;
        let mut steps = 0;
        while cell.value < self.max {
            cell.value += 1.0;
            steps += 1;
            cell.show("Filling tank", self.step_delay);
        }
        if cell.value > self.max {
            cell.value = self.max;
        }
        info!("tank filled in {steps} steps");
        Ok(steps)
    }

    /// Take one reading and fold it into the level.
    ///
    /// A reading of exactly `max` pins the level to `max`; anything else
    /// averages with the previous value (first-order low-pass).
    #[allow(clippy::float_cmp)]
    pub fn sample(&self, kind: SampleKind) -> Result<f32, LockError> {
        let mut cell = self.lock("sample")?;
        let reading = cell.sampler.sample();
        let previous = cell.value;
        cell.value = if reading == self.max {
            self.max
        } else {
            bound((previous + reading) / 2.0, self.min, self.max)
        };

        let mut text: heapless::String<16> = heapless::String::new();
        // In-range levels always fit.
        let written = write!(text, "Level = {}", cell.value as i32);
        debug_assert!(written.is_ok(), "level text overflow");
        let value = cell.value;
        cell.show(&text, self.step_delay);

        debug!("{kind:?} sample: reading={reading:.3} level {previous:.3} -> {value:.3}");
        Ok(value)
    }

    // -----------------------------------------------------------------------
    // Guards
    // -----------------------------------------------------------------------

    /// True when the level sits exactly on `min`.  The value is then
    /// nudged up so the same reading does not re-trigger next cycle.
    #[allow(clippy::float_cmp)]
    pub fn is_empty(&self) -> Result<bool, LockError> {
        let mut cell = self.lock("is_empty")?;
        let empty = cell.value == self.min;
        if empty {
            cell.value += self.nudge;
            cell.show("Tank empty", self.step_delay);
        }
        Ok(empty)
    }

    /// True when the level sits exactly on `max`.  The value is then
    /// nudged down.
    #[allow(clippy::float_cmp)]
    pub fn is_full(&self) -> Result<bool, LockError> {
        let mut cell = self.lock("is_full")?;
        let full = cell.value == self.max;
        if full {
            cell.value -= self.nudge;
            cell.show("Tank full", self.step_delay);
        }
        Ok(full)
    }

    #[allow(clippy::float_cmp)]
    pub fn is_between_bounds(&self) -> Result<bool, LockError> {
        let cell = self.lock("is_between_bounds")?;
        Ok(cell.value != self.min && cell.value != self.max)
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// Current value, read under the lock.
    pub fn snapshot(&self) -> Result<f32, LockError> {
        Ok(self.lock("snapshot")?.value)
    }

    /// Overwrite the level (clamped into bounds).  Used by replays and
    /// tests to start from a known point.
    /// Number of timed-out acquisitions so far.
    pub fn lock_faults(&self) -> u32 {
        self.lock_faults.load(Ordering::Relaxed)
    }
}
