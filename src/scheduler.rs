//! Fixed-period cycle pacing.
//!
//! Delay-until semantics: each wake is computed as the previous *scheduled*
//! wake plus one period, not from the time the work finished.  A cycle
//! that overruns (a long drain holding the control loop) makes the next
//! wait return immediately; the schedule is not re-based.
//!
//! ```text
//!  last        last+P      last+2P
//!   │── work ──┤  sleep     │
//!   │────── work (overrun) ─┼──┤ no sleep
//! ```

use std::thread;
use std::time::{Duration, Instant};

use log::debug;

#[derive(Debug)]
pub struct CycleScheduler {
    period: Duration,
    last_wake: Instant,
    cycles: u64,
    overruns: u64,
}

impl CycleScheduler {
    /// Start the schedule now.
    pub fn new(period: Duration) -> Self {
        Self::starting_at(period, Instant::now())
    }

    pub fn from_period_ms(period_ms: u32) -> Self {
        Self::new(Duration::from_millis(u64::from(period_ms)))
    }

    pub fn starting_at(period: Duration, start: Instant) -> Self {
        Self {
            period,
            last_wake: start,
            cycles: 0,
            overruns: 0,
        }
    }

    /// Next scheduled wake.
    pub fn deadline(&self) -> Instant {
        self.last_wake + self.period
    }

    /// Sleep until the next period boundary and advance the schedule by
    /// exactly one period.  Returns how long it slept (zero on overrun).
    pub fn wait_next(&mut self) -> Duration {
        let deadline = self.deadline();
        let now = Instant::now();
        let slept = deadline.saturating_duration_since(now);
        if slept.is_zero() {
            self.overruns += 1;
            debug!(
                "cycle {} overran by {:?}",
                self.cycles,
                now.saturating_duration_since(deadline)
            );
        } else {
            thread::sleep(slept);
        }
        self.last_wake = deadline;
        self.cycles += 1;
        slept
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn overruns(&self) -> u64 {
        self.overruns
    }
}
