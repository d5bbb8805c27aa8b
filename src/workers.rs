//! One-shot background workers.
//!
//! Each level operation can also run once on its own named thread at
//! boot, contending for the register lock with the dispatcher.  They never
//! re-arm: after boot the dispatcher is the only path that touches the
//! register.  Disabled unless `boot_workers` is set in the config.
//!
//! ```text
//!   drain ─┐
//!   empty? ├──▶ Arc<LevelRegister> ◀── dispatcher
//!   fill  ─┤         (one lock)
//!   ...   ─┘
//! ```

use std::io;
use std::sync::Arc;
use std::thread::JoinHandle;

use log::{info, warn};

use crate::drivers::task_pin::{self, Core, TaskSpec};
use crate::error::Result;
use crate::level::{LevelRegister, SampleKind};

const WORKER_PRIORITY: u8 = 4;
const WORKER_STACK_KB: usize = if cfg!(target_os = "espidf") { 4 } else { 64 };

/// The level operations, in boot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOp {
    Drain,
    IsEmpty,
    Fill,
    IsFull,
    PointSample,
    ContinuousSample,
    BetweenBounds,
}

impl LevelOp {
    pub const ALL: [Self; 7] = [
        Self::Drain,
        Self::IsEmpty,
        Self::Fill,
        Self::IsFull,
        Self::PointSample,
        Self::ContinuousSample,
        Self::BetweenBounds,
    ];

    /// Thread name (null-terminated for ESP-IDF).
    fn task_name(self) -> &'static str {
        match self {
            Self::Drain => "drain\0",
            Self::IsEmpty => "is-empty\0",
            Self::Fill => "fill\0",
            Self::IsFull => "is-full\0",
            Self::PointSample => "point-sample\0",
            Self::ContinuousSample => "cont-sample\0",
            Self::BetweenBounds => "between\0",
        }
    }

    fn task(self) -> TaskSpec {
        TaskSpec {
            name: self.task_name(),
            core: Core::App,
            priority: WORKER_PRIORITY,
            stack_kb: WORKER_STACK_KB,
        }
    }

    /// Run the operation once against `level`.
    pub fn run(self, level: &LevelRegister) -> Result<WorkerOutcome> {
        Ok(match self {
            Self::Drain => WorkerOutcome::Steps(level.drain()?),
            Self::Fill => WorkerOutcome::Steps(level.fill()?),
            Self::IsEmpty => WorkerOutcome::Check(level.is_empty()?),
            Self::IsFull => WorkerOutcome::Check(level.is_full()?),
            Self::BetweenBounds => WorkerOutcome::Check(level.is_between_bounds()?),
            Self::PointSample => WorkerOutcome::Level(level.sample(SampleKind::Point)?),
            Self::ContinuousSample => WorkerOutcome::Level(level.sample(SampleKind::Continuous)?),
        })
    }
}

/// Result of one worker run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkerOutcome {
    /// Drain / fill step count.
    Steps(u32),
    /// Guard result.
    Check(bool),
    /// Level after a sample.
    Level(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkerReport {
    pub op: LevelOp,
    pub result: Result<WorkerOutcome>,
}

/// Handles of the spawned workers.
pub struct BootWorkers {
    handles: Vec<JoinHandle<WorkerReport>>,
}

impl BootWorkers {
    /// Spawn every [`LevelOp`] once on its own thread.
    pub fn spawn(level: &Arc<LevelRegister>) -> io::Result<Self> {
        let mut handles = Vec::with_capacity(LevelOp::ALL.len());
        for op in LevelOp::ALL {
            let level = Arc::clone(level);
            let handle = task_pin::spawn_on_core(op.task(), move || {
                let result = op.run(&level);
                match &result {
                    Ok(outcome) => info!("worker {op:?}: {outcome:?}"),
                    Err(e) => warn!("worker {op:?}: {e}"),
                }
                WorkerReport { op, result }
            })?;
            handles.push(handle);
        }
        Ok(Self { handles })
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every worker.  A panicked worker is logged and skipped.
    pub fn join(self) -> Vec<WorkerReport> {
        self.handles
            .into_iter()
            .filter_map(|h| match h.join() {
                Ok(report) => Some(report),
                Err(_) => {
                    warn!("boot worker panicked");
                    None
                }
            })
            .collect()
    }
}
