//! Operator console: mode selection over a line-oriented stream.
//!
//! A background thread reads lines (stdin / UART) and keeps the latest
//! valid selection in an atomic that the dispatcher polls each cycle, so
//! the control loop never blocks on operator input.
//!
//! | Line       | Effect                                  |
//! |------------|-----------------------------------------|
//! | `0 0`      | manual, single-shot                     |
//! | `0 1`      | manual, continuous                      |
//! | `1`        | automatic (continuous)                  |
//! | `e` / `s`  | toggle the simulated emergency / stop button |
//!
//! Rejected lines are logged and leave the current selection unchanged.

use core::sync::atomic::{AtomicU8, Ordering};
use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread::JoinHandle;

use log::{info, warn};

use crate::adapters::sim_pin::SimPin;
use crate::app::commands::Mode;
use crate::app::ports::ModeSource;
use crate::drivers::task_pin::{self, Core, TaskSpec};

/// Sentinel stored while no mode has been selected.
const NO_MODE: u8 = u8::MAX;

const CONSOLE_TASK: TaskSpec = TaskSpec {
    name: "console\0",
    core: Core::Pro,
    priority: 3,
    stack_kb: if cfg!(target_os = "espidf") { 4 } else { 64 },
};

/// Simulated buttons the console may toggle.  Empty on the board.
#[derive(Debug, Clone, Default)]
pub struct ConsoleButtons {
    pub emergency: Option<SimPin>,
    pub stop: Option<SimPin>,
}

/// What a single console line did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Selected(Mode),
    Toggled { button: &'static str, pressed: bool },
    Rejected,
    Blank,
}

// ---------------------------------------------------------------------------
// Shared selection
// ---------------------------------------------------------------------------

/// Latest operator selection, shared between the reader thread and the
/// dispatcher.
#[derive(Debug, Clone)]
pub struct ModeCell(Arc<AtomicU8>);

impl ModeCell {
    pub fn new() -> Self {
        Self(Arc::new(AtomicU8::new(NO_MODE)))
    }

    pub fn get(&self) -> Option<Mode> {
        Mode::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, mode: Mode) {
        self.0.store(mode as u8, Ordering::Release);
    }
}

impl Default for ModeCell {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeSource for ModeCell {
    fn current_mode(&mut self) -> Option<Mode> {
        self.get()
    }
}

/// Interpret one console line.
pub fn handle_line(line: &str, cell: &ModeCell, buttons: &ConsoleButtons) -> LineOutcome {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineOutcome::Blank;
    }

    let toggle = |name: &'static str, pin: Option<&SimPin>| match pin {
        Some(pin) => {
            // Active-low: a low level is a press.
            let pressed = !pin.toggle();
            info!("console: {name} button {}", if pressed { "pressed" } else { "released" });
            LineOutcome::Toggled {
                button: name,
                pressed,
            }
        }
        None => {
            warn!("console: no simulated {name} button on this target");
            LineOutcome::Rejected
        }
    };

    match trimmed {
        "e" | "E" => toggle("emergency", buttons.emergency.as_ref()),
        "s" | "S" => toggle("stop", buttons.stop.as_ref()),
        _ => match Mode::parse(trimmed) {
            Ok(mode) => {
                cell.set(mode);
                info!("console: mode set to {mode}");
                LineOutcome::Selected(mode)
            }
            Err(e) => {
                warn!("console: rejected '{trimmed}': {e}");
                LineOutcome::Rejected
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Reader thread
// ---------------------------------------------------------------------------

pub struct ConsoleModeReader {
    cell: ModeCell,
    handle: JoinHandle<()>,
}

impl ConsoleModeReader {
    /// Start reading `input` on a background thread.
    pub fn spawn<R>(input: R, buttons: ConsoleButtons) -> io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let cell = ModeCell::new();
        let shared = cell.clone();
        let handle = task_pin::spawn_on_core(CONSOLE_TASK, move || {
            info!(
                "console: enter '<mode> [<sub-mode>]' \
                 (0 = manual, 1 = automatic; 0 = single-shot, 1 = continuous)"
            );
            for line in input.lines() {
                match line {
                    Ok(line) => {
                        handle_line(&line, &shared, &buttons);
                    }
                    Err(e) => {
                        warn!("console: read failed: {e}");
                        break;
                    }
                }
            }
            info!("console: input closed");
        })?;
        Ok(Self { cell, handle })
    }

    /// Wait for the input stream to close.
    pub fn join(self) -> ModeCell {
        if self.handle.join().is_err() {
            warn!("console: reader thread panicked");
        }
        self.cell
    }
}

impl ModeSource for ConsoleModeReader {
    fn current_mode(&mut self) -> Option<Mode> {
        self.cell.get()
    }
}
