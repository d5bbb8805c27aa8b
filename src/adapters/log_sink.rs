//! Log-based adapters.
//!
//! [`LogEventSink`] writes structured application events to the logger
//! (UART on the board, stderr on the host).  [`LogDisplay`] stands in for
//! the LCD on the host by logging what would be shown.

use log::{debug, info, warn};

use crate::app::events::{AppEvent, Machine};
use crate::app::ports::{DisplaySink, EventSink};

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                let level = t
                    .level
                    .map_or_else(|| "locked".to_owned(), |v| format!("{v:.3}"));
                info!(
                    "TELEM | cycle={} | mode={} | single={} continuous={} | level={} | \
                     measuring={} led={} | timers m={} s={} | lock_faults={}",
                    t.cycle,
                    t.mode.map_or("none", |m| m.name()),
                    t.single_shot_state,
                    t.continuous_state,
                    level,
                    t.measurement_enabled,
                    if t.status_led { "ON" } else { "off" },
                    t.measure_ticks_left,
                    t.stabilization_ticks_left,
                    t.lock_faults,
                );
            }
            AppEvent::StateChanged { machine, from, to } => {
                let name = match machine {
                    Machine::SingleShot => "single-shot",
                    Machine::Continuous => "continuous",
                };
                info!("STATE | {name} {from} -> {to}");
            }
            AppEvent::ModeChanged { from, to } => match from {
                Some(prev) => info!("MODE  | {prev} -> {to}"),
                None => info!("MODE  | {to}"),
            },
            AppEvent::LockFault { total } => {
                warn!("FAULT | level lock timeout, total={total}");
            }
            AppEvent::Started => {
                info!("START | dispatcher running");
            }
        }
    }
}

/// Display stand-in that logs each completed line.
///
/// Text printed between two clears is buffered and emitted once, on the
/// next clear.
#[derive(Debug, Default)]
pub struct LogDisplay {
    line: String,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &str {
        &self.line
    }
}

impl DisplaySink for LogDisplay {
    fn clear(&mut self) {
        if !self.line.is_empty() {
            debug!("LCD | {}", self.line);
            self.line.clear();
        }
    }

    fn print(&mut self, text: &str) {
        self.line.push_str(text);
    }
}
