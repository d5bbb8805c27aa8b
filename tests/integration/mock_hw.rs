//! Mock adapters for integration tests.
//!
//! Record every output call and every emitted event so tests can assert
//! on full histories without touching real GPIO or the LCD bus.

use std::sync::Arc;

use parking_lot::Mutex;
use tankctl::app::commands::Mode;
use tankctl::app::events::AppEvent;
use tankctl::app::ports::{DisplaySink, EventSink, InputPort, ModeSource, OutputPort};
use tankctl::fsm::context::InputSnapshot;

// ── MockHardware ──────────────────────────────────────────────

/// Scriptable buttons plus an LED history.
#[derive(Default)]
pub struct MockHardware {
    pub inputs: InputSnapshot,
    pub led_history: Vec<bool>,
    pub reads: usize,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press_emergency(&mut self, pressed: bool) {
        self.inputs.emergency_pressed = pressed;
    }

    pub fn press_stop(&mut self, pressed: bool) {
        self.inputs.stop_pressed = pressed;
    }

    pub fn led_on(&self) -> bool {
        self.led_history.last().copied().unwrap_or(false)
    }
}

impl InputPort for MockHardware {
    fn read_inputs(&mut self) -> InputSnapshot {
        self.reads += 1;
        self.inputs
    }
}

impl OutputPort for MockHardware {
    fn set_status_led(&mut self, on: bool) {
        self.led_history.push(on);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_changes(&self) -> Vec<(u8, u8)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::StateChanged { from, to, .. } => Some((from.0, to.0)),
                _ => None,
            })
            .collect()
    }

    pub fn lock_faults(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::LockFault { total } => Some(*total),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── RecordingDisplay ──────────────────────────────────────────

/// Display whose history stays readable after it is moved into the
/// level register.
#[derive(Clone, Default)]
pub struct RecordingDisplay {
    lines: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.lines.lock().iter().any(|l| l == text)
    }
}

impl DisplaySink for RecordingDisplay {
    fn clear(&mut self) {}

    fn print(&mut self, text: &str) {
        self.lines.lock().push(text.to_owned());
    }
}

// ── ScriptedModes ─────────────────────────────────────────────

/// Mode source that replays a fixed sequence, then repeats the last entry.
pub struct ScriptedModes {
    script: Vec<Option<Mode>>,
    index: usize,
}

#[allow(dead_code)]
impl ScriptedModes {
    pub fn new(script: Vec<Option<Mode>>) -> Self {
        Self { script, index: 0 }
    }
}

impl ModeSource for ScriptedModes {
    fn current_mode(&mut self) -> Option<Mode> {
        let i = self.index.min(self.script.len().saturating_sub(1));
        self.index += 1;
        self.script.get(i).copied().flatten()
    }
}
