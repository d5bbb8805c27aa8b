//! Hardware adapter: bridges the button and LED drivers to domain ports.
//!
//! Owns both push buttons and the status LED, exposing them through
//! [`InputPort`] and [`OutputPort`].  Generic over the pin types, so the
//! firmware plugs in `esp_idf_hal` pin drivers and the host plugs in
//! [`SimPin`](super::sim_pin::SimPin)s.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{InputPort, OutputPort};
use crate::drivers::button::Button;
use crate::drivers::status_led::StatusLed;
use crate::fsm::context::InputSnapshot;

/// Concrete adapter that combines the board's digital I/O behind port traits.
pub struct HardwareAdapter<E, S, L> {
    emergency: Button<E>,
    stop: Button<S>,
    led: StatusLed<L>,
}

impl<E: InputPin, S: InputPin, L: OutputPin> HardwareAdapter<E, S, L> {
    pub fn new(emergency: Button<E>, stop: Button<S>, led: StatusLed<L>) -> Self {
        Self {
            emergency,
            stop,
            led,
        }
    }

    /// Convenience constructor from raw pins.
    pub fn from_pins(emergency: E, stop: S, led: L) -> Self {
        Self::new(
            Button::new("emergency", emergency),
            Button::new("stop", stop),
            StatusLed::new(led),
        )
    }

    pub fn led_is_on(&self) -> bool {
        self.led.is_on()
    }
}

// ── InputPort implementation ──────────────────────────────────

impl<E: InputPin, S: InputPin, L: OutputPin> InputPort for HardwareAdapter<E, S, L> {
    fn read_inputs(&mut self) -> InputSnapshot {
        InputSnapshot {
            emergency_pressed: self.emergency.is_pressed(),
            stop_pressed: self.stop.is_pressed(),
        }
    }
}

// ── OutputPort implementation ─────────────────────────────────

impl<E: InputPin, S: InputPin, L: OutputPin> OutputPort for HardwareAdapter<E, S, L> {
    fn set_status_led(&mut self, on: bool) {
        self.led.set(on);
    }
}
