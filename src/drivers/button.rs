//! Active-low push button over an `embedded-hal` digital input.
//!
//! ## Hardware
//!
//! Momentary switch to ground with the internal pull-up enabled, so the
//! pin reads LOW while pressed.  The dispatcher samples each button once
//! per cycle; at 200 ms per cycle no extra debounce is needed.
//!
//! A failed pin read counts as "not pressed" and is logged, so a flaky
//! input can never trigger an emergency stop on its own.

use embedded_hal::digital::InputPin;
use log::{info, warn};

pub struct Button<P> {
    name: &'static str,
    pin: P,
    /// Level seen on the previous sample, for edge logging.
    was_pressed: bool,
}

impl<P: InputPin> Button<P> {
    pub fn new(name: &'static str, pin: P) -> Self {
        Self {
            name,
            pin,
            was_pressed: false,
        }
    }

    /// Sample the pin.  Logs on the press edge only.
    pub fn is_pressed(&mut self) -> bool {
        let pressed = match self.pin.is_low() {
            Ok(low) => low,
            Err(e) => {
                warn!("button '{}': read failed: {e:?}", self.name);
                false
            }
        };
        if pressed && !self.was_pressed {
            info!("button '{}' pressed", self.name);
        }
        self.was_pressed = pressed;
        pressed
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}
