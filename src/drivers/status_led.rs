//! Single status LED over an `embedded-hal` digital output.
//!
//! Lit while the tank is stabilizing after an emergency stop.  Writes are
//! skipped when the requested level is already set; a failed write is
//! logged and retried on the next cycle.

use embedded_hal::digital::OutputPin;
use log::{debug, warn};

pub struct StatusLed<P> {
    pin: P,
    /// Last level written successfully.  `None` until the first write.
    current: Option<bool>,
}

impl<P: OutputPin> StatusLed<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, current: None }
    }

    pub fn set(&mut self, on: bool) {
        if self.current == Some(on) {
            return;
        }
        let result = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        match result {
            Ok(()) => {
                debug!("status LED {}", if on { "on" } else { "off" });
                self.current = Some(on);
            }
            Err(e) => warn!("status LED write failed: {e:?}"),
        }
    }

    pub fn is_on(&self) -> bool {
        self.current == Some(true)
    }
}
