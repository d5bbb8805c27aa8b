//! Host-side simulated GPIO.
//!
//! A `SimPin` is a shared logic level.  Clones observe the same level, so
//! a test (or the console reader) can hold one end and press a button
//! while the driver reads the other end.  Implements the `embedded-hal`
//! digital input and output traits; reads and writes never fail.

use core::convert::Infallible;
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

#[derive(Debug, Clone)]
pub struct SimPin {
    level: Arc<AtomicBool>,
}

impl SimPin {
    /// `high` is the initial logic level.
    pub fn new(high: bool) -> Self {
        Self {
            level: Arc::new(AtomicBool::new(high)),
        }
    }

    pub fn set_level(&self, high: bool) {
        self.level.store(high, Ordering::Release);
    }

    pub fn level(&self) -> bool {
        self.level.load(Ordering::Acquire)
    }

    /// Flip the level.  Returns the new level.
    pub fn toggle(&self) -> bool {
        !self.level.fetch_xor(true, Ordering::AcqRel)
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.level())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.level())
    }
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.set_level(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.set_level(true);
        Ok(())
    }
}
