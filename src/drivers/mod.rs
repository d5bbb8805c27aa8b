//! Peripheral drivers and thread helpers.

pub mod button;
pub mod lcd;
pub mod status_led;
pub mod task_pin;
