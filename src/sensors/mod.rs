//! Sensor subsystem.
//!
//! The tank has a single (simulated) level probe; the buttons are read by
//! [`crate::drivers::button`] through the input port.

pub mod level_probe;

pub use level_probe::{LevelSampler, ScriptedSampler, UniformSampler};
