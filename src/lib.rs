//! TankCtl firmware library.
//!
//! Table-driven tank level controller: two transition-table machines
//! (single-shot and continuous measurement) driven by a fixed-period
//! dispatcher against a lock-protected level register.  Exposes every
//! module for integration testing and host simulation.  All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod fsm;
pub mod level;
pub mod pins;
pub mod scheduler;
pub mod timer;
pub mod workers;

pub mod adapters;
pub mod drivers;
pub mod sensors;
